use std::borrow::Cow;

use narwhal_layout::distance::distance_matrix;
use narwhal_layout::init::random_placement;
use narwhal_layout::rng::XorShift64Star;
use narwhal_layout::{
    Convergence, Error, SmootherOptions, SmootherStatus, SparseSymmetricMatrix,
    StressMajorizationSmoother, WeightScheme,
};

fn add(adj: &mut [Vec<(usize, f64)>], a: usize, b: usize, len: f64) {
    adj[a].push((b, len));
    adj[b].push((a, len));
}

/// A random connected graph: a random spanning tree plus a few extra edges.
fn random_connected(rng: &mut XorShift64Star, n: usize) -> Vec<Vec<(usize, f64)>> {
    let mut adj: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    for v in 1..n {
        let parent = rng.next_usize(v);
        let len = 0.5 + 2.0 * rng.next_f64_unit();
        add(&mut adj, v, parent, len);
    }
    for _ in 0..n / 2 {
        let a = rng.next_usize(n);
        let b = rng.next_usize(n);
        if a != b {
            let len = 0.5 + 2.0 * rng.next_f64_unit();
            add(&mut adj, a, b, len);
        }
    }
    adj
}

#[test]
fn stress_never_increases_on_random_connected_graphs() {
    let mut rng = XorShift64Star::new(2024);
    for case in 0..60 {
        let n = 2 + rng.next_usize(19);
        let adj = random_connected(&mut rng, n);
        let max_hops = if case % 3 == 0 { Some(2) } else { None };
        let matrix = distance_matrix(&adj, max_hops).unwrap();
        assert!(matrix.is_connected().unwrap());

        let dim = 1 + case % 3;
        let initial = random_placement(n, dim, 3.0, &mut rng);
        let options = SmootherOptions {
            alpha: [0.0, 0.3, 0.7][case % 3],
            max_step: if case % 4 == 0 { Some(0.25) } else { None },
        };
        let scheme = if case % 2 == 0 {
            WeightScheme::Distance
        } else {
            WeightScheme::Uniform
        };

        let mut sm = StressMajorizationSmoother::with_scheme(
            dim,
            Cow::Borrowed(&matrix),
            &initial,
            options,
            scheme,
        )
        .unwrap();

        let mut previous = sm.stress();
        for iteration in 0..40 {
            let current = sm.iterate().unwrap();
            assert!(
                current <= previous * (1.0 + 1e-12) + 1e-12,
                "case {case} (n={n}, dim={dim}, {scheme:?}) iteration {iteration}: \
                 stress rose from {previous} to {current}"
            );
            previous = current;
        }
        assert_eq!(sm.coordinates().len(), n * dim);
    }
}

#[test]
fn run_converges_and_reports_it() {
    let adj = vec![
        vec![(1, 1.0), (3, 1.0)],
        vec![(0, 1.0), (2, 1.0)],
        vec![(1, 1.0), (3, 1.0)],
        vec![(2, 1.0), (0, 1.0)],
    ];
    let matrix = distance_matrix(&adj, None).unwrap();
    let mut rng = XorShift64Star::new(9);
    let initial = random_placement(4, 2, 1.0, &mut rng);
    let mut sm =
        StressMajorizationSmoother::new(2, &matrix, &initial, SmootherOptions::default()).unwrap();

    let outcome = sm.run(1000, 1e-6).unwrap();
    assert!(matches!(outcome, Convergence::Converged { .. }), "{outcome:?}");
    assert_eq!(sm.status(), SmootherStatus::Converged);
    assert!(outcome.iterations() <= 1000);
    assert_eq!(outcome.stress(), sm.stress());
}

#[test]
fn disconnected_matrix_rows_fail_instead_of_producing_nan() {
    // Node 3 has no constraints at all.
    let matrix = SparseSymmetricMatrix::from_pairs(4, [(0, 1, 1.0), (1, 2, 1.0)]).unwrap();
    let initial = [0.0, 0.0, 1.0, 0.0, 2.0, 1.0, 7.0, 7.0];
    let mut sm =
        StressMajorizationSmoother::new(2, &matrix, &initial, SmootherOptions::default()).unwrap();
    let before = sm.coordinates().to_vec();
    let stress = sm.stress();
    match sm.iterate() {
        Err(Error::NumericalFailure { node }) => assert_eq!(node, 3),
        other => panic!("expected a numerical failure, got {other:?}"),
    }
    assert_eq!(sm.status(), SmootherStatus::Failed);
    // Nodes 0..3 are off their targets but must not move before node 3 is rejected.
    assert_eq!(sm.coordinates(), &before[..]);
    assert_eq!(sm.stress(), stress);
}

#[test]
fn collapsed_starts_are_rejected() {
    let matrix = SparseSymmetricMatrix::from_pairs(3, [(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)])
        .unwrap();
    let err = StressMajorizationSmoother::new(2, &matrix, &[0.5; 6], SmootherOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::CoincidentCoordinates), "{err:?}");
}

#[test]
fn smoother_owns_a_transferred_matrix() {
    let matrix = SparseSymmetricMatrix::from_pairs(2, [(0, 1, 2.0)]).unwrap();
    let mut sm = StressMajorizationSmoother::with_scheme(
        1,
        Cow::Owned(matrix),
        &[0.0, 0.5],
        SmootherOptions::default(),
        WeightScheme::Distance,
    )
    .unwrap();
    sm.run(10, 1e-9).unwrap();
    let x = sm.into_coordinates();
    assert!(((x[1] - x[0]).abs() - 2.0).abs() < 1e-9);
}
