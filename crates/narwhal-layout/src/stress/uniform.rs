use std::borrow::Cow;

use super::{
    Convergence, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, SmootherOptions,
    StressMajorizationSmoother, WeightScheme, all_coincident,
};
use crate::error::Result;
use crate::init::random_placement;
use crate::rng::XorShift64Star;
use crate::sparse::SparseSymmetricMatrix;

const SPREAD_SEED: u64 = 0x5eed;

/// A [`StressMajorizationSmoother`] built with [`WeightScheme::Uniform`]: only which pairs are
/// constrained matters, not their distances.
pub type UniformStressSmoother<'a> = StressMajorizationSmoother<'a>;

impl<'a> StressMajorizationSmoother<'a> {
    pub fn new_uniform(
        dim: usize,
        matrix: &'a SparseSymmetricMatrix,
        initial: &[f64],
        options: SmootherOptions,
    ) -> Result<Self> {
        Self::with_scheme(
            dim,
            Cow::Borrowed(matrix),
            initial,
            options,
            WeightScheme::Uniform,
        )
    }
}

/// Runs uniform stress to convergence and writes the result back into `coords`.
///
/// Uses [`DEFAULT_MAX_ITERATIONS`] and [`DEFAULT_TOLERANCE`]; build a smoother directly for any
/// other policy. `coords` is left untouched on error.
///
/// When every node starts on the same point, the nodes are first scattered around it with a
/// fixed seed, so the result stays deterministic.
pub fn uniform_stress(
    dim: usize,
    matrix: &SparseSymmetricMatrix,
    coords: &mut [f64],
) -> Result<Convergence> {
    let n = matrix.n();
    let start: Cow<'_, [f64]> =
        if n > 1 && Some(coords.len()) == n.checked_mul(dim) && all_coincident(coords, dim) {
            let mut rng = XorShift64Star::new(SPREAD_SEED);
            let mut spread = random_placement(n, dim, 1.0, &mut rng);
            for (v, origin) in spread.iter_mut().zip(coords.iter()) {
                *v += origin;
            }
            Cow::Owned(spread)
        } else {
            Cow::Borrowed(coords)
        };
    let mut sm =
        UniformStressSmoother::new_uniform(dim, matrix, &start, SmootherOptions::default())?;
    let outcome = sm.run(DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE)?;
    coords.copy_from_slice(sm.coordinates());
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::{UniformStressSmoother, uniform_stress};
    use crate::sparse::SparseSymmetricMatrix;
    use crate::stress::{SmootherOptions, StressMajorizationSmoother, WeightScheme};

    fn dist(x: &[f64], i: usize, j: usize) -> f64 {
        ((x[2 * i] - x[2 * j]).powi(2) + (x[2 * i + 1] - x[2 * j + 1]).powi(2)).sqrt()
    }

    fn triangle() -> SparseSymmetricMatrix {
        SparseSymmetricMatrix::from_pairs(3, [(0, 1, 1.0), (1, 2, 1.0), (0, 2, 2.0)]).unwrap()
    }

    const START: [f64; 6] = [0.0, 0.0, 1.0, 0.8, 2.2, 0.1];

    #[test]
    fn uniform_smoother_uses_the_uniform_scheme() {
        let m = triangle();
        let sm = UniformStressSmoother::new_uniform(2, &m, &START, SmootherOptions::default())
            .unwrap();
        assert_eq!(sm.scheme(), WeightScheme::Uniform);
    }

    #[test]
    fn uniform_stress_ignores_distance_magnitudes() {
        let m = triangle();

        let mut weighted =
            StressMajorizationSmoother::new(2, &m, &START, SmootherOptions::default()).unwrap();
        weighted.run(2000, 1e-12).unwrap();
        let w = weighted.coordinates();
        let weighted_ratio = dist(w, 0, 2) / dist(w, 0, 1);
        assert!(weighted_ratio > 1.9, "weighted ratio {weighted_ratio}");

        let mut u = START;
        let outcome = uniform_stress(2, &m, &mut u).unwrap();
        assert!(outcome.stress() < 1e-3, "uniform stress {}", outcome.stress());
        let (a, b, c) = (dist(&u, 0, 1), dist(&u, 1, 2), dist(&u, 0, 2));
        for side in [a, b, c] {
            assert!((side - 1.0).abs() < 0.05, "sides {a} {b} {c}");
        }
        assert!((c / a - weighted_ratio).abs() > 0.5);
    }

    #[test]
    fn uniform_stress_spreads_a_collapsed_start() {
        let m = triangle();
        let mut coords = [0.5; 6];
        let outcome = uniform_stress(2, &m, &mut coords).unwrap();
        assert!(outcome.stress() < 3.0, "stress {}", outcome.stress());
        assert!(coords.iter().all(|v| v.is_finite()));
        for (i, j) in [(0, 1), (1, 2), (0, 2)] {
            assert!(dist(&coords, i, j) > 0.1, "{coords:?}");
        }

        let mut again = [0.5; 6];
        uniform_stress(2, &m, &mut again).unwrap();
        assert_eq!(coords, again);
    }

    #[test]
    fn uniform_stress_leaves_coordinates_alone_on_failure() {
        let m = SparseSymmetricMatrix::from_pairs(3, [(0, 1, 1.0)]).unwrap();
        let mut coords = [0.0, 0.0, 1.0, 0.0, 4.0, 4.0];
        let before = coords;
        assert!(uniform_stress(2, &m, &mut coords).is_err());
        assert_eq!(coords, before);
    }
}
