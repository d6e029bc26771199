//! Cheap starting layouts for the stress solver.

use nalgebra::DMatrix;
use nalgebra::linalg::SymmetricEigen;
use serde::{Deserialize, Serialize};

use crate::rng::XorShift64Star;
use crate::sparse::SparseSymmetricMatrix;

/// Components larger than this skip classical MDS (dense `O(n³)` eigendecomposition).
pub const MDS_MAX_NODES: usize = 500;

/// Relative size of the jitter added on top of an MDS embedding.
const MDS_JITTER: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialPlacement {
    /// Uniform random points in a box sized to the graph.
    Random,
    /// Classical (Torgerson) MDS of the distance matrix, falling back to `Random` when the
    /// matrix is not complete or too large.
    #[default]
    ClassicalMds,
}

/// Starting coordinates (`n × dim`, row-major) for the nodes of `matrix`.
pub fn initial_coordinates(
    matrix: &SparseSymmetricMatrix,
    dim: usize,
    placement: InitialPlacement,
    rng: &mut XorShift64Star,
) -> Vec<f64> {
    let scale = typical_distance(matrix) * (matrix.n() as f64).sqrt().max(1.0);
    match placement {
        InitialPlacement::Random => random_placement(matrix.n(), dim, scale, rng),
        InitialPlacement::ClassicalMds => match classical_mds(matrix, dim) {
            Some(mut x) => {
                for v in &mut x {
                    *v += rng.next_f64_signed() * MDS_JITTER * scale;
                }
                x
            }
            None => {
                tracing::warn!(
                    n = matrix.n(),
                    "classical MDS unavailable, using random placement"
                );
                random_placement(matrix.n(), dim, scale, rng)
            }
        },
    }
}

pub fn random_placement(n: usize, dim: usize, scale: f64, rng: &mut XorShift64Star) -> Vec<f64> {
    (0..n * dim).map(|_| rng.next_f64_signed() * scale).collect()
}

/// Classical MDS embedding of a complete distance matrix.
///
/// Returns `None` unless every pair is constrained and `n <= MDS_MAX_NODES`.
pub fn classical_mds(matrix: &SparseSymmetricMatrix, dim: usize) -> Option<Vec<f64>> {
    let n = matrix.n();
    if n == 0 || n > MDS_MAX_NODES || (0..n).any(|i| matrix.row_len(i) != n - 1) {
        return None;
    }

    let mut d2 = DMatrix::<f64>::zeros(n, n);
    for i in 0..n {
        for (j, d) in matrix.row(i) {
            d2[(i, j)] = d * d;
        }
    }

    // Double centring: B = -1/2 · J · D² · J with J = I − 11ᵀ/n.
    let row_means: Vec<f64> = (0..n).map(|i| d2.row(i).sum() / n as f64).collect();
    let grand_mean = row_means.iter().sum::<f64>() / n as f64;
    let b = DMatrix::<f64>::from_fn(n, n, |i, j| {
        -0.5 * (d2[(i, j)] - row_means[i] - row_means[j] + grand_mean)
    });

    let eigen = SymmetricEigen::new(b);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&p, &q| eigen.eigenvalues[q].total_cmp(&eigen.eigenvalues[p]));

    let mut out = vec![0.0; n * dim];
    for (axis, &k) in order.iter().take(dim).enumerate() {
        let lambda = eigen.eigenvalues[k];
        if !(lambda > 0.0) {
            continue;
        }
        let s = lambda.sqrt();
        for i in 0..n {
            out[i * dim + axis] = eigen.eigenvectors[(i, k)] * s;
        }
    }
    out.iter().all(|v| v.is_finite()).then_some(out)
}

fn typical_distance(matrix: &SparseSymmetricMatrix) -> f64 {
    let values = matrix.values();
    if values.is_empty() {
        return 1.0;
    }
    let mean = values.iter().map(|v| v.abs()).sum::<f64>() / values.len() as f64;
    if mean > 0.0 && mean.is_finite() { mean } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::{InitialPlacement, classical_mds, initial_coordinates};
    use crate::rng::XorShift64Star;
    use crate::sparse::SparseSymmetricMatrix;

    fn dist(x: &[f64], dim: usize, i: usize, j: usize) -> f64 {
        (0..dim)
            .map(|a| (x[i * dim + a] - x[j * dim + a]).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    #[test]
    fn mds_recovers_a_square() {
        let s = 2f64.sqrt();
        let m = SparseSymmetricMatrix::from_pairs(
            4,
            [
                (0, 1, 1.0),
                (1, 2, 1.0),
                (2, 3, 1.0),
                (3, 0, 1.0),
                (0, 2, s),
                (1, 3, s),
            ],
        )
        .unwrap();
        let x = classical_mds(&m, 2).unwrap();
        for (i, j, d) in [(0, 1, 1.0), (1, 2, 1.0), (0, 2, s), (1, 3, s)] {
            assert!((dist(&x, 2, i, j) - d).abs() < 1e-9, "pair ({i}, {j})");
        }
    }

    #[test]
    fn mds_needs_a_complete_matrix() {
        let m = SparseSymmetricMatrix::from_pairs(3, [(0, 1, 1.0), (1, 2, 1.0)]).unwrap();
        assert!(classical_mds(&m, 2).is_none());
    }

    #[test]
    fn placements_are_seeded_and_sized() {
        let m = SparseSymmetricMatrix::from_pairs(3, [(0, 1, 1.0), (1, 2, 1.0)]).unwrap();
        for placement in [InitialPlacement::Random, InitialPlacement::ClassicalMds] {
            let a = initial_coordinates(&m, 3, placement, &mut XorShift64Star::new(7));
            let b = initial_coordinates(&m, 3, placement, &mut XorShift64Star::new(7));
            assert_eq!(a.len(), 9);
            assert_eq!(a, b);
            assert!(a.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn mds_on_a_line_still_spreads_the_second_axis() {
        let m = SparseSymmetricMatrix::from_pairs(3, [(0, 1, 1.0), (1, 2, 1.0), (0, 2, 2.0)])
            .unwrap();
        let mut rng = XorShift64Star::new(3);
        let x = initial_coordinates(&m, 2, InitialPlacement::ClassicalMds, &mut rng);
        assert!((dist(&x, 2, 0, 2) - 2.0).abs() < 0.1);
        assert!(x.iter().skip(1).step_by(2).any(|y| *y != 0.0));
    }
}
