//! Sparse stress majorization.
//!
//! Stress is `Σ w_ij (‖x_i − x_j‖ − d_ij)²` over the constrained pairs of a
//! [`SparseSymmetricMatrix`]. Every sweep replaces the (non-convex) stress of one node at a time
//! by a convex quadratic that touches it at the current position and moves the node to that
//! quadratic's minimizer, so the stress after a sweep is never larger than before.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sparse::SparseSymmetricMatrix;

mod uniform;

pub use uniform::{UniformStressSmoother, uniform_stress};

pub const DEFAULT_MAX_ITERATIONS: usize = 300;
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// How per-pair weights and targets are derived from the matrix values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightScheme {
    /// Values are target distances; weight `1/d²`.
    #[default]
    Distance,
    /// Values are ignored: every constrained pair gets weight 1 and target 1.
    Uniform,
}

impl WeightScheme {
    fn check(self, matrix: &SparseSymmetricMatrix) -> Result<()> {
        if self == WeightScheme::Uniform {
            return Ok(());
        }
        for row in 0..matrix.n() {
            for (col, value) in matrix.row(row) {
                if !(value > 0.0) {
                    return Err(Error::NonPositiveDistance { row, col, value });
                }
            }
        }
        Ok(())
    }

    fn weight(self, value: f64) -> f64 {
        match self {
            WeightScheme::Distance => 1.0 / (value * value),
            WeightScheme::Uniform => 1.0,
        }
    }

    fn target(self, value: f64) -> f64 {
        match self {
            WeightScheme::Distance => value,
            WeightScheme::Uniform => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmootherOptions {
    /// Damping in `[0, 1)`: the fraction of each majorization step that is held back.
    pub alpha: f64,
    /// Upper bound on the distance a node may move in one update (`M`). `None` is unbounded.
    pub max_step: Option<f64>,
}

impl Default for SmootherOptions {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            max_step: None,
        }
    }
}

impl SmootherOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha >= 0.0 && self.alpha < 1.0) {
            return Err(Error::InvalidOption {
                name: "alpha",
                message: format!("expected a value in [0, 1), got {}", self.alpha),
            });
        }
        if let Some(m) = self.max_step {
            if !(m > 0.0) {
                return Err(Error::InvalidOption {
                    name: "max_step",
                    message: format!("expected a positive bound, got {m}"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmootherStatus {
    /// Constructed, or iterated without a verdict yet.
    Ready,
    Converged,
    IterationCap,
    Failed,
}

/// Outcome of [`StressMajorizationSmoother::run`]. Numerical failure is reported as an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Convergence {
    Converged { iterations: usize, stress: f64 },
    IterationCap { iterations: usize, stress: f64 },
}

impl Convergence {
    pub fn iterations(&self) -> usize {
        match *self {
            Convergence::Converged { iterations, .. }
            | Convergence::IterationCap { iterations, .. } => iterations,
        }
    }

    pub fn stress(&self) -> f64 {
        match *self {
            Convergence::Converged { stress, .. } | Convergence::IterationCap { stress, .. } => {
                stress
            }
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged { .. })
    }
}

/// Iterative stress-majorization solver over a sparse matrix of target distances.
///
/// Coordinates are a dense row-major `n × dim` buffer. The matrix is either borrowed
/// ([`StressMajorizationSmoother::new`]) or owned ([`StressMajorizationSmoother::from_owned`]);
/// an owned matrix and all workspace are released when the smoother is dropped.
#[derive(Debug, Clone)]
pub struct StressMajorizationSmoother<'a> {
    dim: usize,
    scheme: WeightScheme,
    matrix: Cow<'a, SparseSymmetricMatrix>,
    /// Same pattern as `matrix`, holding the pair weights.
    weights: SparseSymmetricMatrix,
    /// Parallel to the matrix entries.
    targets: Vec<f64>,
    /// Per-row sum of weights (the Laplacian diagonal).
    degrees: Vec<f64>,
    x: Vec<f64>,
    step: Vec<f64>,
    options: SmootherOptions,
    iterations: usize,
    stress: f64,
    status: SmootherStatus,
}

impl<'a> StressMajorizationSmoother<'a> {
    /// Distance-weighted smoother over a borrowed matrix. `initial` is copied.
    pub fn new(
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
            WeightScheme::Distance,
        )
    }

    pub fn with_scheme(
        dim: usize,
        matrix: Cow<'a, SparseSymmetricMatrix>,
        initial: &[f64],
        options: SmootherOptions,
        scheme: WeightScheme,
    ) -> Result<Self> {
        if dim < 1 {
            return Err(Error::InvalidDimension { dim });
        }
        let n = matrix.n();
        if n == 0 {
            return Err(Error::EmptyMatrix);
        }
        options.validate()?;

        let expected = n.checked_mul(dim).ok_or(Error::CoordinateLength {
            expected: usize::MAX,
            actual: initial.len(),
        })?;
        if initial.len() != expected {
            return Err(Error::CoordinateLength {
                expected,
                actual: initial.len(),
            });
        }
        if let Some(index) = initial.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFiniteCoordinate { index });
        }
        if n > 1 && all_coincident(initial, dim) {
            return Err(Error::CoincidentCoordinates);
        }
        scheme.check(&matrix)?;

        let nnz = matrix.nnz();
        let mut targets = Vec::new();
        targets.try_reserve_exact(nnz)?;
        targets.extend(matrix.values().iter().map(|&v| scheme.target(v)));
        let weights = matrix.map_values(|v| scheme.weight(v));
        let degrees = weights.degrees();

        let mut x = Vec::new();
        x.try_reserve_exact(expected)?;
        x.extend_from_slice(initial);

        let mut out = Self {
            dim,
            scheme,
            matrix,
            weights,
            targets,
            degrees,
            x,
            step: vec![0.0; dim],
            options,
            iterations: 0,
            stress: 0.0,
            status: SmootherStatus::Ready,
        };
        out.scale_to_targets();
        out.stress = out.compute_stress();

        tracing::debug!(
            n,
            nnz,
            dim,
            scheme = ?out.scheme,
            stress = out.stress,
            "stress smoother ready"
        );
        Ok(out)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn node_count(&self) -> usize {
        self.matrix.n()
    }

    pub fn scheme(&self) -> WeightScheme {
        self.scheme
    }

    pub fn matrix(&self) -> &SparseSymmetricMatrix {
        &self.matrix
    }

    pub fn coordinates(&self) -> &[f64] {
        &self.x
    }

    pub fn into_coordinates(self) -> Vec<f64> {
        self.x
    }

    /// Stress of the current coordinates.
    pub fn stress(&self) -> f64 {
        self.stress
    }

    /// Total sweeps performed since construction.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn status(&self) -> SmootherStatus {
        self.status
    }

    /// One Gauss-Seidel majorization sweep over every node. Returns the stress afterwards.
    ///
    /// A node without incident weight fails with [`Error::NumericalFailure`] before any node
    /// moves. An update that would produce non-finite coordinates stops the sweep with the same
    /// error; the nodes updated before it keep their new (finite) positions and
    /// [`stress`](Self::stress) describes those coordinates.
    pub fn iterate(&mut self) -> Result<f64> {
        if let Some(node) = self
            .degrees
            .iter()
            .position(|d| !(*d > 0.0 && d.is_finite()))
        {
            return Err(self.fail(node));
        }
        if let Err(node) = self.sweep() {
            self.stress = self.compute_stress();
            return Err(self.fail(node));
        }
        self.iterations += 1;
        self.stress = self.compute_stress();
        Ok(self.stress)
    }

    fn fail(&mut self, node: usize) -> Error {
        self.status = SmootherStatus::Failed;
        tracing::warn!(
            node,
            iteration = self.iterations,
            "stress majorization cannot update node"
        );
        Error::NumericalFailure { node }
    }

    /// Iterates until the relative stress decrease drops below `tolerance` or `max_iterations`
    /// sweeps have run.
    pub fn run(&mut self, max_iterations: usize, tolerance: f64) -> Result<Convergence> {
        if !(tolerance >= 0.0 && tolerance.is_finite()) {
            return Err(Error::InvalidOption {
                name: "tolerance",
                message: format!("expected a finite, non-negative value, got {tolerance}"),
            });
        }

        let mut previous = self.stress;
        for iteration in 1..=max_iterations {
            let current = self.iterate()?;
            tracing::trace!(iteration, stress = current, "stress majorization sweep");

            let converged = previous <= 0.0 || (previous - current) / previous < tolerance;
            previous = current;
            if converged {
                self.status = SmootherStatus::Converged;
                tracing::debug!(iterations = iteration, stress = current, "stress converged");
                return Ok(Convergence::Converged {
                    iterations: iteration,
                    stress: current,
                });
            }
        }

        self.status = SmootherStatus::IterationCap;
        tracing::debug!(
            iterations = max_iterations,
            stress = previous,
            "stress majorization hit the iteration cap"
        );
        Ok(Convergence::IterationCap {
            iterations: max_iterations,
            stress: previous,
        })
    }

    fn sweep(&mut self) -> std::result::Result<(), usize> {
        let dim = self.dim;
        let keep = 1.0 - self.options.alpha;
        let matrix: &SparseSymmetricMatrix = &self.matrix;
        let cols = matrix.cols();
        let weights = self.weights.values();

        for i in 0..matrix.n() {
            let degree = self.degrees[i];

            // Minimizer of the node's majorizer: a weighted average of the neighbours, each
            // pushed out along the current direction by its target distance.
            self.step.fill(0.0);
            for k in matrix.row_range(i) {
                let j = cols[k];
                let w = weights[k];
                let dist = distance(&self.x, i, j, dim);
                let pull = if dist > 0.0 { self.targets[k] / dist } else { 0.0 };
                for a in 0..dim {
                    let xj = self.x[j * dim + a];
                    self.step[a] += w * (xj + pull * (self.x[i * dim + a] - xj));
                }
            }

            let mut norm2 = 0.0;
            for a in 0..dim {
                let s = keep * (self.step[a] / degree - self.x[i * dim + a]);
                self.step[a] = s;
                norm2 += s * s;
            }
            let norm = norm2.sqrt();
            if !norm.is_finite() {
                return Err(i);
            }

            let clamp = match self.options.max_step {
                Some(m) if norm > m => m / norm,
                _ => 1.0,
            };
            for a in 0..dim {
                self.x[i * dim + a] += clamp * self.step[a];
            }
        }
        Ok(())
    }

    fn compute_stress(&self) -> f64 {
        let matrix: &SparseSymmetricMatrix = &self.matrix;
        let cols = matrix.cols();
        let weights = self.weights.values();
        let mut total = 0.0;
        for i in 0..matrix.n() {
            for k in matrix.row_range(i) {
                let j = cols[k];
                if j <= i {
                    continue;
                }
                let diff = distance(&self.x, i, j, self.dim) - self.targets[k];
                total += weights[k] * diff * diff;
            }
        }
        total
    }

    /// Rescales the starting layout by the factor that minimizes stress for its shape.
    fn scale_to_targets(&mut self) {
        let matrix: &SparseSymmetricMatrix = &self.matrix;
        let cols = matrix.cols();
        let weights = self.weights.values();
        let mut num = 0.0;
        let mut den = 0.0;
        for i in 0..matrix.n() {
            for k in matrix.row_range(i) {
                let dist = distance(&self.x, i, cols[k], self.dim);
                num += weights[k] * self.targets[k] * dist;
                den += weights[k] * dist * dist;
            }
        }
        if den > 0.0 && num > 0.0 {
            let s = num / den;
            if s.is_finite() {
                self.x.iter_mut().for_each(|v| *v *= s);
            }
        }
    }
}

impl StressMajorizationSmoother<'static> {
    /// Distance-weighted smoother that takes ownership of `matrix`.
    pub fn from_owned(
        dim: usize,
        matrix: SparseSymmetricMatrix,
        initial: &[f64],
        options: SmootherOptions,
    ) -> Result<Self> {
        Self::with_scheme(
            dim,
            Cow::Owned(matrix),
            initial,
            options,
            WeightScheme::Distance,
        )
    }
}

/// Whether every point of the row-major `n × dim` buffer `x` is the same.
pub(crate) fn all_coincident(x: &[f64], dim: usize) -> bool {
    let Some(first) = x.get(..dim).filter(|_| dim > 0) else {
        return true;
    };
    x.chunks_exact(dim).all(|p| p == first)
}

fn distance(x: &[f64], i: usize, j: usize, dim: usize) -> f64 {
    let a = &x[i * dim..(i + 1) * dim];
    let b = &x[j * dim..(j + 1) * dim];
    a.iter()
        .zip(b)
        .map(|(p, q)| (p - q) * (p - q))
        .sum::<f64>()
        .sqrt()
}
