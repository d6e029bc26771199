pub mod circle;
pub mod stress;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::init::InitialPlacement;
use crate::stress::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, SmootherOptions};

#[derive(Debug, Clone, PartialEq)]
pub enum Algorithm {
    /// Distance-weighted stress majorization (`w = 1/d²`).
    Stress(StressOptions),
    /// Uniform stress: every constrained pair pulls towards the same length.
    UniformStress(StressOptions),
    /// Nodes evenly spaced on a circle.
    Circle(CircleOptions),
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Stress(_) => "stress",
            Algorithm::UniformStress(_) => "uniform",
            Algorithm::Circle(_) => "circle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressOptions {
    /// Embedding dimension.
    pub dim: usize,
    /// Damping in `[0, 1)`; higher is slower and steadier.
    pub alpha: f64,
    /// Per-update displacement bound (`M`); unbounded when `None`.
    pub max_step: Option<f64>,
    pub max_iterations: usize,
    /// Relative stress decrease below which a run counts as converged.
    pub tolerance: f64,
    pub random_seed: u64,
    /// Only constrain node pairs within this many hops. `None` constrains every reachable pair.
    pub max_hops: Option<usize>,
    pub init: InitialPlacement,
    /// Length of edges that do not specify one.
    pub default_edge_length: f64,
    /// Horizontal gap between packed connected components.
    pub component_gap: f64,
}

impl Default for StressOptions {
    fn default() -> Self {
        Self {
            dim: 2,
            alpha: 0.0,
            max_step: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            random_seed: 1,
            max_hops: None,
            init: InitialPlacement::ClassicalMds,
            default_edge_length: 1.0,
            component_gap: 1.0,
        }
    }
}

impl StressOptions {
    pub fn smoother_options(&self) -> SmootherOptions {
        SmootherOptions {
            alpha: self.alpha,
            max_step: self.max_step,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.dim < 1 {
            return Err(Error::InvalidDimension { dim: self.dim });
        }
        self.smoother_options().validate()?;
        if !(self.tolerance >= 0.0 && self.tolerance.is_finite()) {
            return Err(Error::InvalidOption {
                name: "tolerance",
                message: format!("expected a finite, non-negative value, got {}", self.tolerance),
            });
        }
        if !(self.default_edge_length > 0.0 && self.default_edge_length.is_finite()) {
            return Err(Error::InvalidOption {
                name: "default_edge_length",
                message: format!("expected a positive length, got {}", self.default_edge_length),
            });
        }
        if !(self.component_gap >= 0.0 && self.component_gap.is_finite()) {
            return Err(Error::InvalidOption {
                name: "component_gap",
                message: format!("expected a non-negative gap, got {}", self.component_gap),
            });
        }
        if self.max_hops == Some(0) {
            return Err(Error::InvalidOption {
                name: "max_hops",
                message: "at least one hop is required".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleOptions {
    /// Arc length between neighbouring nodes.
    pub spacing: f64,
}

impl Default for CircleOptions {
    fn default() -> Self {
        Self { spacing: 1.0 }
    }
}
