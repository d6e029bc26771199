#![forbid(unsafe_code)]

//! Headless sparse stress-majorization graph layout.
//!
//! The solver ([`StressMajorizationSmoother`]) turns a sparse matrix of target distances into
//! coordinates; [`layout`] wraps it with distance computation, initial placement and component
//! packing for a whole [`Graph`].

pub mod algo;
pub mod bitarray;
pub mod distance;
pub mod error;
pub mod graph;
pub mod init;
pub mod rng;
pub mod sparse;
pub mod stress;

pub use algo::{Algorithm, CircleOptions, StressOptions};
pub use bitarray::BitArray;
pub use error::{Error, Result};
pub use graph::{Edge, Graph, LayoutResult, Node, Point};
pub use init::InitialPlacement;
pub use sparse::{SparseBuilder, SparseSymmetricMatrix};
pub use stress::{
    Convergence, SmootherOptions, SmootherStatus, StressMajorizationSmoother,
    UniformStressSmoother, WeightScheme, uniform_stress,
};

/// Headless layout entry point.
pub fn layout(graph: &Graph, algorithm: &Algorithm) -> Result<LayoutResult> {
    match algorithm {
        Algorithm::Stress(opts) => algo::stress::layout(graph, opts, WeightScheme::Distance),
        Algorithm::UniformStress(opts) => algo::stress::layout(graph, opts, WeightScheme::Uniform),
        Algorithm::Circle(opts) => algo::circle::layout(graph, opts),
    }
}
