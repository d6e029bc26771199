#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("out of memory")]
    OutOfMemory(#[from] std::collections::TryReserveError),

    #[error("graph contains an edge with a missing endpoint: {edge_id}")]
    MissingEndpoint { edge_id: String },
    #[error("graph contains duplicate node id: {node_id}")]
    DuplicateNode { node_id: String },
    #[error("edge {edge_id} has an invalid length: {length}")]
    InvalidEdgeLength { edge_id: String, length: f64 },

    #[error("matrix index ({row}, {col}) is out of range for {n} nodes")]
    IndexOutOfRange { row: usize, col: usize, n: usize },
    #[error("matrix entry ({index}, {index}) lies on the diagonal")]
    DiagonalEntry { index: usize },
    #[error("matrix entry ({row}, {col}) is not finite: {value}")]
    NonFiniteValue { row: usize, col: usize, value: f64 },

    #[error("embedding dimension must be at least 1, got {dim}")]
    InvalidDimension { dim: usize },
    #[error("cannot lay out an empty matrix")]
    EmptyMatrix,
    #[error("expected {expected} coordinates, got {actual}")]
    CoordinateLength { expected: usize, actual: usize },
    #[error("coordinate {index} is not finite")]
    NonFiniteCoordinate { index: usize },
    #[error("every starting coordinate is the same point")]
    CoincidentCoordinates,
    #[error("distance between nodes {row} and {col} must be positive, got {value}")]
    NonPositiveDistance { row: usize, col: usize, value: f64 },
    #[error("invalid option `{name}`: {message}")]
    InvalidOption { name: &'static str, message: String },

    #[error("numerical failure while updating node {node}")]
    NumericalFailure { node: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
