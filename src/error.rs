//! Error types for network construction, evaluation and persistence.

/// Errors produced by the network engine.
#[derive(thiserror::Error, Debug)]
pub enum NetError {
    /// Input, expected output or training set length does not fit the network.
    #[error("Invalid data size: expected {expected}, got {actual}")]
    InvalidDataSize { expected: usize, actual: usize },

    /// Incompatible operands handed to a matrix primitive.
    #[error("Dimension mismatch in {op}: {left:?} vs {right:?}")]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// A layer size of zero was requested.
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// File I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Container-level archive failure
    #[error(transparent)]
    Archive(#[from] zip::result::ZipError),

    /// `meta.json` could not be encoded or decoded
    #[error(transparent)]
    Metadata(#[from] serde_json::Error),

    /// Archive contents are inconsistent with the stored topology.
    #[error("Malformed model archive: {0}")]
    Format(String),
}

/// Result type for network operations
pub type Result<T> = std::result::Result<T, NetError>;
