//! Error types for the clustering crate.

use thiserror::Error;

/// Errors raised while encoding users or fitting clusters.
///
/// All of these are configuration or data errors: they are reported at
/// clustering time and never downgraded to a default assignment.
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Cluster count must be positive")]
    ZeroClusters,

    #[error("No users to cluster")]
    NoUsers,

    /// More clusters requested than there are distinct encoded rows
    #[error("Requested {requested} clusters but only {distinct} distinct demographic profiles exist")]
    TooManyClusters { requested: usize, distinct: usize },

    /// A category that was not observed when the encoder was fitted
    #[error("Unknown {field} category: {value}")]
    UnknownCategory { field: String, value: String },

    #[error("Encoded matrix has invalid shape: {0}")]
    Shape(String),

    /// Failure reported by the k-means implementation
    #[error("K-means failed: {0}")]
    KMeans(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ClusterError>;
