//! Error types for the cold-start crate.

use crate::resolver::Aggregate;
use clustering::ClusterError;
use data_loader::UserId;
use thiserror::Error;

/// Errors raised while building the cold-start model or answering a query.
#[derive(Error, Debug)]
pub enum ColdStartError {
    /// A rating references a user that is not in the user table
    #[error("Rating references unknown user {user_id}")]
    UnknownUser { user_id: UserId },

    /// The aggregate chosen for a query has no ratings to average
    #[error("No ratings available for {aggregate}")]
    EmptyAggregate { aggregate: Aggregate },

    #[error(transparent)]
    Cluster(#[from] ClusterError),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ColdStartError>;
