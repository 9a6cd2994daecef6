//! Joining cluster membership onto rating records.

use crate::error::{ColdStartError, Result};
use clustering::{ClusterId, ClusteredUser};
use data_loader::{MovieId, Rating, UserId};
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// A rating annotated with the cluster of the user who made it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClusteredRating {
    pub rating: Rating,
    pub cluster: ClusterId,
}

impl ClusteredRating {
    pub fn user_id(&self) -> UserId {
        self.rating.user_id
    }

    pub fn movie_id(&self) -> MovieId {
        self.rating.movie_id
    }

    pub fn value(&self) -> f64 {
        self.rating.rating
    }
}

/// Map each user id to its cluster; user ids are unique in the user table
pub fn cluster_lookup(users: &[ClusteredUser]) -> HashMap<UserId, ClusterId> {
    users.iter().map(|u| (u.id(), u.cluster)).collect()
}

/// Attach the owning user's cluster to every rating.
///
/// Output keeps input order. The first rating whose user is missing from
/// `users` aborts the whole pass with [`ColdStartError::UnknownUser`].
pub fn augment_ratings(ratings: Vec<Rating>, users: &[ClusteredUser]) -> Result<Vec<ClusteredRating>> {
    let lookup = cluster_lookup(users);

    let augmented = ratings
        .into_iter()
        .map(|rating| {
            lookup
                .get(&rating.user_id)
                .map(|&cluster| ClusteredRating { rating, cluster })
                .ok_or(ColdStartError::UnknownUser {
                    user_id: rating.user_id,
                })
        })
        .collect::<Result<Vec<_>>>()?;

    info!("Augmented {} ratings with cluster ids", augmented.len());
    Ok(augmented)
}
