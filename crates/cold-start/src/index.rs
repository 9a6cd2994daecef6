//! Lookup tables over the augmented ratings.
//!
//! Built once after augmentation so that every query is a handful of hash
//! lookups instead of a scan over the rating table.

use crate::augment::ClusteredRating;
use clustering::{ClusterId, ClusteredUser};
use data_loader::{MovieId, UserId};
use std::collections::HashMap;

/// Rating values grouped every way the resolver needs them.
#[derive(Debug, Clone, Default)]
pub struct RatingIndex {
    /// Cluster of every user in the user table, rated or not
    user_clusters: HashMap<UserId, ClusterId>,
    by_cluster: HashMap<ClusterId, Vec<f64>>,
    by_movie: HashMap<MovieId, Vec<f64>>,
    by_cluster_movie: HashMap<(ClusterId, MovieId), Vec<f64>>,
    all: Vec<f64>,
}

impl RatingIndex {
    pub fn build(users: &[ClusteredUser], ratings: &[ClusteredRating]) -> Self {
        let mut index = Self {
            user_clusters: crate::augment::cluster_lookup(users),
            all: Vec::with_capacity(ratings.len()),
            ..Self::default()
        };

        for rating in ratings {
            let value = rating.value();
            index.by_cluster.entry(rating.cluster).or_default().push(value);
            index.by_movie.entry(rating.movie_id()).or_default().push(value);
            index
                .by_cluster_movie
                .entry((rating.cluster, rating.movie_id()))
                .or_default()
                .push(value);
            index.all.push(value);
        }
        index
    }

    /// Cluster of a user, `None` if the user is not in the user table
    pub fn user_cluster(&self, user_id: UserId) -> Option<ClusterId> {
        self.user_clusters.get(&user_id).copied()
    }

    pub fn has_movie(&self, movie_id: MovieId) -> bool {
        self.by_movie.contains_key(&movie_id)
    }

    pub fn cluster_ratings(&self, cluster: ClusterId) -> &[f64] {
        self.by_cluster
            .get(&cluster)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn movie_ratings(&self, movie_id: MovieId) -> &[f64] {
        self.by_movie
            .get(&movie_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn cluster_movie_ratings(&self, cluster: ClusterId, movie_id: MovieId) -> &[f64] {
        self.by_cluster_movie
            .get(&(cluster, movie_id))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn all_ratings(&self) -> &[f64] {
        &self.all
    }

    /// Number of users and ratings indexed
    pub fn counts(&self) -> (usize, usize) {
        (self.user_clusters.len(), self.all.len())
    }
}
