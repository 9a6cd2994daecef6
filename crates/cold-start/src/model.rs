//! End-to-end cold-start model: cluster, augment, index, resolve.

use crate::augment::augment_ratings;
use crate::config::ColdStartConfig;
use crate::error::Result;
use crate::index::RatingIndex;
use crate::resolver::{ColdStartResolver, Prediction, mean};
use clustering::{ClusterId, ClusteredUser, DemographicClusterer, cluster_sizes};
use data_loader::{Dataset, MovieId, UserId};
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// Per-cluster statistics, for inspection and reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub cluster: ClusterId,
    pub user_count: usize,
    pub rating_count: usize,
    /// `None` when no user in the cluster has rated anything
    pub avg_rating: Option<f64>,
}

/// Clustered users plus a resolver over their augmented ratings.
///
/// Built once per run; every query afterwards is read-only.
#[derive(Debug, Clone)]
pub struct ColdStartModel {
    users: Vec<ClusteredUser>,
    user_positions: HashMap<UserId, usize>,
    n_clusters: usize,
    resolver: ColdStartResolver,
}

impl ColdStartModel {
    /// Run cluster assignment and rating augmentation over a loaded dataset.
    ///
    /// ## Steps
    /// 1. Cluster users by demographics
    /// 2. Attach each rating's user cluster (unknown users are fatal)
    /// 3. Index the augmented ratings for constant-time lookups
    pub fn build(dataset: Dataset, config: &ColdStartConfig) -> Result<Self> {
        let Dataset { users, ratings } = dataset;

        let clusterer = DemographicClusterer::new(config.clustering.clone());
        let users = clusterer.assign(users)?;
        let augmented = augment_ratings(ratings, &users)?;

        let index = RatingIndex::build(&users, &augmented);
        let user_positions = users
            .iter()
            .enumerate()
            .map(|(position, user)| (user.id(), position))
            .collect();

        info!(
            users = users.len(),
            ratings = augmented.len(),
            policy = ?config.known_pair,
            "Cold-start model ready"
        );

        Ok(Self {
            users,
            user_positions,
            n_clusters: config.clustering.n_clusters,
            resolver: ColdStartResolver::new(index, config.known_pair),
        })
    }

    pub fn predict_rating(&self, user_id: UserId, movie_id: MovieId) -> Result<f64> {
        self.resolver.predict_rating(user_id, movie_id)
    }

    pub fn resolve(&self, user_id: UserId, movie_id: MovieId) -> Result<Prediction> {
        self.resolver.resolve(user_id, movie_id)
    }

    pub fn resolver(&self) -> &ColdStartResolver {
        &self.resolver
    }

    pub fn users(&self) -> &[ClusteredUser] {
        &self.users
    }

    pub fn get_user(&self, user_id: UserId) -> Option<&ClusteredUser> {
        self.user_positions
            .get(&user_id)
            .map(|&position| &self.users[position])
    }

    pub fn cluster_of(&self, user_id: UserId) -> Option<ClusterId> {
        self.resolver.index().user_cluster(user_id)
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// One summary per cluster id, in id order
    pub fn cluster_summaries(&self) -> Vec<ClusterSummary> {
        let sizes = cluster_sizes(&self.users, self.n_clusters);
        let index = self.resolver.index();

        sizes
            .into_iter()
            .enumerate()
            .map(|(cluster, user_count)| {
                let ratings = index.cluster_ratings(cluster);
                ClusterSummary {
                    cluster,
                    user_count,
                    rating_count: ratings.len(),
                    avg_rating: mean(ratings),
                }
            })
            .collect()
    }
}
