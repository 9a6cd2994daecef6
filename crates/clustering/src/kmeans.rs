//! Demographic k-means: users in, users annotated with a cluster id out.

use crate::config::ClusterConfig;
use crate::encoder::OneHotEncoder;
use crate::error::{ClusterError, Result};
use data_loader::{User, UserId};
use linfa::DatasetBase;
use linfa::traits::{Fit, Predict};
use linfa_clustering::KMeans;
use ndarray::{Array1, Array2};
use rand_xoshiro::Xoshiro256Plus;
use rand_xoshiro::rand_core::SeedableRng;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Dense cluster identifier in `[0, k)`
pub type ClusterId = usize;

/// A user record annotated with the cluster it was assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusteredUser {
    pub user: User,
    pub cluster: ClusterId,
}

impl ClusteredUser {
    pub fn id(&self) -> UserId {
        self.user.id
    }
}

/// Partitions users into k groups by their one-hot demographic profile.
///
/// ## Algorithm
/// 1. Fit a [`OneHotEncoder`] on the users and encode them
/// 2. Refuse k larger than the number of distinct profiles
/// 3. Run seeded k-means (k-means++ init, Lloyd iterations, best of
///    `n_runs` restarts)
/// 4. Label each user with its nearest centroid
///
/// The generator is re-seeded from the config on every call, so the same
/// users and config always yield the same labels.
#[derive(Debug, Clone, Default)]
pub struct DemographicClusterer {
    config: ClusterConfig,
}

impl DemographicClusterer {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Assign a cluster to every user, preserving input order.
    #[instrument(skip(self, users), fields(users = users.len(), k = self.config.n_clusters))]
    pub fn assign(&self, users: Vec<User>) -> Result<Vec<ClusteredUser>> {
        let k = self.config.n_clusters;
        if k == 0 {
            return Err(ClusterError::ZeroClusters);
        }

        let (encoder, encoded) = OneHotEncoder::fit_transform(&users)?;
        debug!("Encoded {} users into {} features", users.len(), encoder.width());

        let distinct = distinct_profiles(&users);
        if k > distinct {
            return Err(ClusterError::TooManyClusters {
                requested: k,
                distinct,
            });
        }

        let labels = self.fit_predict(encoded)?;

        let clustered: Vec<ClusteredUser> = users
            .into_iter()
            .zip(labels)
            .map(|(user, cluster)| ClusteredUser { user, cluster })
            .collect();

        info!(sizes = ?cluster_sizes(&clustered, k), "Assigned {} users to {} clusters", clustered.len(), k);
        Ok(clustered)
    }

    fn fit_predict(&self, encoded: Array2<f64>) -> Result<Array1<usize>> {
        let rng = Xoshiro256Plus::seed_from_u64(self.config.seed);
        let dataset = DatasetBase::from(encoded);

        let model = KMeans::params_with_rng(self.config.n_clusters, rng)
            .max_n_iterations(self.config.max_iterations)
            .tolerance(self.config.tolerance)
            .n_runs(self.config.n_runs)
            .fit(&dataset)
            .map_err(|e| ClusterError::KMeans(e.to_string()))?;

        let labels: Array1<usize> = model.predict(dataset.records());
        Ok(labels)
    }
}

/// Cluster users with `k` clusters and otherwise default settings.
pub fn assign_clusters(users: Vec<User>, k: usize) -> Result<Vec<ClusteredUser>> {
    DemographicClusterer::new(ClusterConfig::new(k)).assign(users)
}

/// Number of distinct encoded rows, i.e. distinct (gender, age, occupation)
fn distinct_profiles(users: &[User]) -> usize {
    users
        .iter()
        .map(|u| (u.gender, u.age, u.occupation))
        .collect::<HashSet<_>>()
        .len()
}

/// Users per cluster, indexed by cluster id
pub fn cluster_sizes(users: &[ClusteredUser], k: usize) -> Vec<usize> {
    let mut sizes = vec![0; k];
    for user in users {
        if let Some(size) = sizes.get_mut(user.cluster) {
            *size += 1;
        }
    }
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{AgeGroup, Gender, Occupation};

    fn user(id: u32, gender: Gender, age: AgeGroup, occupation: Occupation) -> User {
        User {
            id,
            gender,
            age,
            occupation,
            zipcode: format!("{:05}", id),
        }
    }

    /// Two demographic groups with no attribute in common
    fn two_group_users() -> Vec<User> {
        let mut users = Vec::new();
        for id in 0..6 {
            users.push(user(id, Gender::Male, AgeGroup::Age25To34, Occupation::Programmer));
        }
        for id in 6..12 {
            users.push(user(id, Gender::Female, AgeGroup::Age56Plus, Occupation::Retired));
        }
        users
    }

    #[test]
    fn test_labels_in_range() {
        let users = two_group_users();
        let clustered = assign_clusters(users.clone(), 2).unwrap();

        assert_eq!(clustered.len(), users.len());
        for (original, annotated) in users.iter().zip(&clustered) {
            assert_eq!(original, &annotated.user);
            assert!(annotated.cluster < 2);
        }
    }

    #[test]
    fn test_groups_are_separated() {
        let clustered = assign_clusters(two_group_users(), 2).unwrap();

        assert!(clustered[..6].iter().all(|u| u.cluster == clustered[0].cluster));
        assert!(clustered[6..].iter().all(|u| u.cluster == clustered[6].cluster));
        assert_ne!(clustered[0].cluster, clustered[6].cluster);
    }

    #[test]
    fn test_single_cluster() {
        let clustered = assign_clusters(two_group_users(), 1).unwrap();
        assert!(clustered.iter().all(|u| u.cluster == 0));
    }

    #[test]
    fn test_too_many_clusters_error() {
        let err = assign_clusters(two_group_users(), 3).unwrap_err();
        assert!(matches!(err, ClusterError::TooManyClusters { requested: 3, distinct: 2 }));
    }

    #[test]
    fn test_zero_clusters_error() {
        assert!(matches!(
            assign_clusters(two_group_users(), 0),
            Err(ClusterError::ZeroClusters)
        ));
    }

    #[test]
    fn test_empty_users_error() {
        assert!(matches!(assign_clusters(Vec::new(), 2), Err(ClusterError::NoUsers)));
    }

    #[test]
    fn test_cluster_sizes() {
        let clustered = assign_clusters(two_group_users(), 2).unwrap();
        let sizes = cluster_sizes(&clustered, 2);
        assert_eq!(sizes, vec![6, 6]);
    }
}
