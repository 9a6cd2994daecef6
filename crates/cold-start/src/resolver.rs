//! Cold-start rating resolution.
//!
//! Given a (user, movie) pair, pick the finest aggregate the data supports
//! and return its mean rating:
//!
//! | user known | movie known | aggregate                                   |
//! |------------|-------------|---------------------------------------------|
//! | yes        | yes         | user's cluster (or cluster + movie, opt-in)  |
//! | yes        | no          | user's cluster                               |
//! | no         | yes         | movie                                        |
//! | no         | no          | every rating                                 |
//!
//! A user is known when present in the user table; a movie is known when at
//! least one augmented rating references it.

use crate::config::KnownPairPolicy;
use crate::error::{ColdStartError, Result};
use crate::index::RatingIndex;
use clustering::ClusterId;
use data_loader::{MovieId, UserId};
use serde::Serialize;
use std::fmt;
use tracing::{debug, instrument};

/// The set of ratings a prediction was averaged over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Aggregate {
    Cluster(ClusterId),
    ClusterMovie { cluster: ClusterId, movie_id: MovieId },
    Movie(MovieId),
    Global,
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregate::Cluster(cluster) => write!(f, "cluster {} average", cluster),
            Aggregate::ClusterMovie { cluster, movie_id } => {
                write!(f, "cluster {} average for movie {}", cluster, movie_id)
            }
            Aggregate::Movie(movie_id) => write!(f, "movie {} average", movie_id),
            Aggregate::Global => write!(f, "global average"),
        }
    }
}

/// A predicted rating with the aggregate that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub rating: f64,
    pub aggregate: Aggregate,
    /// Number of ratings averaged
    pub sample_count: usize,
}

/// Answers cold-start queries against an immutable [`RatingIndex`].
///
/// Holds no mutable state, so one resolver can serve any number of
/// threads through a shared reference or an `Arc`.
#[derive(Debug, Clone)]
pub struct ColdStartResolver {
    index: RatingIndex,
    known_pair: KnownPairPolicy,
}

impl ColdStartResolver {
    pub fn new(index: RatingIndex, known_pair: KnownPairPolicy) -> Self {
        Self { index, known_pair }
    }

    pub fn index(&self) -> &RatingIndex {
        &self.index
    }

    pub fn known_pair_policy(&self) -> KnownPairPolicy {
        self.known_pair
    }

    /// Decide which aggregate answers this query, without computing it.
    pub fn select_aggregate(&self, user_id: UserId, movie_id: MovieId) -> Aggregate {
        let movie_known = self.index.has_movie(movie_id);

        match (self.index.user_cluster(user_id), movie_known) {
            (Some(cluster), true) => match self.known_pair {
                KnownPairPolicy::ClusterWide => Aggregate::Cluster(cluster),
                KnownPairPolicy::ClusterMovie => Aggregate::ClusterMovie { cluster, movie_id },
            },
            (Some(cluster), false) => Aggregate::Cluster(cluster),
            (None, true) => Aggregate::Movie(movie_id),
            (None, false) => Aggregate::Global,
        }
    }

    /// Predict a rating together with the aggregate it came from.
    #[instrument(level = "debug", skip(self))]
    pub fn resolve(&self, user_id: UserId, movie_id: MovieId) -> Result<Prediction> {
        let aggregate = self.select_aggregate(user_id, movie_id);
        let values = self.values(aggregate);

        let rating = mean(values).ok_or(ColdStartError::EmptyAggregate { aggregate })?;
        debug!(%aggregate, samples = values.len(), rating, "Resolved cold-start rating");

        Ok(Prediction {
            rating,
            aggregate,
            sample_count: values.len(),
        })
    }

    /// Predict a rating for the pair.
    pub fn predict_rating(&self, user_id: UserId, movie_id: MovieId) -> Result<f64> {
        self.resolve(user_id, movie_id).map(|p| p.rating)
    }

    fn values(&self, aggregate: Aggregate) -> &[f64] {
        match aggregate {
            Aggregate::Cluster(cluster) => self.index.cluster_ratings(cluster),
            Aggregate::ClusterMovie { cluster, movie_id } => {
                self.index.cluster_movie_ratings(cluster, movie_id)
            }
            Aggregate::Movie(movie_id) => self.index.movie_ratings(movie_id),
            Aggregate::Global => self.index.all_ratings(),
        }
    }
}

/// Arithmetic mean; `None` for an empty set.
///
/// A single value is returned as-is rather than divided by one.
pub fn mean(values: &[f64]) -> Option<f64> {
    match values {
        [] => None,
        [only] => Some(*only),
        _ => Some(values.iter().sum::<f64>() / values.len() as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augment::ClusteredRating;
    use clustering::ClusteredUser;
    use data_loader::{AgeGroup, Gender, Occupation, Rating, User};

    fn clustered_user(id: UserId, cluster: ClusterId) -> ClusteredUser {
        ClusteredUser {
            user: User {
                id,
                gender: Gender::Female,
                age: AgeGroup::Age25To34,
                occupation: Occupation::Writer,
                zipcode: "10001".to_string(),
            },
            cluster,
        }
    }

    fn rated(user_id: UserId, movie_id: MovieId, rating: f64, cluster: ClusterId) -> ClusteredRating {
        ClusteredRating {
            rating: Rating { user_id, movie_id, rating, timestamp: 0 },
            cluster,
        }
    }

    /// Users 1, 2 in cluster 3; user 4 in cluster 0; user 5 in cluster 1 with no ratings.
    fn create_test_resolver(policy: KnownPairPolicy) -> ColdStartResolver {
        let users = vec![
            clustered_user(1, 3),
            clustered_user(2, 3),
            clustered_user(4, 0),
            clustered_user(5, 1),
        ];
        let ratings = vec![
            rated(1, 42, 4.0, 3),
            rated(2, 7, 5.0, 3),
            rated(1, 8, 3.0, 3),
            rated(4, 42, 2.0, 0),
            rated(4, 9, 1.0, 0),
        ];
        ColdStartResolver::new(RatingIndex::build(&users, &ratings), policy)
    }

    #[test]
    fn test_known_user_known_movie_uses_whole_cluster() {
        let resolver = create_test_resolver(KnownPairPolicy::ClusterWide);

        // cluster 3 holds [4.0, 5.0, 3.0]
        let prediction = resolver.resolve(1, 42).unwrap();
        assert_eq!(prediction.rating, 4.0);
        assert_eq!(prediction.aggregate, Aggregate::Cluster(3));
        assert_eq!(prediction.sample_count, 3);
    }

    #[test]
    fn test_known_user_unknown_movie_uses_cluster() {
        let resolver = create_test_resolver(KnownPairPolicy::ClusterWide);

        assert_eq!(resolver.predict_rating(2, 999).unwrap(), 4.0);
        assert_eq!(resolver.predict_rating(4, 999).unwrap(), 1.5);
    }

    #[test]
    fn test_unknown_user_known_movie_uses_movie() {
        let resolver = create_test_resolver(KnownPairPolicy::ClusterWide);

        // movie 42 holds [4.0, 2.0]
        let prediction = resolver.resolve(100, 42).unwrap();
        assert_eq!(prediction.rating, 3.0);
        assert_eq!(prediction.aggregate, Aggregate::Movie(42));
    }

    #[test]
    fn test_unknown_user_unknown_movie_uses_global() {
        let resolver = create_test_resolver(KnownPairPolicy::ClusterWide);

        let prediction = resolver.resolve(100, 999).unwrap();
        assert_eq!(prediction.aggregate, Aggregate::Global);
        assert_eq!(prediction.rating, 3.0); // (4 + 5 + 3 + 2 + 1) / 5
        assert_eq!(prediction.sample_count, 5);
    }

    #[test]
    fn test_cluster_without_ratings_is_an_error() {
        let resolver = create_test_resolver(KnownPairPolicy::ClusterWide);

        let err = resolver.predict_rating(5, 42).unwrap_err();
        assert!(matches!(
            err,
            ColdStartError::EmptyAggregate { aggregate: Aggregate::Cluster(1) }
        ));
    }

    #[test]
    fn test_empty_table_global_is_an_error() {
        let resolver = ColdStartResolver::new(RatingIndex::default(), KnownPairPolicy::ClusterWide);

        let err = resolver.predict_rating(1, 1).unwrap_err();
        assert!(matches!(err, ColdStartError::EmptyAggregate { aggregate: Aggregate::Global }));
    }

    #[test]
    fn test_cluster_movie_policy() {
        let resolver = create_test_resolver(KnownPairPolicy::ClusterMovie);

        let prediction = resolver.resolve(1, 42).unwrap();
        assert_eq!(prediction.aggregate, Aggregate::ClusterMovie { cluster: 3, movie_id: 42 });
        assert_eq!(prediction.rating, 4.0);

        // movie 9 is known, but cluster 3 never rated it
        let err = resolver.predict_rating(1, 9).unwrap_err();
        assert!(matches!(err, ColdStartError::EmptyAggregate { .. }));

        // the policy only changes the known/known branch
        assert_eq!(resolver.select_aggregate(1, 999), Aggregate::Cluster(3));
    }

    #[test]
    fn test_single_value_is_returned_exactly() {
        assert_eq!(mean(&[3.7]), Some(3.7));

        let users = vec![clustered_user(1, 0)];
        let ratings = vec![rated(1, 5, 3.7, 0)];
        let resolver =
            ColdStartResolver::new(RatingIndex::build(&users, &ratings), KnownPairPolicy::ClusterWide);
        assert_eq!(resolver.predict_rating(77, 5).unwrap(), 3.7);
        assert_eq!(resolver.predict_rating(1, 999).unwrap(), 3.7);
    }

    #[test]
    fn test_mean_of_fractional_values() {
        let users = vec![clustered_user(1, 0), clustered_user(2, 0)];
        let ratings = vec![rated(1, 5, 3.7, 0), rated(2, 6, 4.1, 0)];
        let resolver =
            ColdStartResolver::new(RatingIndex::build(&users, &ratings), KnownPairPolicy::ClusterWide);

        assert_eq!(resolver.predict_rating(77, 999).unwrap(), (3.7 + 4.1) / 2.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
        assert_eq!(mean(&[4.0, 5.0, 3.0]), Some(4.0));
    }

    #[test]
    fn test_resolver_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ColdStartResolver>();
    }

    #[test]
    fn test_aggregate_display() {
        assert_eq!(Aggregate::Cluster(2).to_string(), "cluster 2 average");
        assert_eq!(Aggregate::Global.to_string(), "global average");
    }
}
