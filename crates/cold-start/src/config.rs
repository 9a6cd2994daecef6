//! Configuration for the end-to-end cold-start model.

use clustering::ClusterConfig;
use serde::{Deserialize, Serialize};

/// Which aggregate answers a query for a known user and a known movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnownPairPolicy {
    /// Average over every rating in the user's cluster, whatever the movie.
    /// Same answer as for a known user and an unknown movie.
    #[default]
    ClusterWide,
    /// Average over the ratings the user's cluster gave to this movie only.
    ClusterMovie,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColdStartConfig {
    pub clustering: ClusterConfig,
    pub known_pair: KnownPairPolicy,
}

impl ColdStartConfig {
    pub fn new(clustering: ClusterConfig) -> Self {
        Self {
            clustering,
            known_pair: KnownPairPolicy::default(),
        }
    }

    pub fn with_known_pair(mut self, policy: KnownPairPolicy) -> Self {
        self.known_pair = policy;
        self
    }
}
