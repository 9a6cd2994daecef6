//! Clustering configuration.

use serde::{Deserialize, Serialize};

/// Default number of demographic clusters
pub const DEFAULT_CLUSTERS: usize = 8;

/// Default seed for the k-means random number generator
pub const DEFAULT_SEED: u64 = 42;

/// Parameters for the demographic k-means step.
///
/// Defaults match the usual k-means settings: 8 clusters, 300 Lloyd
/// iterations, tolerance 1e-4, 10 restarts with the best inertia kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub n_clusters: usize,
    pub seed: u64,
    pub max_iterations: u64,
    pub tolerance: f64,
    pub n_runs: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            n_clusters: DEFAULT_CLUSTERS,
            seed: DEFAULT_SEED,
            max_iterations: 300,
            tolerance: 1e-4,
            n_runs: 10,
        }
    }
}

impl ClusterConfig {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Number of k-means restarts; the run with the lowest inertia wins
    pub fn with_n_runs(mut self, n_runs: usize) -> Self {
        self.n_runs = n_runs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ClusterConfig::new(4).with_seed(7).with_n_runs(3);
        assert_eq!(config.n_clusters, 4);
        assert_eq!(config.seed, 7);
        assert_eq!(config.n_runs, 3);
        assert_eq!(config.max_iterations, 300);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ClusterConfig = serde_json::from_str("{\"n_clusters\": 5}").unwrap();
        assert_eq!(config.n_clusters, 5);
        assert_eq!(config.seed, DEFAULT_SEED);
    }
}
