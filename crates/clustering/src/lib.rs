//! # Clustering Crate
//!
//! Groups users by demographic similarity so that the cold-start resolver
//! has a "people like you" aggregate to fall back on.
//!
//! ## Components
//!
//! - **encoder**: One-hot encoding of gender, age and occupation
//! - **kmeans**: Seeded k-means over the encoded matrix (via linfa)
//! - **config**: Cluster count, seed and iteration limits
//!
//! ## Example Usage
//!
//! ```ignore
//! use clustering::{ClusterConfig, DemographicClusterer};
//!
//! let clusterer = DemographicClusterer::new(ClusterConfig::new(8).with_seed(42));
//! let clustered = clusterer.assign(dataset.users)?;
//! println!("user {} is in cluster {}", clustered[0].id(), clustered[0].cluster);
//! ```

pub mod config;
pub mod encoder;
pub mod error;
pub mod kmeans;

pub use config::{ClusterConfig, DEFAULT_CLUSTERS, DEFAULT_SEED};
pub use encoder::{Categorical, OneHotEncoder};
pub use error::{ClusterError, Result};
pub use kmeans::{ClusterId, ClusteredUser, DemographicClusterer, assign_clusters, cluster_sizes};
