//! # Cold-Start Crate
//!
//! Fallback rating predictions for users and movies with little or no
//! rating history.
//!
//! ## Architecture
//! The model is built in stages, each consuming the previous one's output:
//! 1. `clustering` groups users by gender, age and occupation
//! 2. [`augment`] tags every rating with its user's cluster
//! 3. [`index`] groups the tagged ratings by cluster, movie and both
//! 4. [`resolver`] answers (user, movie) queries from those groups
//!
//! ## Example Usage
//! ```ignore
//! use cold_start::{ColdStartConfig, ColdStartModel};
//! use data_loader::Dataset;
//!
//! let dataset = Dataset::load_from_dir(Path::new("data"))?;
//! let model = ColdStartModel::build(dataset, &ColdStartConfig::default())?;
//!
//! let rating = model.predict_rating(1, 1193)?;
//! ```

pub mod augment;
pub mod config;
pub mod error;
pub mod index;
pub mod model;
pub mod resolver;

// Re-export main types
pub use augment::{ClusteredRating, augment_ratings};
pub use config::{ColdStartConfig, KnownPairPolicy};
pub use error::{ColdStartError, Result};
pub use index::RatingIndex;
pub use model::{ClusterSummary, ColdStartModel};
pub use resolver::{Aggregate, ColdStartResolver, Prediction};
