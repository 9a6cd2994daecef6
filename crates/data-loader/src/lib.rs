//! # Data Loader Crate
//!
//! Loads the two static sources the cold-start pipeline starts from:
//! demographic user records and historical ratings.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (User, Rating, Dataset and the categorical enums)
//! - **parser**: Parse `users.dat` and JSON Lines / `::` rating files
//! - **loader**: Parallel loading and validation into a Dataset
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Dataset;
//! use std::path::Path;
//!
//! let dataset = Dataset::load_from_dir(Path::new("data"))?;
//! let (users, ratings) = dataset.counts();
//! println!("{} users, {} ratings", users, ratings);
//! ```

pub mod error;
pub mod loader;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use loader::{RATINGS_FILE, USERS_FILE};
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Core types
    User,
    Rating,
    Dataset,
    // Enums
    Gender,
    AgeGroup,
    Occupation,
};
