//! Loading and validating both sources into a [`Dataset`].

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Default user source name inside a data directory
pub const USERS_FILE: &str = "users.dat";

/// Default rating source name inside a data directory
pub const RATINGS_FILE: &str = "ratings.json";

impl Dataset {
    /// Load `users.dat` and `ratings.json` from a data directory
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        Self::load_from_files(&data_dir.join(USERS_FILE), &data_dir.join(RATINGS_FILE))
    }

    /// Load both sources and validate them.
    ///
    /// The two files are parsed in parallel with `rayon::join`; the first
    /// error from either side is returned.
    pub fn load_from_files(users_path: &Path, ratings_path: &Path) -> Result<Self> {
        info!(
            users = %users_path.display(),
            ratings = %ratings_path.display(),
            "Loading sources"
        );

        let (users, ratings) = rayon::join(
            || parser::parse_users(users_path),
            || parser::parse_ratings(ratings_path),
        );
        let dataset = Dataset::new(users?, ratings?);

        dataset.validate()?;

        let (users, ratings) = dataset.counts();
        info!("Loaded {} users, {} ratings", users, ratings);
        Ok(dataset)
    }

    /// Validate data integrity
    ///
    /// Checks that user ids are unique and that every rating value is
    /// finite. The rating scale itself is not enforced. References from ratings to users are
    /// not checked here; augmentation reports those as lookup failures.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.users.len());
        for user in &self.users {
            if !seen.insert(user.id) {
                return Err(DataLoadError::ValidationError(format!(
                    "duplicate user id {}",
                    user.id
                )));
            }
        }

        for rating in &self.ratings {
            if !rating.rating.is_finite() {
                return Err(DataLoadError::InvalidValue {
                    field: "rating".to_string(),
                    value: rating.rating.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: UserId) -> User {
        User {
            id,
            gender: Gender::Male,
            age: AgeGroup::Age25To34,
            occupation: Occupation::Programmer,
            zipcode: "12345".to_string(),
        }
    }

    fn rating(user_id: UserId, rating: f64) -> Rating {
        Rating { user_id, movie_id: 1, rating, timestamp: 0 }
    }

    #[test]
    fn test_validate_accepts_clean_data() {
        let dataset = Dataset::new(vec![user(1), user(2)], vec![rating(1, 1.0), rating(2, 5.0)]);
        assert!(dataset.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_users() {
        let dataset = Dataset::new(vec![user(1), user(1)], vec![]);
        assert!(matches!(dataset.validate(), Err(DataLoadError::ValidationError(_))));
    }

    #[test]
    fn test_validate_rejects_non_finite_rating() {
        let dataset = Dataset::new(vec![user(1)], vec![rating(1, f64::NAN)]);
        assert!(matches!(dataset.validate(), Err(DataLoadError::InvalidValue { .. })));

        let dataset = Dataset::new(vec![user(1)], vec![rating(1, f64::INFINITY)]);
        assert!(dataset.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_any_rating_scale() {
        let dataset = Dataset::new(
            vec![user(1), user(2)],
            vec![rating(1, 0.5), rating(2, 10.0), rating(1, 3.7)],
        );
        assert!(dataset.validate().is_ok());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = std::env::temp_dir().join(format!("data-loader-load-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(USERS_FILE), "1::F::1::10::48067\n2::M::56::16::70072\n").unwrap();
        std::fs::write(
            dir.join(RATINGS_FILE),
            "{\"user_id\": 1, \"movie_id\": 10, \"rating\": 4}\n{\"user_id\": 2, \"movie_id\": 10, \"rating\": 2}\n",
        )
        .unwrap();

        let dataset = Dataset::load_from_dir(&dir).unwrap();
        assert_eq!(dataset.counts(), (2, 2));
    }

    #[test]
    fn test_load_missing_ratings() {
        let dir = std::env::temp_dir().join(format!("data-loader-missing-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(USERS_FILE), "1::F::1::10::48067\n").unwrap();

        let result = Dataset::load_from_files(&dir.join(USERS_FILE), &dir.join("absent.json"));
        assert!(matches!(result, Err(DataLoadError::FileNotFound { .. })));
    }
}
