//! One-hot encoding of the demographic attributes.
//!
//! Each of gender, age and occupation becomes a block of indicator columns,
//! one per category observed while fitting. Blocks are laid out in that
//! order and categories inside a block ascend by their dataset code, so
//! feature names read `gender_F, gender_M, age_1, age_18, ..., occupation_20`.

use crate::error::{ClusterError, Result};
use data_loader::{AgeGroup, Gender, Occupation, User};
use ndarray::Array2;
use rayon::prelude::*;
use std::collections::BTreeSet;

/// A categorical attribute that can be one-hot encoded.
pub trait Categorical: Copy + Ord + Send + Sync {
    /// Column prefix used in feature names
    const FIELD: &'static str;

    /// Raw code of this category
    fn code(self) -> &'static str;
}

impl Categorical for Gender {
    const FIELD: &'static str = "gender";

    fn code(self) -> &'static str {
        Gender::code(self)
    }
}

impl Categorical for AgeGroup {
    const FIELD: &'static str = "age";

    fn code(self) -> &'static str {
        AgeGroup::code(self)
    }
}

impl Categorical for Occupation {
    const FIELD: &'static str = "occupation";

    fn code(self) -> &'static str {
        Occupation::code(self)
    }
}

/// The sorted categories observed for one attribute.
#[derive(Debug, Clone)]
pub struct CategoryColumn<T: Categorical> {
    categories: Vec<T>,
}

impl<T: Categorical> CategoryColumn<T> {
    fn fit(values: impl Iterator<Item = T>) -> Self {
        let categories: BTreeSet<T> = values.collect();
        Self {
            categories: categories.into_iter().collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.categories.len()
    }

    fn position(&self, value: T) -> Result<usize> {
        self.categories
            .binary_search(&value)
            .map_err(|_| ClusterError::UnknownCategory {
                field: T::FIELD.to_string(),
                value: value.code().to_string(),
            })
    }

    fn feature_names(&self) -> impl Iterator<Item = String> + '_ {
        self.categories
            .iter()
            .map(|category| format!("{}_{}", T::FIELD, category.code()))
    }
}

/// One-hot encoder over (gender, age, occupation).
///
/// ## Algorithm
/// 1. `fit` records the distinct categories of each attribute
/// 2. `encode_user` sets exactly one indicator per attribute block
/// 3. `transform` stacks the rows into an `n_users x width` matrix
///
/// Categories absent at fit time have no column; encoding a user with such a
/// category fails with [`ClusterError::UnknownCategory`].
#[derive(Debug, Clone)]
pub struct OneHotEncoder {
    gender: CategoryColumn<Gender>,
    age: CategoryColumn<AgeGroup>,
    occupation: CategoryColumn<Occupation>,
}

impl OneHotEncoder {
    /// Fit the encoder on the categories present in `users`
    pub fn fit(users: &[User]) -> Result<Self> {
        if users.is_empty() {
            return Err(ClusterError::NoUsers);
        }
        Ok(Self {
            gender: CategoryColumn::fit(users.iter().map(|u| u.gender)),
            age: CategoryColumn::fit(users.iter().map(|u| u.age)),
            occupation: CategoryColumn::fit(users.iter().map(|u| u.occupation)),
        })
    }

    /// Total number of indicator columns
    pub fn width(&self) -> usize {
        self.gender.width() + self.age.width() + self.occupation.width()
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.gender
            .feature_names()
            .chain(self.age.feature_names())
            .chain(self.occupation.feature_names())
            .collect()
    }

    /// Encode a single user as a dense indicator row
    pub fn encode_user(&self, user: &User) -> Result<Vec<f64>> {
        let age_offset = self.gender.width();
        let occupation_offset = age_offset + self.age.width();

        let mut row = vec![0.0; self.width()];
        row[self.gender.position(user.gender)?] = 1.0;
        row[age_offset + self.age.position(user.age)?] = 1.0;
        row[occupation_offset + self.occupation.position(user.occupation)?] = 1.0;
        Ok(row)
    }

    /// Encode every user; rows follow the input order.
    pub fn transform(&self, users: &[User]) -> Result<Array2<f64>> {
        let rows = users
            .par_iter()
            .map(|user| self.encode_user(user))
            .collect::<Result<Vec<_>>>()?;

        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        Array2::from_shape_vec((users.len(), self.width()), flat)
            .map_err(|e| ClusterError::Shape(e.to_string()))
    }

    pub fn fit_transform(users: &[User]) -> Result<(Self, Array2<f64>)> {
        let encoder = Self::fit(users)?;
        let matrix = encoder.transform(users)?;
        Ok((encoder, matrix))
    }
}
