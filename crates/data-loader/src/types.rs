//! Core domain types for the demographic and rating sources.
//!
//! The categorical enums derive `Ord` in dataset-code order so that any
//! consumer sorting categories (the one-hot encoder does) sees them in the
//! same ascending order as the raw codes in `users.dat`.

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

// =============================================================================
// User-related Types
// =============================================================================

/// A user record from `users.dat`.
///
/// The zipcode is carried through but takes no part in clustering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub gender: Gender,
    pub age: AgeGroup,
    pub occupation: Occupation,
    pub zipcode: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    /// Raw code as it appears in `users.dat`
    pub fn code(self) -> &'static str {
        match self {
            Gender::Female => "F",
            Gender::Male => "M",
        }
    }
}

/// Age buckets, keyed in the source by the lower bound of the bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Under18,
    Age18To24,
    Age25To34,
    Age35To44,
    Age45To49,
    Age50To55,
    Age56Plus,
}

impl AgeGroup {
    pub fn code(self) -> &'static str {
        match self {
            AgeGroup::Under18 => "1",
            AgeGroup::Age18To24 => "18",
            AgeGroup::Age25To34 => "25",
            AgeGroup::Age35To44 => "35",
            AgeGroup::Age45To49 => "45",
            AgeGroup::Age50To55 => "50",
            AgeGroup::Age56Plus => "56",
        }
    }
}

/// Occupation categories, declared in source-code order (0 = Other .. 20 = Writer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Occupation {
    Other,
    Academic,
    Artist,
    Clerical,
    CollegeStudent,
    CustomerService,
    Doctor,
    Executive,
    Farmer,
    Homemaker,
    K12Student,
    Lawyer,
    Programmer,
    Retired,
    Sales,
    Scientist,
    SelfEmployed,
    Technician,
    Tradesman,
    Unemployed,
    Writer,
}

impl Occupation {
    pub fn code(self) -> &'static str {
        match self {
            Occupation::Other => "0",
            Occupation::Academic => "1",
            Occupation::Artist => "2",
            Occupation::Clerical => "3",
            Occupation::CollegeStudent => "4",
            Occupation::CustomerService => "5",
            Occupation::Doctor => "6",
            Occupation::Executive => "7",
            Occupation::Farmer => "8",
            Occupation::Homemaker => "9",
            Occupation::K12Student => "10",
            Occupation::Lawyer => "11",
            Occupation::Programmer => "12",
            Occupation::Retired => "13",
            Occupation::Sales => "14",
            Occupation::Scientist => "15",
            Occupation::SelfEmployed => "16",
            Occupation::Technician => "17",
            Occupation::Tradesman => "18",
            Occupation::Unemployed => "19",
            Occupation::Writer => "20",
        }
    }
}

// =============================================================================
// Rating Type
// =============================================================================

/// A single rating from a user for a movie.
///
/// Deserializes directly from one JSON Lines record; fields other than the
/// four below are ignored and a missing `timestamp` defaults to 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value, kept at full precision
    pub rating: f64,
    /// Unix timestamp when rating was made
    #[serde(default)]
    pub timestamp: i64,
}

// =============================================================================
// Dataset
// =============================================================================

/// Raw contents of both sources, in file order.
///
/// Nothing here is indexed: the cold-start stages build their own lookup
/// tables once clusters are known.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub users: Vec<User>,
    pub ratings: Vec<Rating>,
}

impl Dataset {
    pub fn new(users: Vec<User>, ratings: Vec<Rating>) -> Self {
        Self { users, ratings }
    }

    /// Get counts for debugging/validation
    pub fn counts(&self) -> (usize, usize) {
        (self.users.len(), self.ratings.len())
    }
}
