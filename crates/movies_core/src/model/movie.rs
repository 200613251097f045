//! Movie and genre records.
//!
//! # Invariants
//! - `Movie::genres` is ordered by genre id ascending and has no duplicates.
//! - A movie may carry no genre at all (`genres` is empty).
//! - `rating` is finite and non-negative.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned movie identifier.
pub type MovieId = i64;

/// Store-assigned genre identifier.
pub type GenreId = i64;

/// Named classification used for display and as a search filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// Catalog entry as returned by every movie query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Short marketing line shown under the title.
    pub tagline: Option<String>,
    pub release_year: i32,
    pub overview: Option<String>,
    /// Aggregate score used for top ranking and the default search order.
    pub rating: f64,
    pub popularity: Option<f64>,
    /// Original language code, e.g. `en`.
    pub language: Option<String>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub genres: Vec<Genre>,
}

/// Invalid persisted movie state detected while reading rows.
#[derive(Debug, Clone, PartialEq)]
pub enum MovieValidationError {
    EmptyTitle,
    InvalidRating(f64),
}

impl Display for MovieValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "movie title cannot be empty"),
            Self::InvalidRating(value) => {
                write!(f, "movie rating must be finite and >= 0, got {value}")
            }
        }
    }
}

impl Error for MovieValidationError {}

impl Movie {
    /// Checks the record invariants that the schema alone cannot express.
    pub fn validate(&self) -> Result<(), MovieValidationError> {
        if self.title.trim().is_empty() {
            return Err(MovieValidationError::EmptyTitle);
        }
        if !self.rating.is_finite() || self.rating < 0.0 {
            return Err(MovieValidationError::InvalidRating(self.rating));
        }
        Ok(())
    }
}
