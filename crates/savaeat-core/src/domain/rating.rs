//! Incremental rating aggregate.
//!
//! A vendor stores `(average, count)` rather than recomputing the mean over
//! every review on each write. The transitions below keep that pair equal to
//! the mean of the current review ratings, up to floating-point rounding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The `(average, count)` pair maintained on every vendor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingAggregate {
    pub average: f64,
    pub count: u32,
}

/// Raised when a transition is impossible for the current aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("cannot replace a rating on an aggregate with no ratings")]
    EmptyAggregate,
}

impl Default for RatingAggregate {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl RatingAggregate {
    /// No ratings at all.
    pub const EMPTY: Self = Self {
        average: 0.0,
        count: 0,
    };

    pub const fn new(average: f64, count: u32) -> Self {
        Self { average, count }
    }

    fn total(&self) -> f64 {
        self.average * f64::from(self.count)
    }

    /// Aggregate after a new rating is added.
    #[must_use]
    pub fn with_added(&self, rating: u8) -> Self {
        let count = self.count + 1;
        Self {
            average: (self.total() + f64::from(rating)) / f64::from(count),
            count,
        }
    }

    /// Aggregate after an existing rating changes from `old` to `new`.
    pub fn with_replaced(&self, old: u8, new: u8) -> Result<Self, AggregateError> {
        if self.count == 0 {
            return Err(AggregateError::EmptyAggregate);
        }
        Ok(Self {
            average: (self.total() - f64::from(old) + f64::from(new)) / f64::from(self.count),
            count: self.count,
        })
    }

    /// Aggregate after a rating is removed.
    ///
    /// Removing the last rating resets to exactly `(0, 0)`.
    #[must_use]
    pub fn with_removed(&self, rating: u8) -> Self {
        if self.count <= 1 {
            return Self::EMPTY;
        }
        let count = self.count - 1;
        Self {
            average: (self.total() - f64::from(rating)) / f64::from(count),
            count,
        }
    }

    /// Rebuild an aggregate from a complete list of ratings.
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let (sum, count) = ratings
            .into_iter()
            .fold((0u64, 0u32), |(sum, count), r| (sum + u64::from(r), count + 1));
        if count == 0 {
            return Self::EMPTY;
        }
        Self {
            average: sum as f64 / f64::from(count),
            count,
        }
    }
}
