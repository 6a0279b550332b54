//! Core traits for view filtering.
//!
//! Views that narrow the candidate list (new releases, now showing, genre)
//! are built from composable filters sharing one context.

use catalog::{Movie, PreferenceProfile};
use chrono::NaiveDate;

/// Inputs shared by every filter and scorer during one ranking call
#[derive(Debug, Clone, Copy)]
pub struct RankingContext<'a> {
    /// The current date; recency windows are measured from it
    pub today: NaiveDate,
    pub profile: &'a PreferenceProfile,
}

impl<'a> RankingContext<'a> {
    pub fn new(today: NaiveDate, profile: &'a PreferenceProfile) -> Self {
        Self { today, profile }
    }
}

/// Core trait for filtering candidates.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be used in concurrent contexts
/// - Filters take ownership of the Vec<Movie> and return a filtered Vec
/// - Filters must keep the relative order of the movies they retain
/// - Filters cannot fail: a movie with unusable data is simply dropped
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    fn apply(&self, movies: Vec<Movie>, context: &RankingContext<'_>) -> Vec<Movie>;
}
