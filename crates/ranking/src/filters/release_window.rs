//! Filter for movies released within a trailing window.
//!
//! Backs both the "new releases" view (7 days) and the "now showing" view
//! (60 days).

use crate::traits::{Filter, RankingContext};
use catalog::Movie;

/// Keeps movies released between `max_days` ago and today, both inclusive.
///
/// ## Algorithm
/// 1. Parse the release date; unparseable or missing dates are dropped
/// 2. Days since release = today - release date
/// 3. Keep if 0 <= days <= max_days (future releases are dropped)
pub struct ReleaseWindowFilter {
    max_days: i64,
}

impl ReleaseWindowFilter {
    pub fn new(max_days: i64) -> Self {
        Self { max_days }
    }

    pub fn contains(&self, movie: &Movie, context: &RankingContext<'_>) -> bool {
        matches!(
            movie.days_since_release(context.today),
            Some(days) if (0..=self.max_days).contains(&days)
        )
    }
}

impl Filter for ReleaseWindowFilter {
    fn name(&self) -> &str {
        "ReleaseWindowFilter"
    }

    fn apply(&self, movies: Vec<Movie>, context: &RankingContext<'_>) -> Vec<Movie> {
        movies
            .into_iter()
            .filter(|movie| self.contains(movie, context))
            .collect()
    }
}
