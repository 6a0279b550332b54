//! The FilterPipeline chains filters together using the builder pattern.

use crate::traits::{Filter, RankingContext};
use catalog::Movie;
use tracing;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(ReleaseWindowFilter::new(60))
///     .add_filter(GenreFilter::new("Drama"));
///
/// let playing_dramas = pipeline.apply(movies, &context);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence, logging counts before and after each.
    pub fn apply(&self, movies: Vec<Movie>, context: &RankingContext<'_>) -> Vec<Movie> {
        let mut current = movies;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, context);
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        current
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{GenreFilter, ReleaseWindowFilter};
    use catalog::PreferenceProfile;
    use chrono::NaiveDate;

    fn movies() -> Vec<Movie> {
        vec![
            Movie::new(1, "Old Drama", vec!["Drama".into()], "2023-01-01", 9.0),
            Movie::new(2, "New Drama", vec!["Drama".into()], "2024-06-01", 8.0),
            Movie::new(3, "New Comedy", vec!["Comedy".into()], "2024-06-02", 7.0),
        ]
    }

    #[test]
    fn test_empty_pipeline() {
        let profile = PreferenceProfile::new();
        let context = RankingContext::new(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(), &profile);

        let pipeline = FilterPipeline::new();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.apply(movies(), &context).len(), 3);
    }

    #[test]
    fn test_chained_filters() {
        let profile = PreferenceProfile::new();
        let context = RankingContext::new(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(), &profile);

        let pipeline = FilterPipeline::new()
            .add_filter(ReleaseWindowFilter::new(60))
            .add_filter(GenreFilter::new("drama"));
        assert_eq!(pipeline.len(), 2);

        let filtered = pipeline.apply(movies(), &context);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 2);
    }
}
