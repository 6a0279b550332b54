//! Filter to keep only movies tagged with one genre.

use crate::traits::{Filter, RankingContext};
use catalog::Movie;

/// Keeps movies whose genre list contains `genre`.
///
/// Matching is an exact tag comparison ignoring case: "sci-fi" matches
/// "Sci-Fi" but "Sci" does not.
pub struct GenreFilter {
    genre: String,
}

impl GenreFilter {
    pub fn new(genre: impl Into<String>) -> Self {
        Self {
            genre: genre.into().trim().to_string(),
        }
    }
}

impl Filter for GenreFilter {
    fn name(&self) -> &str {
        "GenreFilter"
    }

    fn apply(&self, movies: Vec<Movie>, _context: &RankingContext<'_>) -> Vec<Movie> {
        if self.genre.is_empty() {
            return Vec::new();
        }
        movies
            .into_iter()
            .filter(|movie| movie.has_genre(&self.genre))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::PreferenceProfile;
    use chrono::NaiveDate;

    fn create_test_movies() -> Vec<Movie> {
        vec![
            Movie::new(1, "Action Movie", vec!["Action".into(), "Adventure".into()], "2024-01-01", 1.0),
            Movie::new(2, "Drama Movie", vec!["Drama".into()], "2024-01-01", 1.0),
            Movie::new(3, "Sci-Fi Movie", vec!["SCI-FI".into(), "action".into()], "2024-01-01", 1.0),
            Movie::new(4, "Untagged", vec![], "2024-01-01", 1.0),
        ]
    }

    #[test]
    fn test_genre_filter() {
        let profile = PreferenceProfile::new();
        let context = RankingContext::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), &profile);

        let filtered = GenreFilter::new("Action").apply(create_test_movies(), &context);
        let ids: Vec<u32> = filtered.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_genre_filter_is_exact() {
        let profile = PreferenceProfile::new();
        let context = RankingContext::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), &profile);

        assert!(GenreFilter::new("Sci").apply(create_test_movies(), &context).is_empty());
        assert!(GenreFilter::new("  ").apply(create_test_movies(), &context).is_empty());
        assert_eq!(GenreFilter::new("sci-fi").apply(create_test_movies(), &context).len(), 1);
    }
}
