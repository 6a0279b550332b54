//! The recommendation engine and its views.
//!
//! Every view is a pure function of (candidates, profile, today, config):
//! inputs are borrowed and never modified, and each call returns fresh
//! vectors. Sorting is stable throughout, so candidates with equal sort keys
//! keep their candidate-list order.
//!
//! | view | order | default limit |
//! |---|---|---|
//! | `rank_movies` | composite score | all |
//! | `recommended` | composite score | 10 |
//! | `banner_movies` | composite score | 5 |
//! | `new_releases` | release date, newest first | 10 |
//! | `trending` | popularity | 10 |
//! | `now_showing` | popularity, within 60 days of release | 20 |
//! | `by_genre` | popularity, tagged with the genre | 10 |

use crate::config::RankingConfig;
use crate::filter_pipeline::FilterPipeline;
use crate::filters::{GenreFilter, ReleaseWindowFilter};
use crate::scoring::{ScoredMovie, Scorer};
use crate::traits::RankingContext;
use catalog::{Movie, PreferenceProfile};
use chrono::NaiveDate;
use tracing::{debug, instrument};

/// Stateless ranking over a candidate list.
///
/// Holds only its configuration, so one engine can be shared freely between
/// threads and requests.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    scorer: Scorer,
}

impl RecommendationEngine {
    pub fn new(config: RankingConfig) -> Self {
        Self {
            scorer: Scorer::new(config),
        }
    }

    pub fn config(&self) -> &RankingConfig {
        self.scorer.config()
    }

    /// Score every candidate and sort by composite score, highest first.
    ///
    /// Returns a permutation of the input: nothing is dropped or duplicated.
    #[instrument(skip_all, fields(candidates = movies.len()))]
    pub fn rank_movies(
        &self,
        movies: &[Movie],
        profile: &PreferenceProfile,
        today: NaiveDate,
    ) -> Vec<ScoredMovie> {
        let context = RankingContext::new(today, profile);
        let mut scored = self.scorer.score_all(movies, &context);
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        debug!("Ranked {} movies", scored.len());
        scored
    }

    /// The top of `rank_movies`
    pub fn recommended(
        &self,
        movies: &[Movie],
        profile: &PreferenceProfile,
        today: NaiveDate,
        limit: Option<usize>,
    ) -> Vec<Movie> {
        let limit = limit.unwrap_or(self.config().limits.recommended);
        self.top_ranked(movies, profile, today, limit)
    }

    /// Same ranking as `recommended` with the smaller banner cap
    pub fn banner_movies(
        &self,
        movies: &[Movie],
        profile: &PreferenceProfile,
        today: NaiveDate,
        limit: Option<usize>,
    ) -> Vec<Movie> {
        let limit = limit.unwrap_or(self.config().limits.banner);
        self.top_ranked(movies, profile, today, limit)
    }

    fn top_ranked(
        &self,
        movies: &[Movie],
        profile: &PreferenceProfile,
        today: NaiveDate,
        limit: usize,
    ) -> Vec<Movie> {
        self.rank_movies(movies, profile, today)
            .into_iter()
            .take(limit)
            .map(|scored| scored.movie)
            .collect()
    }

    /// Newest releases first.
    ///
    /// With `only_recent` the list is first narrowed to the new-release
    /// window. Without it every movie is sorted, and movies whose release
    /// date doesn't parse go last.
    pub fn new_releases(
        &self,
        movies: &[Movie],
        today: NaiveDate,
        only_recent: bool,
        limit: Option<usize>,
    ) -> Vec<Movie> {
        let limit = limit.unwrap_or(self.config().limits.new_releases);
        let profile = PreferenceProfile::new();
        let context = RankingContext::new(today, &profile);

        let mut pipeline = FilterPipeline::new();
        if only_recent {
            pipeline =
                pipeline.add_filter(ReleaseWindowFilter::new(self.config().new_release_window_days));
        }
        let mut selected = pipeline.apply(movies.to_vec(), &context);

        // Parsed dates, so "2024-6-9" and "2024-06-10" compare correctly.
        // None sorts below every date, which puts it last here.
        selected.sort_by_cached_key(|movie| std::cmp::Reverse(movie.release_day()));
        selected.truncate(limit);
        selected
    }

    /// Most popular first, by raw popularity.
    ///
    /// Ignores release dates, genres and the profile entirely.
    pub fn trending(&self, movies: &[Movie], limit: Option<usize>) -> Vec<Movie> {
        let limit = limit.unwrap_or(self.config().limits.trending);
        let mut selected = movies.to_vec();
        sort_by_popularity(&mut selected);
        selected.truncate(limit);
        selected
    }

    /// Movies released within the now-showing window, most popular first
    pub fn now_showing(&self, movies: &[Movie], today: NaiveDate, limit: Option<usize>) -> Vec<Movie> {
        let limit = limit.unwrap_or(self.config().limits.now_showing);
        let profile = PreferenceProfile::new();
        let context = RankingContext::new(today, &profile);

        let pipeline = FilterPipeline::new()
            .add_filter(ReleaseWindowFilter::new(self.config().now_showing_window_days));
        let mut selected = pipeline.apply(movies.to_vec(), &context);
        sort_by_popularity(&mut selected);
        selected.truncate(limit);
        selected
    }

    /// Movies tagged with `genre` (exact tag, any case), most popular first
    pub fn by_genre(&self, movies: &[Movie], genre: &str, limit: Option<usize>) -> Vec<Movie> {
        let limit = limit.unwrap_or(self.config().limits.by_genre);
        let profile = PreferenceProfile::new();
        // The genre filter never looks at the date
        let context = RankingContext::new(NaiveDate::MIN, &profile);

        let pipeline = FilterPipeline::new().add_filter(GenreFilter::new(genre));
        let mut selected = pipeline.apply(movies.to_vec(), &context);
        sort_by_popularity(&mut selected);
        selected.truncate(limit);
        selected
    }
}

/// Stable sort, highest popularity first. Unusable values count as 0.0.
fn sort_by_popularity(movies: &mut [Movie]) {
    movies.sort_by(|a, b| b.popularity_or_zero().total_cmp(&a.popularity_or_zero()));
}
