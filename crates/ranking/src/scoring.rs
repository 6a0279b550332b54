//! Composite scoring of candidate movies.
//!
//! Each movie gets three components in `[0, 1]`:
//! - popularity relative to the most popular candidate in the same call
//! - new release: 1.0 inside the new-release window, else 0.0
//! - genre match: share of the movie's tags among the user's top genres
//!
//! The composite is their weighted sum. Popularity is relative, so scores
//! are only comparable within one candidate list.

use crate::config::RankingConfig;
use crate::traits::RankingContext;
use catalog::{same_genre, Movie};
use rayon::prelude::*;
use serde::Serialize;

/// The three sub-scores behind a composite score, kept for explanations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreComponents {
    pub popularity: f32,
    pub new_release: f32,
    pub genre_match: f32,
}

/// A movie with its composite score
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMovie {
    pub movie: Movie,
    pub score: f32,
    pub components: ScoreComponents,
}

/// Values computed once per ranking call and shared by every candidate.
#[derive(Debug, Clone)]
pub struct ScoringBasis {
    /// Denominator for the popularity component, never zero
    pub max_popularity: f32,
    /// The user's top genres. Empty means no history.
    pub top_genres: Vec<String>,
}

impl ScoringBasis {
    pub fn new(candidates: &[Movie], context: &RankingContext<'_>, top_n: usize) -> Self {
        let max_popularity = candidates
            .iter()
            .map(Movie::popularity_or_zero)
            .fold(0.0_f32, f32::max);

        Self {
            max_popularity: if max_popularity > 0.0 { max_popularity } else { 1.0 },
            top_genres: context
                .profile
                .top_genres(top_n)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Scores candidates with the weights and windows of a `RankingConfig`.
#[derive(Debug, Clone)]
pub struct Scorer {
    config: RankingConfig,
}

impl Scorer {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Score every candidate in parallel.
    ///
    /// The output has one entry per input movie, in input order.
    pub fn score_all(&self, candidates: &[Movie], context: &RankingContext<'_>) -> Vec<ScoredMovie> {
        let basis = ScoringBasis::new(candidates, context, self.config.top_genres);
        candidates
            .par_iter()
            .map(|movie| self.score(movie, &basis, context))
            .collect()
    }

    /// Score a single candidate against a precomputed basis.
    pub fn score(
        &self,
        movie: &Movie,
        basis: &ScoringBasis,
        context: &RankingContext<'_>,
    ) -> ScoredMovie {
        let components = ScoreComponents {
            popularity: popularity_component(movie, basis.max_popularity),
            new_release: self.new_release_component(movie, context),
            genre_match: self.genre_match_component(movie, &basis.top_genres),
        };

        let weights = &self.config.weights;
        let score = components.popularity * weights.popularity
            + components.new_release * weights.new_release
            + components.genre_match * weights.genre_match;

        ScoredMovie {
            movie: movie.clone(),
            score,
            components,
        }
    }

    /// 1.0 if released within the last `new_release_window_days` days
    /// (inclusive, never in the future), else 0.0. Bad dates score 0.0.
    fn new_release_component(&self, movie: &Movie, context: &RankingContext<'_>) -> f32 {
        match movie.days_since_release(context.today) {
            Some(days) if (0..=self.config.new_release_window_days).contains(&days) => 1.0,
            _ => 0.0,
        }
    }

    /// Fraction of the movie's tags found among the user's top genres.
    ///
    /// Cold-start users get the neutral value; a movie without tags scores
    /// 0.0 for everyone else. Duplicate tags count once per occurrence.
    fn genre_match_component(&self, movie: &Movie, top_genres: &[String]) -> f32 {
        if top_genres.is_empty() {
            return self.config.neutral_genre_match;
        }
        if movie.genres.is_empty() {
            return 0.0;
        }
        let matching = movie
            .genres
            .iter()
            .filter(|tag| top_genres.iter().any(|genre| same_genre(genre, tag)))
            .count();
        (matching as f32 / movie.genres.len() as f32).clamp(0.0, 1.0)
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(RankingConfig::default())
    }
}

/// Popularity divided by the candidate-set maximum, clamped to [0, 1]
fn popularity_component(movie: &Movie, max_popularity: f32) -> f32 {
    (movie.popularity_or_zero() / max_popularity).clamp(0.0, 1.0)
}
