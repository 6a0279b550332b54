//! Ranking configuration.
//!
//! Every constant the engine uses lives here and is passed in explicitly.
//! Defaults:
//!
//! | setting | default |
//! |---|---|
//! | popularity weight | 0.5 |
//! | new-release weight | 0.3 |
//! | genre-match weight | 0.2 |
//! | new-release window | 7 days |
//! | now-showing window | 60 days |
//! | top genres considered | 5 |
//! | cold-start genre match | 0.5 |

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

pub const WEIGHT_POPULARITY: f32 = 0.5;
pub const WEIGHT_NEW_RELEASE: f32 = 0.3;
pub const WEIGHT_GENRE_MATCH: f32 = 0.2;
pub const NEW_RELEASE_WINDOW_DAYS: i64 = 7;
pub const NOW_SHOWING_WINDOW_DAYS: i64 = 60;
pub const TOP_GENRES: usize = 5;
pub const NEUTRAL_GENRE_MATCH: f32 = 0.5;

/// How much each component contributes to the composite score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub popularity: f32,
    pub new_release: f32,
    pub genre_match: f32,
}

impl Weights {
    pub fn total(&self) -> f32 {
        self.popularity + self.new_release + self.genre_match
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            popularity: WEIGHT_POPULARITY,
            new_release: WEIGHT_NEW_RELEASE,
            genre_match: WEIGHT_GENRE_MATCH,
        }
    }
}

/// Default result sizes for each view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewLimits {
    pub recommended: usize,
    pub banner: usize,
    pub new_releases: usize,
    pub trending: usize,
    pub now_showing: usize,
    pub by_genre: usize,
}

impl Default for ViewLimits {
    fn default() -> Self {
        Self {
            recommended: 10,
            banner: 5,
            new_releases: 10,
            trending: 10,
            now_showing: 20,
            by_genre: 10,
        }
    }
}

/// Everything the engine needs besides its inputs and the current date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub weights: Weights,
    /// A movie is "new" for this many days after release, inclusive
    pub new_release_window_days: i64,
    /// A movie is "now showing" for this many days after release, inclusive
    pub now_showing_window_days: i64,
    /// How many of the user's most watched genres personalize the score
    pub top_genres: usize,
    /// Genre-match component for users without any history
    pub neutral_genre_match: f32,
    pub limits: ViewLimits,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            new_release_window_days: NEW_RELEASE_WINDOW_DAYS,
            now_showing_window_days: NOW_SHOWING_WINDOW_DAYS,
            top_genres: TOP_GENRES,
            neutral_genre_match: NEUTRAL_GENRE_MATCH,
            limits: ViewLimits::default(),
        }
    }
}

impl RankingConfig {
    /// Load overrides from a JSON file. Fields left out keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read ranking config {}", path.display()))?;
        let config: RankingConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid ranking config {}", path.display()))?;

        let total = config.weights.total();
        if (total - 1.0).abs() > 1e-4 {
            warn!(
                "Ranking weights sum to {:.3}, composite scores will leave [0, 1]",
                total
            );
        }
        Ok(config)
    }

    pub fn with_weights(mut self, popularity: f32, new_release: f32, genre_match: f32) -> Self {
        self.weights = Weights {
            popularity,
            new_release,
            genre_match,
        };
        self
    }

    pub fn with_new_release_window_days(mut self, days: i64) -> Self {
        self.new_release_window_days = days;
        self
    }

    pub fn with_now_showing_window_days(mut self, days: i64) -> Self {
        self.now_showing_window_days = days;
        self
    }

    pub fn with_top_genres(mut self, n: usize) -> Self {
        self.top_genres = n;
        self
    }

    pub fn with_neutral_genre_match(mut self, value: f32) -> Self {
        self.neutral_genre_match = value;
        self
    }

    pub fn with_limits(mut self, limits: ViewLimits) -> Self {
        self.limits = limits;
        self
    }
}
