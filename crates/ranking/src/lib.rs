//! Ranking of candidate movies for a home-screen feed.
//!
//! This crate provides:
//! - `RankingConfig` with the weights, windows and view limits
//! - `Scorer` computing popularity, new-release and genre-match components
//! - Filter trait and implementations for narrowing candidate lists
//! - FilterPipeline for composing filters
//! - `RecommendationEngine` exposing the ranked and filtered views
//!
//! ## Architecture
//! A view runs in up to three stages:
//! 1. Filters narrow the candidates (release window, genre)
//! 2. The scorer computes components for every remaining candidate
//! 3. A stable sort orders them and the view's limit truncates
//!
//! Nothing here performs I/O or fails. Malformed movie data lowers that
//! movie's sub-scores instead of aborting the call.
//!
//! ## Example Usage
//! ```ignore
//! use ranking::{RankingConfig, RecommendationEngine};
//!
//! let engine = RecommendationEngine::new(RankingConfig::default());
//!
//! let banner = engine.banner_movies(&candidates, &profile, today, None);
//! let trending = engine.trending(&candidates, None);
//! let horror = engine.by_genre(&candidates, "Horror", Some(5));
//! ```

pub mod config;
pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod scoring;
pub mod engine;

// Re-export main types
pub use config::{RankingConfig, ViewLimits, Weights};
pub use traits::{Filter, RankingContext};
pub use filter_pipeline::FilterPipeline;
pub use scoring::{ScoreComponents, ScoredMovie, Scorer, ScoringBasis};
pub use engine::RecommendationEngine;
