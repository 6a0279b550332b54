//! # Feed Orchestrator
//!
//! This module coordinates one home-feed request:
//! 1. Read the clock once
//! 2. Fetch the city's candidates and the user's profile in parallel
//! 3. Run the ranking views on a blocking thread
//! 4. Return the assembled feed
//!
//! Sources are plain synchronous traits, so each fetch runs under
//! `spawn_blocking` and the two are awaited together with `tokio::join!`.
//! The engine is stateless and shared behind an `Arc`, which lets any number
//! of requests run at once.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, instrument, warn};

use catalog::{Movie, PreferenceProfile, UserId};
use ranking::{RecommendationEngine, ScoredMovie};
use sources::{CatalogSource, PreferenceSource};

use crate::clock::{Clock, SystemClock};

/// Every section of the home screen for one user in one city
#[derive(Debug, Clone, Serialize)]
pub struct HomeFeed {
    pub city: String,
    pub user_id: Option<UserId>,
    pub today: NaiveDate,
    pub banner: Vec<Movie>,
    pub recommended: Vec<Movie>,
    pub new_releases: Vec<Movie>,
    pub trending: Vec<Movie>,
    pub now_showing: Vec<Movie>,
}

impl HomeFeed {
    pub fn is_empty(&self) -> bool {
        self.banner.is_empty()
            && self.recommended.is_empty()
            && self.new_releases.is_empty()
            && self.trending.is_empty()
            && self.now_showing.is_empty()
    }
}

/// Wires the sources, the ranking engine and the clock together
#[derive(Clone)]
pub struct FeedOrchestrator {
    catalog: Arc<dyn CatalogSource>,
    preferences: Arc<dyn PreferenceSource>,
    engine: Arc<RecommendationEngine>,
    clock: Arc<dyn Clock>,
}

impl FeedOrchestrator {
    /// Create an orchestrator with the default engine and the system clock
    pub fn new(catalog: Arc<dyn CatalogSource>, preferences: Arc<dyn PreferenceSource>) -> Self {
        Self {
            catalog,
            preferences,
            engine: Arc::new(RecommendationEngine::default()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Use a configured engine (builder pattern)
    pub fn with_engine(mut self, engine: RecommendationEngine) -> Self {
        self.engine = Arc::new(engine);
        self
    }

    /// Use a different source of "today" (builder pattern)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Main entry point: build the home feed.
    ///
    /// `user_id` of `None` is an anonymous visitor and ranks with the
    /// cold-start profile. An unknown city yields an empty feed, not an error.
    #[instrument(skip(self))]
    pub async fn home_feed(&self, user_id: Option<UserId>, city: &str) -> Result<HomeFeed> {
        let start_time = Instant::now();
        let today = self.clock.today();

        let (candidates, profile) = self.fetch_inputs(user_id, city).await?;
        info!(
            "Fetched {} candidates and {} profile genres",
            candidates.len(),
            profile.len()
        );
        if candidates.is_empty() {
            warn!("No candidates for city {}", city);
        }

        let engine = self.engine.clone();
        let city = city.to_string();
        let feed = tokio::task::spawn_blocking(move || {
            // Banner and recommended are both prefixes of one ranking
            let limits = engine.config().limits;
            let ranked = engine.rank_movies(&candidates, &profile, today);
            let top = |n: usize| -> Vec<Movie> {
                ranked.iter().take(n).map(|scored| scored.movie.clone()).collect()
            };

            HomeFeed {
                banner: top(limits.banner),
                recommended: top(limits.recommended),
                new_releases: engine.new_releases(&candidates, today, true, None),
                trending: engine.trending(&candidates, None),
                now_showing: engine.now_showing(&candidates, today, None),
                city,
                user_id,
                today,
            }
        })
        .await
        .context("Ranking task panicked")?;

        info!("Built home feed in {:.2?}", start_time.elapsed());
        Ok(feed)
    }

    /// Every candidate with its score breakdown, highest score first
    #[instrument(skip(self))]
    pub async fn ranked(&self, user_id: Option<UserId>, city: &str) -> Result<Vec<ScoredMovie>> {
        let start_time = Instant::now();
        let today = self.clock.today();
        let (candidates, profile) = self.fetch_inputs(user_id, city).await?;

        let engine = self.engine.clone();
        let ranked = tokio::task::spawn_blocking(move || {
            engine.rank_movies(&candidates, &profile, today)
        })
        .await
        .context("Ranking task panicked")?;

        info!("Ranked {} movies in {:.2?}", ranked.len(), start_time.elapsed());
        Ok(ranked)
    }

    /// The most popular movies in `city` tagged with `genre`
    #[instrument(skip(self))]
    pub async fn genre_feed(&self, city: &str, genre: &str, limit: Option<usize>) -> Result<Vec<Movie>> {
        let catalog = self.catalog.clone();
        let (owned_city, owned_genre) = (city.to_string(), genre.to_string());
        let candidates = tokio::task::spawn_blocking(move || {
            catalog.candidates_in_genre(&owned_city, &owned_genre)
        })
        .await
        .context("Candidate task panicked")?
        .with_context(|| format!("{} failed for {} in {}", self.catalog.name(), genre, city))?;

        Ok(self.engine.by_genre(&candidates, genre, limit))
    }

    #[instrument(skip(self))]
    pub async fn trending(&self, city: &str, limit: Option<usize>) -> Result<Vec<Movie>> {
        let candidates = self.fetch_candidates(city).await?;
        Ok(self.engine.trending(&candidates, limit))
    }

    /// Newest first. `only_recent` keeps just the new-release window.
    #[instrument(skip(self))]
    pub async fn new_releases(
        &self,
        city: &str,
        only_recent: bool,
        limit: Option<usize>,
    ) -> Result<Vec<Movie>> {
        let today = self.clock.today();
        let candidates = self.fetch_candidates(city).await?;
        Ok(self.engine.new_releases(&candidates, today, only_recent, limit))
    }

    /// The user's preference profile as the preference source reports it
    pub async fn profile(&self, user_id: UserId) -> Result<PreferenceProfile> {
        let preferences = self.preferences.clone();
        tokio::task::spawn_blocking(move || preferences.profile(user_id))
            .await
            .context("Profile task panicked")?
            .with_context(|| format!("Failed to build profile for user {}", user_id))
    }

    /// Fetch candidates and profile in parallel
    async fn fetch_inputs(
        &self,
        user_id: Option<UserId>,
        city: &str,
    ) -> Result<(Vec<Movie>, PreferenceProfile)> {
        let (candidates_result, profile_result) = tokio::join!(
            tokio::task::spawn_blocking({
                let catalog = self.catalog.clone();
                let city = city.to_string();
                move || catalog.candidates(&city)
            }),
            tokio::task::spawn_blocking({
                let preferences = self.preferences.clone();
                move || match user_id {
                    Some(user_id) => preferences.profile(user_id),
                    None => Ok(PreferenceProfile::new()),
                }
            })
        );

        let candidates = candidates_result
            .context("Candidate task panicked")?
            .with_context(|| format!("{} failed for city {}", self.catalog.name(), city))?;
        let profile = profile_result
            .context("Profile task panicked")?
            .with_context(|| format!("{} failed for user {:?}", self.preferences.name(), user_id))?;
        Ok((candidates, profile))
    }

    async fn fetch_candidates(&self, city: &str) -> Result<Vec<Movie>> {
        let catalog = self.catalog.clone();
        let owned_city = city.to_string();
        tokio::task::spawn_blocking(move || catalog.candidates(&owned_city))
            .await
            .context("Candidate task panicked")?
            .with_context(|| format!("{} failed for city {}", self.catalog.name(), city))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use sources::{StaticCatalogSource, StaticPreferenceSource};

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn create_test_movies() -> Vec<Movie> {
        vec![
            Movie::new(1, "Monsoon Heist", vec!["Action".into(), "Thriller".into()], "2024-06-08", 90.0),
            Movie::new(2, "Quiet Rooms", vec!["Drama".into()], "2024-05-01", 40.0),
            Movie::new(3, "Laugh Track", vec!["Comedy".into()], "2024-06-10", 60.0),
            Movie::new(4, "Old Reel", vec!["Drama".into(), "Romance".into()], "2023-01-15", 100.0),
            Movie::new(5, "Night Shift", vec!["Horror".into()], "2024-06-01", 20.0),
        ]
    }

    fn build_test_orchestrator() -> FeedOrchestrator {
        let catalog = StaticCatalogSource::new(create_test_movies())
            .with_city("Nowhere", Vec::new());
        let preferences = StaticPreferenceSource::new()
            .with_profile(7, PreferenceProfile::from_counts([("Drama", 6), ("Romance", 2)]));

        FeedOrchestrator::new(Arc::new(catalog), Arc::new(preferences))
            .with_clock(Arc::new(FixedClock(today())))
    }

    fn ids(movies: &[Movie]) -> Vec<u32> {
        movies.iter().map(|m| m.id).collect()
    }

    /// Fails every request, to check errors reach the caller
    struct BrokenPreferences;

    impl PreferenceSource for BrokenPreferences {
        fn name(&self) -> &str {
            "BrokenPreferences"
        }

        fn profile(&self, _user_id: UserId) -> Result<PreferenceProfile> {
            anyhow::bail!("booking store offline")
        }
    }

    // ============================================================================
    // Tests
    // ============================================================================

    #[tokio::test]
    async fn test_home_feed_sections() {
        let orchestrator = build_test_orchestrator();

        let feed = orchestrator.home_feed(Some(7), "Pune").await.unwrap();

        assert_eq!(feed.city, "Pune");
        assert_eq!(feed.today, today());
        assert_eq!(ids(&feed.trending), vec![4, 1, 3, 2, 5]);
        // Night Shift is nine days old
        assert_eq!(ids(&feed.new_releases), vec![3, 1]);
        // Old Reel is past the now-showing window
        assert_eq!(ids(&feed.now_showing), vec![1, 3, 2, 5]);
        assert_eq!(feed.banner.len(), 5);
        assert_eq!(feed.recommended.len(), 5);
    }

    #[tokio::test]
    async fn test_banner_is_prefix_of_recommended() {
        let orchestrator = build_test_orchestrator();

        let feed = orchestrator.home_feed(Some(7), "Pune").await.unwrap();
        let banner = ids(&feed.banner);
        assert_eq!(&ids(&feed.recommended)[..banner.len()], banner.as_slice());
    }

    #[tokio::test]
    async fn test_feed_matches_engine_views() {
        let orchestrator = build_test_orchestrator().with_engine(RecommendationEngine::new(
            ranking::RankingConfig::default().with_limits(ranking::ViewLimits {
                banner: 2,
                recommended: 4,
                ..Default::default()
            }),
        ));
        let movies = create_test_movies();
        let profile = PreferenceProfile::from_counts([("Drama", 6), ("Romance", 2)]);
        let engine = orchestrator.engine();

        let feed = orchestrator.home_feed(Some(7), "Pune").await.unwrap();
        assert_eq!(
            ids(&feed.banner),
            ids(&engine.banner_movies(&movies, &profile, today(), None))
        );
        assert_eq!(
            ids(&feed.recommended),
            ids(&engine.recommended(&movies, &profile, today(), None))
        );
        assert_eq!(ids(&feed.banner), vec![1, 4]);
        assert_eq!(ids(&feed.recommended), vec![1, 4, 3, 2]);
    }

    #[tokio::test]
    async fn test_profile_personalizes_ranking() {
        let orchestrator = build_test_orchestrator();

        let drama_fan = orchestrator.ranked(Some(7), "Pune").await.unwrap();
        let anonymous = orchestrator.ranked(None, "Pune").await.unwrap();

        // Old Reel's full genre match lifts it above Laugh Track
        let order = |ranked: &[ScoredMovie]| ranked.iter().map(|s| s.movie.id).collect::<Vec<_>>();
        assert_eq!(order(&drama_fan), vec![1, 4, 3, 2, 5]);
        assert_eq!(order(&anonymous), vec![1, 3, 4, 2, 5]);

        for scored in &anonymous {
            assert_eq!(scored.components.genre_match, 0.5);
        }
    }

    #[tokio::test]
    async fn test_unknown_user_ranks_like_anonymous() {
        let orchestrator = build_test_orchestrator();

        let unknown = orchestrator.home_feed(Some(999), "Pune").await.unwrap();
        let anonymous = orchestrator.home_feed(None, "Pune").await.unwrap();
        assert_eq!(ids(&unknown.recommended), ids(&anonymous.recommended));
    }

    #[tokio::test]
    async fn test_empty_city_gives_empty_feed() {
        let orchestrator = build_test_orchestrator();

        let feed = orchestrator.home_feed(Some(7), "Nowhere").await.unwrap();
        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn test_genre_feed() {
        let orchestrator = build_test_orchestrator();

        let drama = orchestrator.genre_feed("Pune", "drama", None).await.unwrap();
        assert_eq!(ids(&drama), vec![4, 2]);

        let capped = orchestrator.genre_feed("Pune", "Drama", Some(1)).await.unwrap();
        assert_eq!(ids(&capped), vec![4]);

        assert!(orchestrator.genre_feed("Pune", "", None).await.unwrap().is_empty());
        assert!(orchestrator.genre_feed("Nowhere", "Drama", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_genre_feed_over_indexed_catalog() {
        let mut catalog = catalog::Catalog::new();
        for movie in create_test_movies() {
            catalog.insert_movie(movie);
        }
        catalog.insert_movie(Movie::new(6, "Rire", vec!["Comédie".into()], "2024-06-01", 70.0));
        for id in [1, 2, 6] {
            catalog.insert_showing(catalog::Showing {
                city: "Pune".to_string(),
                movie_id: id,
            });
        }
        catalog.build_secondary_indices();
        let source = Arc::new(sources::IndexedCatalogSource::new(Arc::new(catalog)));
        let orchestrator = FeedOrchestrator::new(source.clone(), source)
            .with_clock(Arc::new(FixedClock(today())));

        let comedie = orchestrator.genre_feed("pune", "COMÉDIE", None).await.unwrap();
        assert_eq!(ids(&comedie), vec![6]);
        // Old Reel is Drama but doesn't play in Pune
        let drama = orchestrator.genre_feed("Pune", "Drama", None).await.unwrap();
        assert_eq!(ids(&drama), vec![2]);
    }

    #[tokio::test]
    async fn test_new_releases_modes() {
        let orchestrator = build_test_orchestrator();

        let recent = orchestrator.new_releases("Pune", true, None).await.unwrap();
        assert_eq!(ids(&recent), vec![3, 1]);

        let all = orchestrator.new_releases("Pune", false, Some(10)).await.unwrap();
        assert_eq!(ids(&all), vec![3, 1, 5, 2, 4]);
    }

    #[tokio::test]
    async fn test_source_errors_propagate() {
        let orchestrator = FeedOrchestrator::new(
            Arc::new(StaticCatalogSource::new(create_test_movies())),
            Arc::new(BrokenPreferences),
        )
        .with_clock(Arc::new(FixedClock(today())));

        let err = orchestrator.home_feed(Some(1), "Pune").await.unwrap_err();
        assert!(format!("{:#}", err).contains("booking store offline"));

        // Anonymous visitors never touch the preference source
        assert!(orchestrator.home_feed(None, "Pune").await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_agree() {
        let orchestrator = build_test_orchestrator();

        let (a, b, c) = tokio::join!(
            orchestrator.home_feed(Some(7), "Pune"),
            orchestrator.home_feed(Some(7), "Pune"),
            orchestrator.home_feed(None, "Pune"),
        );
        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());

        assert_eq!(ids(&a.recommended), ids(&b.recommended));
        assert_eq!(ids(&a.trending), ids(&c.trending));
    }

    #[tokio::test]
    async fn test_configured_engine_limits() {
        let engine = RecommendationEngine::new(
            ranking::RankingConfig::default().with_limits(ranking::ViewLimits {
                banner: 2,
                trending: 3,
                ..Default::default()
            }),
        );
        let orchestrator = build_test_orchestrator().with_engine(engine);

        let feed = orchestrator.home_feed(Some(7), "Pune").await.unwrap();
        assert_eq!(feed.banner.len(), 2);
        assert_eq!(feed.trending.len(), 3);
    }
}
