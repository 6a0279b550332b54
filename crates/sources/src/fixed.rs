//! In-memory sources with fixed contents.
//!
//! Used by tests, benchmarks and demos to drive the orchestrator without
//! loading a catalogue from disk.

use crate::types::{CatalogSource, PreferenceSource};
use anyhow::Result;
use catalog::{name_key, Movie, PreferenceProfile, UserId};
use std::collections::HashMap;

/// Returns the same movie list for every city unless a city has its own
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    movies: Vec<Movie>,
    by_city: HashMap<String, Vec<Movie>>,
}

impl StaticCatalogSource {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self {
            movies,
            by_city: HashMap::new(),
        }
    }

    /// Give `city` its own candidate list (builder pattern)
    pub fn with_city(mut self, city: &str, movies: Vec<Movie>) -> Self {
        self.by_city.insert(name_key(city), movies);
        self
    }
}

impl CatalogSource for StaticCatalogSource {
    fn name(&self) -> &str {
        "StaticCatalogSource"
    }

    fn candidates(&self, city: &str) -> Result<Vec<Movie>> {
        Ok(self
            .by_city
            .get(&name_key(city))
            .unwrap_or(&self.movies)
            .clone())
    }
}

/// Profiles held in a map; unknown users get the empty profile
#[derive(Debug, Clone, Default)]
pub struct StaticPreferenceSource {
    profiles: HashMap<UserId, PreferenceProfile>,
}

impl StaticPreferenceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a profile (builder pattern)
    pub fn with_profile(mut self, user_id: UserId, profile: PreferenceProfile) -> Self {
        self.profiles.insert(user_id, profile);
        self
    }
}

impl PreferenceSource for StaticPreferenceSource {
    fn name(&self) -> &str {
        "StaticPreferenceSource"
    }

    fn profile(&self, user_id: UserId) -> Result<PreferenceProfile> {
        Ok(self.profiles.get(&user_id).cloned().unwrap_or_default())
    }
}
