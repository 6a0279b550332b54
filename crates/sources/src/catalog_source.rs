//! Catalogue-backed sources
//!
//! `IndexedCatalogSource` serves both candidates and profiles from one
//! loaded `Catalog`. The catalogue is read-only after loading, so an `Arc`
//! is all the sharing it needs.

use crate::profile::build_preference_profile;
use crate::types::{CatalogSource, PreferenceSource};
use anyhow::Result;
use catalog::{Catalog, Movie, PreferenceProfile, UserId};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Serves candidates and preference profiles from a loaded `Catalog`
#[derive(Clone)]
pub struct IndexedCatalogSource {
    /// Shared reference to the catalogue (read-only, so no Mutex needed)
    catalog: Arc<Catalog>,
}

impl IndexedCatalogSource {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl CatalogSource for IndexedCatalogSource {
    fn name(&self) -> &str {
        "IndexedCatalogSource"
    }

    #[instrument(skip(self))]
    fn candidates(&self, city: &str) -> Result<Vec<Movie>> {
        let movies: Vec<Movie> = self
            .catalog
            .movies_in_city(city)
            .into_iter()
            .cloned()
            .collect();
        debug!("Found {} candidates in {}", movies.len(), city);
        Ok(movies)
    }

    /// Narrows through the genre index before touching any movie
    #[instrument(skip(self))]
    fn candidates_in_genre(&self, city: &str, genre: &str) -> Result<Vec<Movie>> {
        let tagged = self.catalog.movies_by_genre(genre);
        if tagged.is_empty() {
            return Ok(Vec::new());
        }
        let movies: Vec<Movie> = self
            .catalog
            .movies_in_city(city)
            .into_iter()
            .filter(|movie| tagged.contains(&movie.id))
            .cloned()
            .collect();
        debug!("Found {} {} candidates in {}", movies.len(), genre, city);
        Ok(movies)
    }
}

impl PreferenceSource for IndexedCatalogSource {
    fn name(&self) -> &str {
        "IndexedCatalogSource"
    }

    #[instrument(skip(self))]
    fn profile(&self, user_id: UserId) -> Result<PreferenceProfile> {
        let profile = build_preference_profile(&self.catalog, user_id)?;
        debug!("Profile for user {} has {} genres", user_id, profile.len());
        Ok(profile)
    }
}
