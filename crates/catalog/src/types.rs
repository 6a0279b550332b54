//! Core domain types for the movie catalogue.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - Type aliases for domain clarity (UserId, MovieId)
//! - `Movie`, the candidate entity handed to the ranking engine
//! - `PreferenceProfile`, a user's per-genre watch counts
//! - `Booking` and `Showing` records read from the catalogue files
//! - `Catalog`, the in-memory index built from those files

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

// =============================================================================
// Name Matching
// =============================================================================

/// Lookup key for genre and city names: trimmed and lowercased.
///
/// Uses Unicode lowercasing, so "COMÉDIE" and "Comédie" share a key.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Case-insensitive genre comparison, consistent with `name_key`
pub fn same_genre(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    a == b || a.to_lowercase() == b.to_lowercase()
}

// =============================================================================
// Movie
// =============================================================================

/// A movie as supplied by the catalogue.
///
/// Only the fields the ranking engine reads are kept. The release date is
/// stored exactly as the upstream source sent it; `release_day` parses it on
/// demand so a malformed value can never fail a load or a ranking call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Genre tags, order irrelevant. Duplicates are possible.
    pub genres: Vec<String>,
    /// Release date as received, normally ISO `YYYY-MM-DD`
    pub release_date: String,
    /// Upstream popularity score, not normalized
    pub popularity: f32,
}

impl Movie {
    pub fn new(
        id: MovieId,
        title: impl Into<String>,
        genres: Vec<String>,
        release_date: impl Into<String>,
        popularity: f32,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            genres,
            release_date: release_date.into(),
            popularity,
        }
    }

    /// Parse the release date.
    ///
    /// Accepts `YYYY-MM-DD` (zero padding optional) and RFC 3339 timestamps.
    /// Returns `None` for anything else, including an empty string.
    pub fn release_day(&self) -> Option<NaiveDate> {
        let raw = self.release_date.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|timestamp| timestamp.date_naive())
    }

    /// Whole days between the release date and `today`.
    ///
    /// Negative for releases in the future, `None` if the date doesn't parse.
    pub fn days_since_release(&self, today: NaiveDate) -> Option<i64> {
        self.release_day()
            .map(|released| today.signed_duration_since(released).num_days())
    }

    /// Popularity with negative, NaN and infinite values mapped to 0.0
    pub fn popularity_or_zero(&self) -> f32 {
        if self.popularity.is_finite() && self.popularity > 0.0 {
            self.popularity
        } else {
            0.0
        }
    }

    /// Case-insensitive exact tag match
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|tag| same_genre(tag, genre))
    }
}

// =============================================================================
// Preference Profile
// =============================================================================

/// Watch count for one genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenrePreference {
    pub genre: String,
    pub watch_count: u32,
}

/// A user's viewing history condensed to per-genre watch counts.
///
/// Genre names compare case-insensitively. Entries keep the order in which
/// each genre was first recorded, and that order breaks ties in `top_genres`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    entries: Vec<GenrePreference>,
}

impl PreferenceProfile {
    /// Creates an empty profile (a cold-start user)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a profile from `(genre, count)` pairs, in order.
    ///
    /// Pairs naming the same genre (ignoring case) are summed into the
    /// first entry.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut profile = Self::new();
        for (genre, count) in counts {
            profile.add_count(genre.into(), count);
        }
        profile
    }

    /// Increment the watch count of one genre by one
    pub fn record_watch(&mut self, genre: &str) {
        self.add_count(genre.to_string(), 1);
    }

    /// Record one completed booking of a movie tagged with `genres`.
    ///
    /// Every distinct genre of the booking is counted once.
    pub fn record_booking<S: AsRef<str>>(&mut self, genres: &[S]) {
        let mut seen: Vec<&str> = Vec::with_capacity(genres.len());
        for genre in genres {
            let genre = genre.as_ref().trim();
            if genre.is_empty() || seen.iter().any(|g| same_genre(g, genre)) {
                continue;
            }
            seen.push(genre);
            self.record_watch(genre);
        }
    }

    /// Blank genre names are ignored; others are stored trimmed
    fn add_count(&mut self, genre: String, count: u32) {
        let genre = genre.trim();
        if genre.is_empty() {
            return;
        }
        match self
            .entries
            .iter_mut()
            .find(|entry| same_genre(&entry.genre, genre))
        {
            Some(entry) => entry.watch_count = entry.watch_count.saturating_add(count),
            None => self.entries.push(GenrePreference {
                genre: genre.to_string(),
                watch_count: count,
            }),
        }
    }

    /// Watch count for a genre, 0 if never recorded
    pub fn watch_count(&self, genre: &str) -> u32 {
        self.entries
            .iter()
            .find(|entry| same_genre(&entry.genre, genre))
            .map(|entry| entry.watch_count)
            .unwrap_or(0)
    }

    /// The `n` most watched genres, highest count first.
    ///
    /// Genres with a zero count are not history and never appear. Equal
    /// counts keep insertion order.
    pub fn top_genres(&self, n: usize) -> Vec<&str> {
        let mut watched: Vec<&GenrePreference> = self
            .entries
            .iter()
            .filter(|entry| entry.watch_count > 0)
            .collect();
        // Stable sort: equal counts stay in insertion order
        watched.sort_by(|a, b| b.watch_count.cmp(&a.watch_count));
        watched
            .into_iter()
            .take(n)
            .map(|entry| entry.genre.as_str())
            .collect()
    }

    /// True if at least one genre has a non-zero count
    pub fn has_history(&self) -> bool {
        self.entries.iter().any(|entry| entry.watch_count > 0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &GenrePreference> {
        self.entries.iter()
    }
}

// =============================================================================
// Booking and Showing Records
// =============================================================================

/// A completed booking: one user, one movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Unix timestamp of the booking
    pub timestamp: i64,
}

/// A movie playing in a city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showing {
    pub city: String,
    pub movie_id: MovieId,
}

// =============================================================================
// Catalog - The In-Memory Index
// =============================================================================

/// Holds every movie, showing and booking with lookup indices.
///
/// Movies keep file order; that order is the candidate-list order the
/// ranking engine uses for tie-breaking.
#[derive(Debug, Default)]
pub struct Catalog {
    // Primary data stores
    pub(crate) movies: Vec<Movie>,
    pub(crate) movie_positions: HashMap<MovieId, usize>,
    pub(crate) showings: Vec<Showing>,
    pub(crate) user_bookings: HashMap<UserId, Vec<Booking>>,

    // Secondary indices, keyed by lowercase name
    /// Movies playing in each city
    pub(crate) city_index: HashMap<String, Vec<MovieId>>,
    /// Movies tagged with each genre
    pub(crate) genre_index: HashMap<String, Vec<MovieId>>,
}

impl Catalog {
    /// Creates a new, empty Catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.movie_positions
            .get(&id)
            .and_then(|&position| self.movies.get(position))
    }

    /// All movies in catalogue order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Movies playing in `city`, in catalogue order.
    ///
    /// A catalogue without any showings treats every movie as playing
    /// everywhere. Otherwise an unknown city has no movies.
    pub fn movies_in_city(&self, city: &str) -> Vec<&Movie> {
        if self.showings.is_empty() {
            return self.movies.iter().collect();
        }
        let Some(ids) = self.city_index.get(&name_key(city)) else {
            return Vec::new();
        };
        self.movies
            .iter()
            .filter(|movie| ids.contains(&movie.id))
            .collect()
    }

    /// IDs of movies tagged with `genre` (case-insensitive)
    pub fn movies_by_genre(&self, genre: &str) -> &[MovieId] {
        self.genre_index
            .get(&name_key(genre))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All bookings made by a user, in file order
    ///
    /// Returns an empty slice if the user has no bookings
    pub fn user_bookings(&self, user_id: UserId) -> &[Booking] {
        self.user_bookings
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Known city names (lowercase)
    pub fn cities(&self) -> Vec<&str> {
        let mut cities: Vec<&str> = self.city_index.keys().map(|c| c.as_str()).collect();
        cities.sort_unstable();
        cities
    }

    /// Every user with at least one booking, ascending
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.user_bookings.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Insert a movie, replacing any movie with the same ID in place
    pub fn insert_movie(&mut self, movie: Movie) {
        match self.movie_positions.get(&movie.id) {
            Some(&position) => self.movies[position] = movie,
            None => {
                self.movie_positions.insert(movie.id, self.movies.len());
                self.movies.push(movie);
            }
        }
    }

    /// Insert a showing
    pub fn insert_showing(&mut self, showing: Showing) {
        self.showings.push(showing);
    }

    /// Insert a booking
    pub fn insert_booking(&mut self, booking: Booking) {
        self.user_bookings
            .entry(booking.user_id)
            .or_insert_with(Vec::new)
            .push(booking);
    }

    /// Get counts for debugging/validation: (movies, cities, bookings)
    pub fn counts(&self) -> (usize, usize, usize) {
        let total_bookings = self.user_bookings.values().map(|v| v.len()).sum();
        (self.movies.len(), self.city_index.len(), total_bookings)
    }
}
