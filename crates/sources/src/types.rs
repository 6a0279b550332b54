//! Collaborator traits that feed the ranking engine.
//!
//! The engine itself never fetches anything. Whatever supplies candidate
//! movies and preference profiles implements one of these traits, so the
//! orchestrator can be wired to the file-backed catalogue in production and
//! to fixed in-memory data in tests.

use anyhow::Result;
use catalog::{Movie, PreferenceProfile, UserId};

/// Supplies the candidate movies for a city.
///
/// ## Design Note
/// - `Send + Sync` so one source can be shared across request tasks
/// - Returns an owned snapshot: the engine ranks one consistent list per call
/// - Candidate order matters, it decides ties in every ranked view
pub trait CatalogSource: Send + Sync {
    /// Returns the name of this source (for logging/debugging)
    fn name(&self) -> &str;

    /// Movies currently offered in `city`. May be empty.
    fn candidates(&self, city: &str) -> Result<Vec<Movie>>;

    /// Movies in `city` tagged with `genre`, in candidate-list order.
    ///
    /// The default narrows `candidates`; indexed sources can do better.
    fn candidates_in_genre(&self, city: &str, genre: &str) -> Result<Vec<Movie>> {
        Ok(self
            .candidates(city)?
            .into_iter()
            .filter(|movie| movie.has_genre(genre))
            .collect())
    }
}

/// Supplies a user's genre watch counts.
pub trait PreferenceSource: Send + Sync {
    /// Returns the name of this source (for logging/debugging)
    fn name(&self) -> &str;

    /// The profile for `user_id`, or the empty profile for an unknown user
    fn profile(&self, user_id: UserId) -> Result<PreferenceProfile>;
}
