//! Filter implementations used by the engine's views.

pub mod genre;
pub mod release_window;

// Re-export for convenience
pub use genre::GenreFilter;
pub use release_window::ReleaseWindowFilter;
