//! # Catalog Crate
//!
//! Domain types for movie ranking plus an in-memory catalogue loaded from
//! `::`-separated data files.
//!
//! ## Main Components
//!
//! - **types**: `Movie`, `PreferenceProfile`, `Booking`, `Showing`, `Catalog`
//! - **parser**: Parse .dat files into Rust structs
//! - **index**: Build the city and genre indices, validate references
//! - **error**: Error types for catalogue loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_files(Path::new("data/catalog"))?;
//!
//! let playing = catalog.movies_in_city("Pune");
//! let bookings = catalog.user_bookings(42);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Core types
    Movie,
    GenrePreference,
    PreferenceProfile,
    Booking,
    Showing,
    Catalog,
    // Name matching
    name_key,
    same_genre,
};
