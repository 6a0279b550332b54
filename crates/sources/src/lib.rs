//! # Sources Crate
//!
//! Collaborators that supply the ranking engine with its two inputs.
//!
//! ## Components
//!
//! ### CatalogSource
//! Candidate movies for a city. One call returns one consistent snapshot;
//! popularity is normalized against exactly that list.
//!
//! ### PreferenceSource
//! A user's per-genre watch counts, built from completed bookings.
//!
//! ### Implementations
//! - `IndexedCatalogSource`: both traits over a loaded `Catalog`
//! - `StaticCatalogSource` / `StaticPreferenceSource`: fixed in-memory data
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{CatalogSource, IndexedCatalogSource, PreferenceSource};
//! use catalog::Catalog;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::load_from_files(Path::new("data/catalog"))?);
//! let source = IndexedCatalogSource::new(catalog);
//!
//! let candidates = source.candidates("Pune")?;
//! let profile = source.profile(42)?;
//! ```

// Public modules
pub mod types;
pub mod profile;
pub mod catalog_source;
pub mod fixed;

// Re-export commonly used types
pub use types::{CatalogSource, PreferenceSource};
pub use catalog_source::IndexedCatalogSource;
pub use fixed::{StaticCatalogSource, StaticPreferenceSource};
