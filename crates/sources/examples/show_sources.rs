//! Example: Inspect what the sources hand to the ranking engine
//!
//! Run with: cargo run --package sources --example show_sources
//!
//! This example shows how to:
//! 1. Load the catalogue
//! 2. Fetch the candidate list for a city
//! 3. Build a user's preference profile from bookings

use catalog::Catalog;
use sources::{CatalogSource, IndexedCatalogSource, PreferenceSource};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info,sources=debug")
        .init();

    println!("=== ReelFeed Sources Example ===\n");

    let start = Instant::now();
    let catalog = Arc::new(Catalog::load_from_files(Path::new("data/catalog"))?);
    println!("Loaded catalogue in {:?}", start.elapsed());
    println!("Cities: {}\n", catalog.cities().join(", "));

    let source = IndexedCatalogSource::new(catalog);

    let city = "Pune";
    let candidates = source.candidates(city)?;
    println!("{} candidates in {}:", candidates.len(), city);
    for movie in candidates.iter().take(10) {
        println!(
            "  {} [{}] released {} popularity {:.1}",
            movie.title,
            movie.genres.join(", "),
            movie.release_date,
            movie.popularity
        );
    }

    let user_id = 1;
    let profile = source.profile(user_id)?;
    println!("\nProfile for user {}:", user_id);
    if !profile.has_history() {
        println!("  (no bookings yet)");
    }
    for entry in profile.iter() {
        println!("  {}: {} bookings", entry.genre, entry.watch_count);
    }
    println!("  Top genres: {:?}", profile.top_genres(5));

    Ok(())
}
