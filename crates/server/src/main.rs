//! Simple test harness for the feed orchestrator.
//!
//! Loads the catalogue from `data/catalog` (or the directory given as the
//! first argument) and logs the home feed for one user in one city.
//!
//! Usage: server [DATA_DIR] [CITY] [USER_ID]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalog::{Catalog, Movie};
use server::FeedOrchestrator;
use sources::IndexedCatalogSource;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let data_dir = PathBuf::from(args.next().unwrap_or_else(|| "data/catalog".to_string()));
    let city = args.next().unwrap_or_else(|| "Pune".to_string());
    let user_id = args
        .next()
        .map(|raw| raw.parse().with_context(|| format!("Invalid user id {:?}", raw)))
        .transpose()?;

    info!("Loading catalogue from {}", data_dir.display());
    let catalog = Arc::new(
        Catalog::load_from_files(&data_dir).context("Failed to load catalogue")?,
    );
    let source = Arc::new(IndexedCatalogSource::new(catalog));
    let orchestrator = FeedOrchestrator::new(source.clone(), source);

    info!("Building home feed for user {:?} in {}", user_id, city);
    let feed = orchestrator.home_feed(user_id, &city).await?;

    log_section("Banner", &feed.banner);
    log_section("Recommended", &feed.recommended);
    log_section("New releases", &feed.new_releases);
    log_section("Trending", &feed.trending);
    log_section("Now showing", &feed.now_showing);

    Ok(())
}

fn log_section(name: &str, movies: &[Movie]) {
    info!("{} ({}):", name, movies.len());
    for (i, movie) in movies.iter().enumerate() {
        info!(
            "  {}. {} [{}] released {} popularity {:.1}",
            i + 1,
            movie.title,
            movie.genres.join(", "),
            movie.release_date,
            movie.popularity
        );
    }
}
