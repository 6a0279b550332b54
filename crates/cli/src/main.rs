use anyhow::{Context, Result};
use catalog::{Catalog, Movie, UserId};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use ranking::{RankingConfig, RecommendationEngine, ScoredMovie};
use server::{FeedOrchestrator, FixedClock, HomeFeed};
use sources::IndexedCatalogSource;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// ReelFeed - Movie home-screen ranking
#[derive(Parser)]
#[command(name = "reel-feed")]
#[command(about = "Ranks a city's movies into home-screen feeds", long_about = None)]
struct Cli {
    /// Directory holding movies.dat, showings.dat and bookings.dat
    #[arg(short, long, default_value = "data/catalog")]
    data_dir: PathBuf,

    /// JSON file overriding weights, windows and view limits
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rank as of this date (YYYY-MM-DD) instead of today
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every section of the home feed
    Feed {
        #[arg(long)]
        city: String,

        /// Leave out for an anonymous visitor
        #[arg(long)]
        user_id: Option<UserId>,
    },

    /// Rank every movie in a city by composite score
    Rank {
        #[arg(long)]
        city: String,

        #[arg(long)]
        user_id: Option<UserId>,

        /// Show the popularity, new-release and genre-match sub-scores
        #[arg(long)]
        explain: bool,

        /// Number of movies to show (default: all)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Most popular movies in a city
    Trending {
        #[arg(long)]
        city: String,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Newest movies in a city
    NewReleases {
        #[arg(long)]
        city: String,

        /// Sort every movie by release date instead of only recent ones
        #[arg(long)]
        all: bool,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Most popular movies of one genre
    Genre {
        #[arg(long)]
        city: String,

        /// Genre tag, case-insensitive
        #[arg(long)]
        name: String,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show a user's genre preferences and booking history
    Profile {
        #[arg(long)]
        user_id: UserId,
    },

    /// Run benchmark to test performance
    Benchmark {
        #[arg(long)]
        city: String,

        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let engine = match &cli.config {
        Some(path) => RecommendationEngine::new(RankingConfig::from_json_file(path)?),
        None => RecommendationEngine::default(),
    };
    debug!("Ranking config: {:?}", engine.config());

    let catalog = Arc::new(load_catalog(&cli.data_dir, cli.json)?);
    let source = Arc::new(IndexedCatalogSource::new(catalog.clone()));
    let mut orchestrator = FeedOrchestrator::new(source.clone(), source).with_engine(engine);
    if let Some(today) = cli.today {
        orchestrator = orchestrator.with_clock(Arc::new(FixedClock(today)));
    }

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Feed { city, user_id } => {
            let feed = orchestrator.home_feed(user_id, &city).await?;
            if cli.json {
                print_json(&feed)?;
            } else {
                print_feed(&feed);
            }
        }
        Commands::Rank {
            city,
            user_id,
            explain,
            limit,
        } => {
            let mut ranked = orchestrator.ranked(user_id, &city).await?;
            if let Some(limit) = limit {
                ranked.truncate(limit);
            }
            if cli.json {
                print_json(&ranked)?;
            } else {
                print_ranked(&ranked, explain);
            }
        }
        Commands::Trending { city, limit } => {
            let movies = orchestrator.trending(&city, limit).await?;
            print_movies(&format!("Trending in {}", city), &movies, cli.json)?;
        }
        Commands::NewReleases { city, all, limit } => {
            let movies = orchestrator.new_releases(&city, !all, limit).await?;
            print_movies(&format!("New releases in {}", city), &movies, cli.json)?;
        }
        Commands::Genre { city, name, limit } => {
            let movies = orchestrator.genre_feed(&city, &name, limit).await?;
            print_movies(&format!("{} in {}", name, city), &movies, cli.json)?;
        }
        Commands::Profile { user_id } => handle_profile(&catalog, &orchestrator, user_id, cli.json).await?,
        Commands::Benchmark { city, requests } => {
            handle_benchmark(&catalog, orchestrator, city, requests).await?
        }
    }

    Ok(())
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

fn load_catalog(data_dir: &Path, quiet: bool) -> Result<Catalog> {
    let start = Instant::now();
    let catalog = Catalog::load_from_files(data_dir)
        .with_context(|| format!("Failed to load catalogue from {}", data_dir.display()))?;
    if !quiet {
        let (movies, cities, bookings) = catalog.counts();
        println!(
            "{} Loaded {} movies, {} cities, {} bookings in {:?}",
            "✓".green(),
            movies,
            cities,
            bookings,
            start.elapsed()
        );
    }
    Ok(catalog)
}

/// Handle the 'profile' command
async fn handle_profile(
    catalog: &Catalog,
    orchestrator: &FeedOrchestrator,
    user_id: UserId,
    json: bool,
) -> Result<()> {
    let profile = orchestrator.profile(user_id).await?;
    if json {
        return print_json(&profile);
    }

    println!("{}", format!("User ID: {}", user_id).bold().blue());
    if !profile.has_history() {
        println!("{}No bookings yet, ranking uses neutral genre scores", "• ".yellow());
        return Ok(());
    }

    let top = profile.top_genres(orchestrator.engine().config().top_genres);
    println!("{}Top genres: {}", "• ".green(), top.join(", "));

    println!("Genre watch counts:");
    for entry in profile.iter() {
        println!("  - {}: {}", entry.genre, entry.watch_count);
    }

    let bookings = catalog.user_bookings(user_id);
    println!("Bookings ({}):", bookings.len());
    for booking in bookings.iter().take(10) {
        if let Some(movie) = catalog.get_movie(booking.movie_id) {
            println!("  - {} [{}]", movie.title, movie.genres.join(", "));
        }
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    catalog: &Catalog,
    orchestrator: FeedOrchestrator,
    city: String,
    requests: usize,
) -> Result<()> {
    if requests == 0 {
        println!("Nothing to benchmark");
        return Ok(());
    }

    // Cycle through users with history, plus anonymous visitors
    let mut users: Vec<Option<UserId>> = catalog.user_ids().into_iter().map(Some).collect();
    users.push(None);

    // Use tokio::spawn to make concurrent requests
    let overall = Instant::now();
    let mut handles = vec![];
    for user_id in users.into_iter().cycle().take(requests) {
        let orchestrator = orchestrator.clone();
        let city = city.clone();
        handles.push(tokio::spawn(async move {
            let start = Instant::now();
            orchestrator.home_feed(user_id, &city).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    // Wait for all tasks to complete and collect timings
    let mut timings: Vec<Duration> = vec![];
    for handle in handles {
        timings.push(handle.await??);
    }
    let wall_time = overall.elapsed();

    timings.sort();
    let total: Duration = timings.iter().sum();
    let percentile = |p: f32| timings[((timings.len() - 1) as f32 * p) as usize];

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {}", requests);
    println!("Wall time: {:?}", wall_time);
    println!("Average latency: {:?}", total / timings.len() as u32);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!(
        "Throughput: {:.2} requests/second",
        requests as f64 / wall_time.as_secs_f64()
    );
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_feed(feed: &HomeFeed) {
    let who = match feed.user_id {
        Some(id) => format!("user {}", id),
        None => "anonymous visitor".to_string(),
    };
    println!(
        "{}",
        format!("Home feed for {} in {} on {}", who, feed.city, feed.today).bold().blue()
    );
    if feed.is_empty() {
        println!("{}", "No movies playing in this city".yellow());
        return;
    }

    print_section("Banner", &feed.banner);
    print_section("Recommended for you", &feed.recommended);
    print_section("New releases", &feed.new_releases);
    print_section("Trending", &feed.trending);
    print_section("Now showing", &feed.now_showing);
}

fn print_movies(title: &str, movies: &[Movie], json: bool) -> Result<()> {
    if json {
        return print_json(&movies);
    }
    println!("{}", title.bold().blue());
    if movies.is_empty() {
        println!("{}", "Nothing to show".yellow());
    }
    for (i, movie) in movies.iter().enumerate() {
        println!("{}. {}", (i + 1).to_string().green(), describe(movie));
    }
    Ok(())
}

fn print_section(name: &str, movies: &[Movie]) {
    println!();
    println!("{}", name.bold());
    for (i, movie) in movies.iter().enumerate() {
        println!("  {}. {}", (i + 1).to_string().green(), describe(movie));
    }
}

fn print_ranked(ranked: &[ScoredMovie], explain: bool) {
    println!("{}", "Ranked movies:".bold().blue());
    for (i, scored) in ranked.iter().enumerate() {
        println!(
            "{}. {} - Score: {:.3}",
            (i + 1).to_string().green(),
            describe(&scored.movie),
            scored.score
        );
        if explain {
            let c = &scored.components;
            println!(
                "   popularity {:.3} | new release {:.1} | genre match {:.3}",
                c.popularity, c.new_release, c.genre_match
            );
        }
    }
}

fn describe(movie: &Movie) -> String {
    let released = if movie.release_date.is_empty() {
        "TBA"
    } else {
        movie.release_date.as_str()
    };
    format!(
        "{} ({}) [{}] popularity {:.1}",
        movie.title,
        released,
        movie.genres.join(", "),
        movie.popularity
    )
}
