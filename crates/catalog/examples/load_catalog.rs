use catalog::Catalog;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data/catalog");

    println!("Loading movie catalogue...\n");

    let start = Instant::now();
    let catalog = Catalog::load_from_files(data_dir)
        .expect("Failed to load catalogue");
    let elapsed = start.elapsed();

    let (movies, cities, bookings) = catalog.counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", movies);
    println!("Cities: {}", cities);
    println!("Bookings: {}", bookings);
    println!("\nPerformance: {:.0} movies/second",
             movies as f64 / elapsed.as_secs_f64());
}
