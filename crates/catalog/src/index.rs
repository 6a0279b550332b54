//! Catalog building and indexing logic.
//!
//! This module builds the Catalog from parsed data:
//! - Insert movies in file order (that order is the candidate order)
//! - Build secondary indices (city_index, genre_index)
//! - Validate cross-file references

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

impl Catalog {
    /// Load a catalogue from a directory
    ///
    /// `movies.dat` is required. `showings.dat` and `bookings.dat` are
    /// optional; a missing file is treated as empty.
    ///
    /// Steps:
    /// 1. Parse all three files in parallel
    /// 2. Insert records
    /// 3. Build secondary indices (city, genre)
    /// 4. Validate references
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading catalogue from {:?}", data_dir);

        let movies_path = data_dir.join("movies.dat");
        let showings_path = data_dir.join("showings.dat");
        let bookings_path = data_dir.join("bookings.dat");

        let ((movies, showings), bookings) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_movies(&movies_path),
                    || parse_optional(&showings_path, parser::parse_showings),
                )
            },
            || parse_optional(&bookings_path, parser::parse_bookings),
        );

        let movies = movies?;
        let showings = showings?;
        let bookings = bookings?;

        info!(
            "Loaded {} movies, {} showings, {} bookings",
            movies.len(),
            showings.len(),
            bookings.len()
        );

        let mut catalog = Catalog::new();

        let mut seen_ids = HashSet::with_capacity(movies.len());
        for movie in movies {
            if !seen_ids.insert(movie.id) {
                return Err(CatalogError::ValidationError(format!(
                    "duplicate movie id {} in movies.dat",
                    movie.id
                )));
            }
            catalog.insert_movie(movie);
        }

        for showing in showings {
            catalog.insert_showing(showing);
        }

        for booking in bookings {
            catalog.insert_booking(booking);
        }

        catalog.build_secondary_indices();
        catalog.validate()?;

        debug!("Catalogue indexed: {} cities", catalog.city_index.len());
        Ok(catalog)
    }

    /// Build secondary indices after primary data is loaded
    ///
    /// Keys are lowercased so lookups ignore case. Rebuilding from scratch
    /// makes this safe to call again after further inserts.
    pub fn build_secondary_indices(&mut self) {
        self.city_index.clear();
        self.genre_index.clear();

        for showing in &self.showings {
            let ids = self
                .city_index
                .entry(name_key(&showing.city))
                .or_insert_with(Vec::new);
            if !ids.contains(&showing.movie_id) {
                ids.push(showing.movie_id);
            }
        }

        for movie in &self.movies {
            for genre in &movie.genres {
                let ids = self
                    .genre_index
                    .entry(name_key(genre))
                    .or_insert_with(Vec::new);
                if !ids.contains(&movie.id) {
                    ids.push(movie.id);
                }
            }
        }
    }

    /// Validate data integrity
    ///
    /// Every showing and booking must reference a known movie.
    pub fn validate(&self) -> Result<()> {
        for showing in &self.showings {
            if self.get_movie(showing.movie_id).is_none() {
                return Err(CatalogError::MissingReference {
                    entity: "Movie".to_string(),
                    id: showing.movie_id,
                });
            }
        }
        for bookings in self.user_bookings.values() {
            for booking in bookings {
                if self.get_movie(booking.movie_id).is_none() {
                    return Err(CatalogError::MissingReference {
                        entity: "Movie".to_string(),
                        id: booking.movie_id,
                    });
                }
            }
        }
        Ok(())
    }
}

fn parse_optional<T>(path: &Path, parse: fn(&Path) -> Result<Vec<T>>) -> Result<Vec<T>> {
    if path.exists() {
        parse(path)
    } else {
        debug!("{:?} not present, treating as empty", path);
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_catalog(dir: &Path, movies: &str, showings: Option<&str>, bookings: Option<&str>) {
        fs::write(dir.join("movies.dat"), movies).unwrap();
        if let Some(showings) = showings {
            fs::write(dir.join("showings.dat"), showings).unwrap();
        }
        if let Some(bookings) = bookings {
            fs::write(dir.join("bookings.dat"), bookings).unwrap();
        }
    }

    const MOVIES: &str = "1::Alpha::Action|Drama::2024-05-01::10\n\
                          2::Beta::Comedy::2024-04-01::20\n\
                          3::Gamma::action::2024-03-01::30\n";

    #[test]
    fn test_load_catalog() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(
            dir.path(),
            MOVIES,
            Some("Pune::1\nPune::3\nMumbai::2\npune::1\n"),
            Some("7::1::1700000000\n7::2::1700000100\n"),
        );

        let catalog = Catalog::load_from_files(dir.path()).unwrap();
        let (movies, cities, bookings) = catalog.counts();
        assert_eq!(movies, 3);
        assert_eq!(cities, 2);
        assert_eq!(bookings, 2);

        let pune: Vec<MovieId> = catalog.movies_in_city("PUNE").iter().map(|m| m.id).collect();
        assert_eq!(pune, vec![1, 3]);
        assert!(catalog.movies_in_city("Delhi").is_empty());

        assert_eq!(catalog.movies_by_genre("Action"), &[1, 3]);
        assert_eq!(catalog.user_bookings(7).len(), 2);
        assert_eq!(catalog.user_ids(), vec![7]);
    }

    #[test]
    fn test_optional_files() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path(), MOVIES, None, None);

        let catalog = Catalog::load_from_files(dir.path()).unwrap();
        // Without showings every movie plays everywhere
        assert_eq!(catalog.movies_in_city("anywhere").len(), 3);
        assert!(catalog.user_bookings(7).is_empty());
    }

    #[test]
    fn test_missing_movies_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Catalog::load_from_files(dir.path());
        assert!(matches!(result, Err(CatalogError::FileNotFound { .. })));
    }

    #[test]
    fn test_dangling_showing() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path(), MOVIES, Some("Pune::99\n"), None);

        let result = Catalog::load_from_files(dir.path());
        assert!(matches!(
            result,
            Err(CatalogError::MissingReference { id: 99, .. })
        ));
    }

    #[test]
    fn test_duplicate_movie_id() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path(), "1::A::::::\n1::B::::::\n", None, None);

        let result = Catalog::load_from_files(dir.path());
        assert!(matches!(result, Err(CatalogError::ValidationError(_))));
    }
}
