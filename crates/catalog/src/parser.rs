//! Parser for catalogue data files.
//!
//! All files are `::`-separated, one record per line:
//! - movies.dat: movieId::title::genres::releaseDate::popularity
//! - showings.dat: city::movieId
//! - bookings.dat: userId::movieId::timestamp
//!
//! Structural problems (missing fields, non-numeric ids) are errors. Fields
//! the ranking engine can degrade on its own are accepted as-is, and a
//! malformed popularity becomes 0.0 with a warning.

use crate::error::{CatalogError, Result};
use crate::types::*;
use std::fs;
use std::path::Path;
use std::str::Split;
use tracing::warn;

/// Read a file into lines, replacing invalid UTF-8 sequences
fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let bytes = fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(content.lines().map(|s| s.to_string()).collect())
}

/// Non-empty, trimmed lines paired with their 1-based line number
fn records(lines: &[String]) -> impl Iterator<Item = (usize, &str)> {
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// Pull the next `::` field or report which one is missing
fn next_field<'a>(
    parts: &mut Split<'a, &'static str>,
    file: &str,
    line: usize,
    name: &str,
) -> Result<&'a str> {
    parts.next().ok_or_else(|| CatalogError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Missing {}", name),
    })
}

fn parse_id(value: &str, file: &str, line: usize, name: &str) -> Result<u32> {
    value.trim().parse().map_err(|e| CatalogError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid {}: {}", name, e),
    })
}

/// Parse the movies.dat file
///
/// Format: movieId::title::genres::releaseDate::popularity
///
/// Genres are pipe-separated: "Action|Sci-Fi". An empty genre field means
/// the movie has no genres. Release date and popularity may be missing.
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    const FILE: &str = "movies.dat";
    let lines = read_lines(path)?;
    let mut movies = Vec::new();

    for (line_no, line) in records(&lines) {
        let mut parts = line.split("::");

        let movie_id = next_field(&mut parts, FILE, line_no, "movieId")?;
        let title = next_field(&mut parts, FILE, line_no, "title")?.trim();
        let genres = parts.next().unwrap_or("");
        let release_date = parts.next().unwrap_or("").trim();
        let popularity = parts.next().unwrap_or("");

        let id = parse_id(movie_id, FILE, line_no, "movieId")?;
        if title.is_empty() {
            return Err(CatalogError::InvalidValue {
                field: "title".to_string(),
                value: format!("<empty> (line {})", line_no),
            });
        }

        movies.push(Movie {
            id,
            title: title.to_string(),
            genres: parse_genres(genres),
            release_date: release_date.to_string(),
            popularity: parse_popularity(popularity, id),
        });
    }
    Ok(movies)
}

/// Parse the showings.dat file
///
/// Format: city::movieId
pub fn parse_showings(path: &Path) -> Result<Vec<Showing>> {
    const FILE: &str = "showings.dat";
    let lines = read_lines(path)?;
    let mut showings = Vec::new();

    for (line_no, line) in records(&lines) {
        let mut parts = line.split("::");

        let city = next_field(&mut parts, FILE, line_no, "city")?.trim();
        let movie_id = next_field(&mut parts, FILE, line_no, "movieId")?;

        if city.is_empty() {
            return Err(CatalogError::InvalidValue {
                field: "city".to_string(),
                value: format!("<empty> (line {})", line_no),
            });
        }

        showings.push(Showing {
            city: city.to_string(),
            movie_id: parse_id(movie_id, FILE, line_no, "movieId")?,
        });
    }
    Ok(showings)
}

/// Parse the bookings.dat file
///
/// Format: userId::movieId::timestamp
pub fn parse_bookings(path: &Path) -> Result<Vec<Booking>> {
    const FILE: &str = "bookings.dat";
    let lines = read_lines(path)?;
    let mut bookings = Vec::new();

    for (line_no, line) in records(&lines) {
        let mut parts = line.split("::");

        let user_id = next_field(&mut parts, FILE, line_no, "userId")?;
        let movie_id = next_field(&mut parts, FILE, line_no, "movieId")?;
        let timestamp = next_field(&mut parts, FILE, line_no, "timestamp")?;

        bookings.push(Booking {
            user_id: parse_id(user_id, FILE, line_no, "userId")?,
            movie_id: parse_id(movie_id, FILE, line_no, "movieId")?,
            timestamp: timestamp.trim().parse().map_err(|e| CatalogError::ParseError {
                file: FILE.to_string(),
                line: line_no,
                reason: format!("Invalid timestamp: {}", e),
            })?,
        });
    }
    Ok(bookings)
}

/// Split pipe-separated genres, dropping blanks
///
/// Example: "Action| Sci-Fi|" -> ["Action", "Sci-Fi"]
fn parse_genres(s: &str) -> Vec<String> {
    s.split('|')
        .map(str::trim)
        .filter(|genre| !genre.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a popularity score, degrading anything unusable to 0.0
fn parse_popularity(s: &str, movie_id: MovieId) -> f32 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s.parse::<f32>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => {
            warn!("Movie {} has unusable popularity {:?}, using 0.0", movie_id, s);
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_genres() {
        assert_eq!(parse_genres("Action|Sci-Fi"), vec!["Action", "Sci-Fi"]);
        assert_eq!(parse_genres(" Drama | |"), vec!["Drama"]);
        assert!(parse_genres("").is_empty());
    }

    #[test]
    fn test_parse_popularity_degrades() {
        assert_eq!(parse_popularity("87.5", 1), 87.5);
        assert_eq!(parse_popularity("", 1), 0.0);
        assert_eq!(parse_popularity("lots", 1), 0.0);
        assert_eq!(parse_popularity("-3", 1), 0.0);
        assert_eq!(parse_popularity("NaN", 1), 0.0);
    }

    #[test]
    fn test_parse_movies() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "movies.dat",
            "1::Dune: Part Two::Action|Sci-Fi::2024-03-01::98.2\n\
             \n\
             2::Quiet Film::::not-a-date::oops\n\
             3::Bare Title\n",
        );

        let movies = parse_movies(&path).unwrap();
        assert_eq!(movies.len(), 3);

        assert_eq!(movies[0].title, "Dune: Part Two");
        assert_eq!(movies[0].genres, vec!["Action", "Sci-Fi"]);
        assert_eq!(movies[0].release_date, "2024-03-01");
        assert_eq!(movies[0].popularity, 98.2);

        assert!(movies[1].genres.is_empty());
        assert_eq!(movies[1].release_date, "not-a-date");
        assert_eq!(movies[1].popularity, 0.0);

        assert_eq!(movies[2].release_date, "");
        assert_eq!(movies[2].popularity, 0.0);
    }

    #[test]
    fn test_parse_movies_bad_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "movies.dat", "abc::Title::Drama::2024-01-01::1\n");

        let result = parse_movies(&path);
        assert!(matches!(
            result,
            Err(CatalogError::ParseError { line: 1, .. })
        ));
    }

    #[test]
    fn test_parse_bookings_missing_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "bookings.dat", "1::10::1700000000\n2::11\n");

        let err = parse_bookings(&path).unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(err.to_string().contains("Missing timestamp"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_showings(&dir.path().join("showings.dat"));
        assert!(matches!(result, Err(CatalogError::FileNotFound { .. })));
    }
}
