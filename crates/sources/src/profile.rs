//! Build a PreferenceProfile from a user's booking history
//!
//! Each completed booking counts once for every genre of the booked movie.
//! Bookings are replayed in file order, so the genre a user booked first
//! wins ties among equally watched genres.

use anyhow::{anyhow, Result};
use catalog::{Catalog, PreferenceProfile, UserId};

/// Build a PreferenceProfile for `user_id` from the catalogue's bookings
///
/// A user without bookings gets the empty profile (a cold start). A booking
/// that points at a movie missing from the catalogue is an error.
pub fn build_preference_profile(catalog: &Catalog, user_id: UserId) -> Result<PreferenceProfile> {
    let mut profile = PreferenceProfile::new();

    for booking in catalog.user_bookings(user_id) {
        let movie = catalog.get_movie(booking.movie_id).ok_or_else(|| {
            anyhow!(
                "Booking by user {} references unknown movie {}",
                user_id,
                booking.movie_id
            )
        })?;
        profile.record_booking(&movie.genres);
    }

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{Booking, Movie};

    fn create_test_catalog() -> Catalog {
        let mut catalog = Catalog::new();

        catalog.insert_movie(Movie::new(
            1,
            "Action Movie",
            vec!["Action".to_string(), "Adventure".to_string()],
            "2024-01-01",
            10.0,
        ));
        catalog.insert_movie(Movie::new(
            2,
            "Drama Movie",
            vec!["Drama".to_string()],
            "2024-01-01",
            10.0,
        ));
        catalog.insert_movie(Movie::new(
            3,
            "Action Movie 2",
            vec!["action".to_string(), "Sci-Fi".to_string()],
            "2024-01-01",
            10.0,
        ));

        for (movie_id, timestamp) in [(2, 1000000), (1, 1000001), (3, 1000002)] {
            catalog.insert_booking(Booking {
                user_id: 1,
                movie_id,
                timestamp,
            });
        }

        catalog
    }

    #[test]
    fn test_build_profile_counts_genres() {
        let catalog = create_test_catalog();
        let profile = build_preference_profile(&catalog, 1).unwrap();

        assert_eq!(profile.watch_count("Action"), 2);
        assert_eq!(profile.watch_count("Drama"), 1);
        assert_eq!(profile.watch_count("Adventure"), 1);
        assert_eq!(profile.watch_count("Sci-Fi"), 1);
    }

    #[test]
    fn test_build_profile_tie_order_follows_bookings() {
        let catalog = create_test_catalog();
        let profile = build_preference_profile(&catalog, 1).unwrap();

        // Drama was booked first, so it leads the one-watch genres
        assert_eq!(
            profile.top_genres(5),
            vec!["Action", "Drama", "Adventure", "Sci-Fi"]
        );
    }

    #[test]
    fn test_user_with_no_bookings() {
        let catalog = create_test_catalog();
        let profile = build_preference_profile(&catalog, 999).unwrap();
        assert!(profile.is_empty());
        assert!(!profile.has_history());
    }

    #[test]
    fn test_booking_for_unknown_movie() {
        let mut catalog = create_test_catalog();
        catalog.insert_booking(Booking {
            user_id: 2,
            movie_id: 42,
            timestamp: 1000003,
        });

        let result = build_preference_profile(&catalog, 2);
        assert!(result.is_err());
    }
}
