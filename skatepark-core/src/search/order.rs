//! Comparators for the non-search sort modes.

use std::cmp::Ordering;

use geo::Coord;

use crate::{Park, haversine_km};

/// Order parks by descending average, then by descending vote count.
///
/// # Examples
/// ```
/// use std::cmp::Ordering;
/// use skatepark_core::{Area, LocalizedNames, Park, RatingAggregate};
/// use skatepark_core::search::compare_by_rating;
///
/// let busy = Park::new("a", LocalizedNames::english("A"), Area::North)
///     .with_rating(RatingAggregate::new(4.5, 40));
/// let quiet = Park::new("b", LocalizedNames::english("B"), Area::North)
///     .with_rating(RatingAggregate::new(4.5, 2));
/// assert_eq!(compare_by_rating(&busy, &quiet), Ordering::Less);
/// ```
#[must_use]
pub fn compare_by_rating(a: &Park, b: &Park) -> Ordering {
    b.rating
        .sanitised_average()
        .total_cmp(&a.rating.sanitised_average())
        .then_with(|| b.rating.count.cmp(&a.rating.count))
}

/// Order parks by ascending difficulty; a missing pool counts as `0.0`.
#[must_use]
pub fn compare_by_difficulty(a: &Park, b: &Park) -> Ordering {
    a.difficulty_average().total_cmp(&b.difficulty_average())
}

/// Order precomputed distances ascending.
#[must_use]
pub fn compare_by_distance(a_km: f64, b_km: f64) -> Ordering {
    a_km.total_cmp(&b_km)
}

/// Distance from `origin` to the park in kilometres.
///
/// Parks without a usable location are reported as `0.0` so they tie with
/// each other instead of dropping out of the listing.
#[must_use]
pub fn park_distance_km(park: &Park, origin: Coord<f64>) -> f64 {
    park.known_location()
        .map_or(0.0, |location| haversine_km(origin, location))
}
