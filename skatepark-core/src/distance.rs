//! Great-circle distances between WGS84 coordinates.

use geo::{Distance, Haversine, Point};

/// Haversine distance in kilometres between two `x = lon`, `y = lat` points.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use skatepark_core::haversine_km;
///
/// let tel_aviv = Coord { x: 34.7818, y: 32.0853 };
/// let jerusalem = Coord { x: 35.2137, y: 31.7683 };
/// let km = haversine_km(tel_aviv, jerusalem);
/// assert!((50.0..60.0).contains(&km));
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "converting metres to kilometres divides by 1000"
)]
pub fn haversine_km(from: geo::Coord<f64>, to: geo::Coord<f64>) -> f64 {
    Haversine.distance(Point::from(from), Point::from(to)) / 1000.0
}
