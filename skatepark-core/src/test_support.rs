//! Park builders shared by unit and behaviour tests.

use geo::Coord;

use crate::{Amenity, Area, LocalizedNames, Park, RatingAggregate};

/// Build a park with an English name and the given rating pool.
#[must_use]
pub fn rated_park(id: &str, name: &str, average: f64, count: u32) -> Park {
    Park::new(id, LocalizedNames::english(name), Area::Center)
        .with_rating(RatingAggregate::new(average, count))
}

/// Build a park in `area`, optionally placed at `location`.
///
/// The park is named after its identifier.
#[must_use]
pub fn park_at(id: &str, area: Area, location: Option<Coord<f64>>) -> Park {
    let mut park = Park::new(id, LocalizedNames::english(id), area);
    park.location = location;
    park
}

/// A small directory spread across the three areas, with Hebrew names.
#[must_use]
pub fn sample_directory() -> Vec<Park> {
    vec![
        Park::new(
            "sportek",
            LocalizedNames::new("Sportek Skatepark", "סקייטפארק ספורטק"),
            Area::Center,
        )
        .with_location(Coord { x: 34.7925, y: 32.0990 })
        .with_amenity(Amenity::Lighting, true)
        .with_amenity(Amenity::Water, true)
        .with_rating(RatingAggregate::new(4.5, 12))
        .with_difficulty(RatingAggregate::new(3.0, 4)),
        Park::new(
            "haifa-bay",
            LocalizedNames::new("Haifa Bay Park", "פארק מפרץ חיפה"),
            Area::North,
        )
        .with_location(Coord { x: 35.0300, y: 32.8000 })
        .with_amenity(Amenity::Parking, true)
        .with_rating(RatingAggregate::new(3.8, 5)),
        Park::new(
            "beer-sheva",
            LocalizedNames::new("Beer Sheva Bowl", "הקערה של באר שבע"),
            Area::South,
        )
        .with_location(Coord { x: 34.7913, y: 31.2518 })
        .with_amenity(Amenity::Shade, true)
        .with_amenity(Amenity::Lighting, true)
        .with_rating(RatingAggregate::new(4.1, 9))
        .with_difficulty(RatingAggregate::new(4.2, 6)),
        Park::new("ramat-gan", LocalizedNames::english("Ramat Gan Plaza"), Area::Center)
            .with_rating(RatingAggregate::new(2.9, 3)),
    ]
}
