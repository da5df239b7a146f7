//! Skatepark records and the closed vocabularies describing them.
//!
//! Coordinates are WGS84 with `x = longitude` and `y = latitude`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use geo::Coord;

use crate::{RatingAggregate, RatingTarget};

/// Opaque park identifier.
///
/// # Examples
/// ```
/// use skatepark_core::ParkId;
///
/// let id = ParkId::from("sportek-tlv");
/// assert_eq!(id.as_str(), "sportek-tlv");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ParkId(String);

impl ParkId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParkId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ParkId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ParkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Region a park belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Area {
    /// Northern district.
    North,
    /// Central district.
    Center,
    /// Southern district.
    South,
}

impl Area {
    /// Return the area as a lowercase `&str`.
    ///
    /// # Examples
    /// ```
    /// use skatepark_core::Area;
    ///
    /// assert_eq!(Area::Center.as_str(), "center");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::Center => "center",
            Self::South => "south",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Area {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "north" => Ok(Self::North),
            "center" | "centre" => Ok(Self::Center),
            "south" => Ok(Self::South),
            _ => Err(format!("unknown area '{s}'")),
        }
    }
}

/// Facilities a park may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Amenity {
    /// On-site or adjacent parking.
    Parking,
    /// Shaded areas.
    Shade,
    /// Lighting for evening sessions.
    Lighting,
    /// Public toilets.
    Toilets,
    /// Drinking water.
    Water,
    /// Benches or stands.
    Seating,
    /// Staffed guard or attendant.
    Guard,
    /// Bicycle racks.
    BikeRacks,
}

impl Amenity {
    /// Every amenity, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Parking,
        Self::Shade,
        Self::Lighting,
        Self::Toilets,
        Self::Water,
        Self::Seating,
        Self::Guard,
        Self::BikeRacks,
    ];

    /// Return the amenity key as a `snake_case` `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parking => "parking",
            Self::Shade => "shade",
            Self::Lighting => "lighting",
            Self::Toilets => "toilets",
            Self::Water => "water",
            Self::Seating => "seating",
            Self::Guard => "guard",
            Self::BikeRacks => "bike_racks",
        }
    }
}

impl fmt::Display for Amenity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Amenity {
    type Err = String;

    /// Parse an amenity key, accepting `snake_case` or `kebab-case`.
    ///
    /// # Examples
    /// ```
    /// use skatepark_core::Amenity;
    ///
    /// assert_eq!("bike-racks".parse::<Amenity>(), Ok(Amenity::BikeRacks));
    /// assert_eq!("Shade".parse::<Amenity>(), Ok(Amenity::Shade));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|amenity| amenity.as_str() == key)
            .ok_or_else(|| format!("unknown amenity '{s}'"))
    }
}

/// Amenity presence flags for a park. Missing keys mean "absent".
///
/// Decoding skips keys outside the [`Amenity`] vocabulary and values that are
/// not booleans, so one odd flag never hides the rest of the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct Amenities(BTreeMap<Amenity, bool>);

impl Amenities {
    /// Construct an empty set of flags.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record whether `amenity` is present.
    pub fn set(&mut self, amenity: Amenity, present: bool) {
        self.0.insert(amenity, present);
    }

    /// Report whether `amenity` is flagged as present.
    #[must_use]
    pub fn has(&self, amenity: Amenity) -> bool {
        self.0.get(&amenity).copied().unwrap_or(false)
    }
}

impl FromIterator<(Amenity, bool)> for Amenities {
    fn from_iter<I: IntoIterator<Item = (Amenity, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Amenities {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = match <lenient::Flags as serde::Deserialize>::deserialize(deserializer)? {
            lenient::Flags::Map(flags) => flags,
            lenient::Flags::Malformed(serde::de::IgnoredAny) => {
                log::warn!("Ignoring amenities that are not a map of flags");
                return Ok(Self::new());
            }
        };
        Ok(raw
            .into_iter()
            .filter_map(|(key, flag)| {
                let Ok(amenity) = key.parse::<Amenity>() else {
                    log::warn!("Ignoring unknown amenity key '{key}'");
                    return None;
                };
                match flag {
                    lenient::Flag::Present(present) => Some((amenity, present)),
                    lenient::Flag::Malformed(serde::de::IgnoredAny) => {
                        log::warn!("Ignoring non-boolean flag for amenity '{key}'");
                        None
                    }
                }
            })
            .collect())
    }
}

/// Display language of the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Hebrew.
    He,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Self::En),
            "he" | "hebrew" | "iw" => Ok(Self::He),
            _ => Err(format!("unknown locale '{s}'")),
        }
    }
}

/// Park names in both directory languages.
///
/// # Examples
/// ```
/// use skatepark_core::{Locale, LocalizedNames};
///
/// let names = LocalizedNames::english("Sportek");
/// assert_eq!(names.resolve(Locale::He), "Sportek");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalizedNames {
    /// English name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub en: Option<String>,
    /// Hebrew name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub he: Option<String>,
}

impl LocalizedNames {
    /// Names with both languages present.
    pub fn new(en: impl Into<String>, he: impl Into<String>) -> Self {
        Self {
            en: Some(en.into()),
            he: Some(he.into()),
        }
    }

    /// Names with only an English entry.
    pub fn english(en: impl Into<String>) -> Self {
        Self {
            en: Some(en.into()),
            he: None,
        }
    }

    /// Return the name for `locale`, if recorded and non-empty.
    #[must_use]
    pub fn get(&self, locale: Locale) -> Option<&str> {
        let name = match locale {
            Locale::En => self.en.as_deref(),
            Locale::He => self.he.as_deref(),
        };
        name.filter(|value| !value.trim().is_empty())
    }

    /// Return the name for `locale`, falling back to the other language and
    /// finally to an empty string.
    #[must_use]
    pub fn resolve(&self, locale: Locale) -> &str {
        let fallback = match locale {
            Locale::En => Locale::He,
            Locale::He => Locale::En,
        };
        self.get(locale).or_else(|| self.get(fallback)).unwrap_or("")
    }
}

/// A skatepark listed in the directory.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use skatepark_core::{Amenity, Area, LocalizedNames, Park};
///
/// let park = Park::new("sportek", LocalizedNames::english("Sportek"), Area::Center)
///     .with_amenity(Amenity::Lighting, true)
///     .with_location(Coord { x: 34.80, y: 32.10 });
///
/// assert!(park.amenities.has(Amenity::Lighting));
/// assert_eq!(park.rating.count, 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Park {
    /// Unique identifier.
    pub id: ParkId,
    /// Display names.
    #[cfg_attr(feature = "serde", serde(default))]
    pub names: LocalizedNames,
    /// Region tag.
    pub area: Area,
    /// Amenity presence flags.
    #[cfg_attr(feature = "serde", serde(default))]
    pub amenities: Amenities,
    /// Geospatial position, when known.
    ///
    /// Malformed coordinates decode as `None`.
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "lenient::location"
        )
    )]
    pub location: Option<Coord<f64>>,
    /// Overall rating aggregate.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rating: RatingAggregate,
    /// Difficulty aggregate, when anyone has voted on it.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub difficulty: Option<RatingAggregate>,
}

impl Park {
    /// Construct a park with no amenities, location or votes.
    pub fn new(id: impl Into<ParkId>, names: LocalizedNames, area: Area) -> Self {
        Self {
            id: id.into(),
            names,
            area,
            amenities: Amenities::new(),
            location: None,
            rating: RatingAggregate::EMPTY,
            difficulty: None,
        }
    }

    /// Set an amenity flag while returning `self` for chaining.
    #[must_use]
    pub fn with_amenity(mut self, amenity: Amenity, present: bool) -> Self {
        self.amenities.set(amenity, present);
        self
    }

    /// Set the location while returning `self` for chaining.
    #[must_use]
    pub const fn with_location(mut self, location: Coord<f64>) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the rating aggregate while returning `self` for chaining.
    #[must_use]
    pub const fn with_rating(mut self, rating: RatingAggregate) -> Self {
        self.rating = rating;
        self
    }

    /// Set the difficulty aggregate while returning `self` for chaining.
    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: RatingAggregate) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Return the location only when both coordinates are finite.
    #[must_use]
    pub fn known_location(&self) -> Option<Coord<f64>> {
        self.location
            .filter(|coord| coord.x.is_finite() && coord.y.is_finite())
    }

    /// Return the aggregate a vote for `target` folds into.
    ///
    /// A park nobody has rated for difficulty yet starts from
    /// [`RatingAggregate::EMPTY`].
    #[must_use]
    pub fn aggregate(&self, target: RatingTarget) -> RatingAggregate {
        match target {
            RatingTarget::Rating => self.rating,
            RatingTarget::Difficulty => self.difficulty.unwrap_or(RatingAggregate::EMPTY),
        }
    }

    /// Replace the aggregate for `target`.
    pub const fn set_aggregate(&mut self, target: RatingTarget, aggregate: RatingAggregate) {
        match target {
            RatingTarget::Rating => self.rating = aggregate,
            RatingTarget::Difficulty => self.difficulty = Some(aggregate),
        }
    }

    /// Return the difficulty average, treating a missing pool as `0.0`.
    #[must_use]
    pub fn difficulty_average(&self) -> f64 {
        self.difficulty
            .map_or(0.0, RatingAggregate::sanitised_average)
    }
}

/// Forgiving decoders for optional park fields.
#[cfg(feature = "serde")]
mod lenient {
    use std::collections::BTreeMap;

    use geo::Coord;
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum Flags {
        Map(BTreeMap<String, Flag>),
        Malformed(IgnoredAny),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum Flag {
        Present(bool),
        Malformed(IgnoredAny),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawLocation {
        Point { x: f64, y: f64 },
        Null,
        Malformed(IgnoredAny),
    }

    pub(super) fn location<'de, D>(deserializer: D) -> Result<Option<Coord<f64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawLocation::deserialize(deserializer)? {
            RawLocation::Point { x, y } => Some(Coord { x, y }),
            RawLocation::Null => None,
            RawLocation::Malformed(IgnoredAny) => {
                log::warn!("Ignoring malformed park location");
                None
            }
        })
    }
}
