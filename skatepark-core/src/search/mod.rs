//! Filtering and ordering the park directory.
//!
//! [`rank_parks`] runs a fixed pipeline over a park slice:
//!
//! 1. keep parks in the requested area;
//! 2. keep parks offering every required amenity;
//! 3. when the query is non-blank, keep parks whose localized name contains it
//!    and order them by relevance (the sort mode is ignored);
//! 4. otherwise order by the requested [`SortMode`].
//!
//! Every sort is stable and the input slice is never reordered.

mod order;
mod relevance;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use geo::Coord;

use crate::{Amenity, Area, Locale, Park};

pub use order::{compare_by_difficulty, compare_by_distance, compare_by_rating, park_distance_km};
pub use relevance::{
    EXACT_MATCH_SCORE, PREFIX_MATCH_SCORE, SUBSTRING_MATCH_BASE, SearchHit,
    compare_by_relevance, compare_localized_names, relevance_score,
};

/// Resolve the display name a park is searched and sorted by.
///
/// Implemented for [`Locale`] and for any `Fn(&Park) -> String`.
///
/// # Examples
/// ```
/// use skatepark_core::{Area, Locale, LocalizedNames, Park};
/// use skatepark_core::search::NameResolver;
///
/// let park = Park::new("p", LocalizedNames::new("Sportek", "ספורטק"), Area::Center);
/// assert_eq!(Locale::He.resolve_name(&park), "ספורטק");
///
/// let by_id = |park: &Park| park.id.to_string();
/// assert_eq!(by_id.resolve_name(&park), "p");
/// ```
pub trait NameResolver {
    /// Return the name of `park` to match the query against.
    fn resolve_name(&self, park: &Park) -> String;
}

impl NameResolver for Locale {
    fn resolve_name(&self, park: &Park) -> String {
        park.names.resolve(*self).to_owned()
    }
}

impl<F> NameResolver for F
where
    F: Fn(&Park) -> String,
{
    fn resolve_name(&self, park: &Park) -> String {
        self(park)
    }
}

/// Area restriction applied before ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AreaFilter {
    /// Keep parks from every area.
    #[default]
    All,
    /// Keep parks from one area.
    Only(Area),
}

impl AreaFilter {
    /// Report whether a park in `area` passes the filter.
    #[must_use]
    pub fn matches(self, area: Area) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == area,
        }
    }
}

impl fmt::Display for AreaFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(area) => fmt::Display::fmt(area, f),
        }
    }
}

impl FromStr for AreaFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        Area::from_str(s).map(Self::Only)
    }
}

/// Ordering applied when no query is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    /// Keep the filtered order.
    #[default]
    None,
    /// Highest rated first; more votes win ties.
    Rating,
    /// Nearest first; needs a user location.
    Distance,
    /// Easiest first.
    Difficulty,
}

impl SortMode {
    /// Return the mode as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Rating => "rating",
            Self::Distance => "distance",
            Self::Difficulty => "difficulty",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "rating" => Ok(Self::Rating),
            "distance" => Ok(Self::Distance),
            "difficulty" => Ok(Self::Difficulty),
            _ => Err(format!("unknown sort mode '{s}'")),
        }
    }
}

/// User-selected filters, query and ordering.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use skatepark_core::{Amenity, Area};
/// use skatepark_core::search::{AreaFilter, SearchCriteria, SortMode};
///
/// let criteria = SearchCriteria::new()
///     .in_area(AreaFilter::Only(Area::North))
///     .requiring(Amenity::Lighting)
///     .sorted_by(SortMode::Distance)
///     .near(Coord { x: 35.0, y: 32.8 });
/// assert_eq!(criteria.effective_sort(), SortMode::Distance);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    /// Free-text query; blank means "no search".
    pub query: String,
    /// Area restriction.
    pub area: AreaFilter,
    /// Amenities a park must all offer.
    pub required_amenities: BTreeSet<Amenity>,
    /// Ordering used when the query is blank.
    pub sort: SortMode,
    /// The user's position, needed for [`SortMode::Distance`].
    pub user_location: Option<Coord<f64>>,
}

impl SearchCriteria {
    /// Criteria that keep every park in its original order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the query while returning `self` for chaining.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Set the area filter while returning `self` for chaining.
    #[must_use]
    pub const fn in_area(mut self, area: AreaFilter) -> Self {
        self.area = area;
        self
    }

    /// Require an amenity while returning `self` for chaining.
    #[must_use]
    pub fn requiring(mut self, amenity: Amenity) -> Self {
        self.required_amenities.insert(amenity);
        self
    }

    /// Set the sort mode while returning `self` for chaining.
    #[must_use]
    pub const fn sorted_by(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Set the user location while returning `self` for chaining.
    #[must_use]
    pub const fn near(mut self, location: Coord<f64>) -> Self {
        self.user_location = Some(location);
        self
    }

    /// Return the sort mode that will actually run.
    ///
    /// Distance sorting without a finite user location degrades to
    /// [`SortMode::None`].
    #[must_use]
    pub fn effective_sort(&self) -> SortMode {
        match self.sort {
            SortMode::Distance if self.usable_location().is_none() => SortMode::None,
            mode => mode,
        }
    }

    fn usable_location(&self) -> Option<Coord<f64>> {
        self.user_location
            .filter(|coord| coord.x.is_finite() && coord.y.is_finite())
    }

    fn admits(&self, park: &Park) -> bool {
        self.area.matches(park.area)
            && self
                .required_amenities
                .iter()
                .all(|amenity| park.amenities.has(*amenity))
    }
}

/// Filter and order `parks` according to `criteria`.
///
/// `names` resolves the localized name used for query matching and for
/// breaking relevance ties.
///
/// # Examples
/// ```
/// use skatepark_core::{Area, Locale, LocalizedNames, Park, RatingAggregate};
/// use skatepark_core::search::{SearchCriteria, SortMode, rank_parks};
///
/// let parks = vec![
///     Park::new("a", LocalizedNames::english("Bowl Town"), Area::North)
///         .with_rating(RatingAggregate::new(3.0, 4)),
///     Park::new("b", LocalizedNames::english("Ramp City"), Area::South)
///         .with_rating(RatingAggregate::new(4.5, 8)),
/// ];
///
/// let by_rating = rank_parks(&parks, &SearchCriteria::new().sorted_by(SortMode::Rating), &Locale::En);
/// assert_eq!(by_rating[0].id.as_str(), "b");
///
/// let searched = rank_parks(&parks, &SearchCriteria::new().with_query("bowl"), &Locale::En);
/// assert_eq!(searched.len(), 1);
/// ```
#[must_use]
pub fn rank_parks<'a, R>(parks: &'a [Park], criteria: &SearchCriteria, names: &R) -> Vec<&'a Park>
where
    R: NameResolver + ?Sized,
{
    let candidates: Vec<&Park> = parks.iter().filter(|park| criteria.admits(park)).collect();
    log::debug!(
        "{} of {} parks pass the area and amenity filters",
        candidates.len(),
        parks.len()
    );

    if criteria.query.trim().is_empty() {
        return sort_candidates(candidates, criteria);
    }
    search_hits(candidates, &criteria.query, names)
        .into_iter()
        .map(|hit| hit.park)
        .collect()
}

/// Match `candidates` against `query` and order the hits by relevance.
///
/// Parks whose localized name does not contain the query are dropped.
#[must_use]
pub fn search_hits<'a, R>(candidates: Vec<&'a Park>, query: &str, names: &R) -> Vec<SearchHit<'a>>
where
    R: NameResolver + ?Sized,
{
    let mut hits: Vec<SearchHit<'a>> = candidates
        .into_iter()
        .filter_map(|park| {
            let name = names.resolve_name(park);
            relevance_score(&name, query).map(|score| SearchHit { park, name, score })
        })
        .collect();
    hits.sort_by(compare_by_relevance);
    hits
}

fn sort_candidates<'a>(mut candidates: Vec<&'a Park>, criteria: &SearchCriteria) -> Vec<&'a Park> {
    match criteria.effective_sort() {
        SortMode::None => {}
        SortMode::Rating => candidates.sort_by(|a, b| compare_by_rating(a, b)),
        SortMode::Difficulty => candidates.sort_by(|a, b| compare_by_difficulty(a, b)),
        SortMode::Distance => {
            if let Some(origin) = criteria.usable_location() {
                return sort_by_distance(candidates, origin);
            }
        }
    }
    candidates
}

fn sort_by_distance(candidates: Vec<&Park>, origin: Coord<f64>) -> Vec<&Park> {
    let mut measured: Vec<(f64, &Park)> = candidates
        .into_iter()
        .map(|park| (park_distance_km(park, origin), park))
        .collect();
    measured.sort_by(|(a_km, _), (b_km, _)| compare_by_distance(*a_km, *b_km));
    measured.into_iter().map(|(_, park)| park).collect()
}
