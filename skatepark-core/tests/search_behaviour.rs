//! Behaviour tests for filtering and ordering the park directory.

use std::cell::RefCell;
use std::str::FromStr;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use skatepark_core::search::{SearchCriteria, SortMode, rank_parks};
use skatepark_core::{
    Amenity, Area, Locale, LocalizedNames, Park, RatingAggregate,
};

const USER: Coord<f64> = Coord { x: 34.78, y: 32.08 };

#[derive(Debug, Default)]
struct SearchWorld {
    parks: RefCell<Vec<Park>>,
    criteria: RefCell<SearchCriteria>,
    locale: RefCell<Locale>,
}

#[fixture]
fn world() -> SearchWorld {
    SearchWorld::default()
}

fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches('"')
}

fn named(id: &str, name: &str, average: f64) -> Park {
    Park::new(id, LocalizedNames::english(name), Area::Center)
        .with_rating(RatingAggregate::new(average, 3))
}

#[given("a directory of parks named after the centre")]
fn given_central_parks(world: &SearchWorld) {
    world.parks.replace(vec![
        named("center-park", "Center Park", 5.0),
        named("central-extra", "Central Park Extra", 2.0),
        named("old-central", "Old Central", 4.0),
        named("central", "Central", 1.0),
    ]);
}

#[given("a directory of parks with mixed amenities")]
fn given_amenity_parks(world: &SearchWorld) {
    world.parks.replace(vec![
        named("lit-only", "Lit Only", 3.0).with_amenity(Amenity::Lighting, true),
        named("no-water", "No Water", 3.0)
            .with_amenity(Amenity::Lighting, true)
            .with_amenity(Amenity::Shade, true)
            .with_amenity(Amenity::Water, false),
        named("all-three", "All Three", 3.0)
            .with_amenity(Amenity::Lighting, true)
            .with_amenity(Amenity::Shade, true)
            .with_amenity(Amenity::Water, true),
    ]);
}

#[given("three parks at different distances from the user")]
fn given_spread_parks(world: &SearchWorld) {
    world.parks.replace(vec![
        named("far", "Far", 3.0).with_location(Coord { x: 35.0, y: 32.8 }),
        named("near", "Near", 3.0).with_location(Coord { x: 34.78, y: 32.09 }),
        named("middle", "Middle", 3.0).with_location(Coord { x: 34.8, y: 32.3 }),
    ]);
}

#[given("a directory of parks named in two languages")]
fn given_bilingual_parks(world: &SearchWorld) {
    world.parks.replace(vec![
        Park::new(
            "haifa",
            LocalizedNames::new("Haifa Bay", "מפרץ חיפה פארק"),
            Area::North,
        ),
        Park::new(
            "sportek",
            LocalizedNames::new("Sportek Park", "ספורטק"),
            Area::Center,
        ),
        Park::new(
            "yarkon",
            LocalizedNames::new("Yarkon", "פארק הירקון"),
            Area::Center,
        ),
    ]);
}

#[when("I search for {query}")]
fn when_search(world: &SearchWorld, query: String) {
    world.criteria.borrow_mut().query = unquote(&query).to_owned();
}

#[when("I sort by {mode}")]
fn when_sort(world: &SearchWorld, mode: String) {
    let sort = SortMode::from_str(unquote(&mode)).expect("known sort mode");
    world.criteria.borrow_mut().sort = sort;
}

#[when("I require {amenity}")]
fn when_require(world: &SearchWorld, amenity: String) {
    let amenity = Amenity::from_str(unquote(&amenity)).expect("known amenity");
    world.criteria.borrow_mut().required_amenities.insert(amenity);
}

#[when("I share my location")]
fn when_share_location(world: &SearchWorld) {
    world.criteria.borrow_mut().user_location = Some(USER);
}

#[when("I browse in {locale}")]
fn when_locale(world: &SearchWorld, locale: String) {
    let locale = Locale::from_str(unquote(&locale)).expect("known locale");
    world.locale.replace(locale);
}

#[then("the parks are listed as {ids}")]
fn then_listed(world: &SearchWorld, ids: String) {
    let parks = world.parks.borrow();
    let criteria = world.criteria.borrow();
    let locale = *world.locale.borrow();
    let actual: Vec<&str> = rank_parks(&parks, &criteria, &locale)
        .into_iter()
        .map(|park| park.id.as_str())
        .collect();
    let expected: Vec<&str> = unquote(&ids).split(", ").collect();
    assert_eq!(actual, expected);
}

#[scenario(path = "tests/features/search.feature", index = 0)]
fn relevance_ordering(world: SearchWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/search.feature", index = 1)]
fn query_overrides_sort(world: SearchWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/search.feature", index = 2)]
fn rating_sort(world: SearchWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/search.feature", index = 3)]
fn conjunctive_amenities(world: SearchWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/search.feature", index = 4)]
fn distance_sort(world: SearchWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/search.feature", index = 5)]
fn distance_sort_without_location(world: SearchWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/search.feature", index = 6)]
fn hebrew_search(world: SearchWorld) {
    let _ = world;
}
