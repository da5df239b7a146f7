//! Behaviour-driven step definitions driving the rank and vote CLI scenarios.

use super::helpers::{CatalogueFixture, listed_ids};
use super::*;
use crate::rank::run_rank_with;
use crate::vote::run_vote_with;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use skatepark_core::{SubmissionError, SubmitVoteError};
use std::cell::RefCell;

const TOLERANCE: f64 = 1e-9;

#[derive(Debug)]
struct CommandWorld {
    catalogue: RefCell<CatalogueFixture>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl CommandWorld {
    fn new() -> Self {
        Self {
            catalogue: RefCell::new(CatalogueFixture::empty()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn run(&self, subcommand: &str, extra: &str) {
        let mut argv = vec![
            "skatepark".to_owned(),
            subcommand.to_owned(),
            format!("--{ARG_CATALOGUE}"),
            self.catalogue.borrow().path().as_str().to_owned(),
        ];
        argv.extend(unquote(extra).split_whitespace().map(str::to_owned));

        let parsed = Cli::try_parse_from(argv).map_err(CliError::from);
        let mut buffer = self.stdout.borrow_mut();
        let outcome = parsed.and_then(|cli| match cli.command {
            Command::Rank(args) => run_rank_with(args, &mut *buffer),
            Command::Vote(args) => run_vote_with(args, &mut *buffer),
        });
        self.result.replace(Some(outcome));
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }

    fn assert_succeeded(&self) {
        let borrowed = self.result.borrow();
        if let Some(Err(err)) = borrowed.as_ref() {
            panic!("expected success, found {err:?}");
        }
        assert!(borrowed.is_some(), "result recorded");
    }
}

fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches('"')
}

#[fixture]
fn world() -> CommandWorld {
    CommandWorld::new()
}

#[given("a catalogue of sample parks")]
fn sample_catalogue(#[from(world)] world: &CommandWorld) {
    world.catalogue.replace(CatalogueFixture::sample());
}

#[given("no catalogue exists")]
fn no_catalogue(#[from(world)] world: &CommandWorld) {
    world.catalogue.replace(CatalogueFixture::empty());
}

#[when("I run the rank command with {args}")]
fn run_rank_command(#[from(world)] world: &CommandWorld, args: String) {
    world.run("rank", &args);
}

#[when("I run the vote command with {args}")]
fn run_vote_command(#[from(world)] world: &CommandWorld, args: String) {
    world.run("vote", &args);
}

#[then("the listed parks are {ids}")]
fn listed_parks(#[from(world)] world: &CommandWorld, ids: String) {
    world.assert_succeeded();
    let expected: Vec<&str> = unquote(&ids).split(", ").collect();
    assert_eq!(listed_ids(&world.stdout.borrow()), expected);
}

#[then("the command prints an average of {average:f64} from {count:u32} votes")]
fn prints_average(#[from(world)] world: &CommandWorld, average: f64, count: u32) {
    world.assert_succeeded();
    let outcome: serde_json::Value =
        serde_json::from_slice(&world.stdout.borrow()).expect("vote output JSON");
    let printed = outcome["average"].as_f64().expect("average");
    assert!((printed - average).abs() <= TOLERANCE, "printed {printed}");
    assert_eq!(outcome["count"], count);
}

#[then("the catalogue stores an average of {average:f64} from {count:u32} votes for {park}")]
fn stores_average(#[from(world)] world: &CommandWorld, average: f64, count: u32, park: String) {
    let stored = world.catalogue.borrow().stored_park(unquote(&park));
    assert!(
        (stored.rating.average - average).abs() <= TOLERANCE,
        "stored {}",
        stored.rating.average
    );
    assert_eq!(stored.rating.count, count);
}

#[then("the command fails because the catalogue is missing")]
fn fails_missing_catalogue(#[from(world)] world: &CommandWorld) {
    match &*world.error() {
        CliError::MissingCatalogue { .. } => {}
        other => panic!("expected MissingCatalogue, found {other:?}"),
    }
}

#[then("the command fails because the vote is invalid")]
fn fails_invalid_vote(#[from(world)] world: &CommandWorld) {
    match &*world.error() {
        CliError::InvalidVote(SubmissionError::InvalidVote(_)) => {}
        other => panic!("expected an invalid vote, found {other:?}"),
    }
}

#[then("the command fails because the park is unknown")]
fn fails_unknown_park(#[from(world)] world: &CommandWorld) {
    match &*world.error() {
        CliError::SubmitVote(SubmitVoteError::UnknownPark { .. }) => {}
        other => panic!("expected UnknownPark, found {other:?}"),
    }
}

macro_rules! register_rank_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/rank_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CommandWorld) {
            let _ = world;
        }
    };
}

macro_rules! register_vote_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/vote_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CommandWorld) {
            let _ = world;
        }
    };
}

register_rank_scenario!(rank_by_rating, "ranking by rating");
register_rank_scenario!(rank_hebrew_search, "searching in Hebrew");
register_rank_scenario!(rank_area_and_amenity, "filtering by area and amenity");
register_rank_scenario!(rank_by_distance, "sorting by distance from a southern user");
register_rank_scenario!(rank_missing_catalogue, "rejecting a missing catalogue");
register_vote_scenario!(vote_first, "recording a first vote");
register_vote_scenario!(vote_changed, "changing an earlier vote");
register_vote_scenario!(vote_out_of_range, "rejecting an out-of-range vote");
register_vote_scenario!(vote_unknown_park, "rejecting an unknown park");
