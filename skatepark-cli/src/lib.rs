//! Command-line interface over a JSON skatepark catalogue.
//!
//! `rank` prints the filtered and ordered directory; `vote` folds a vote into
//! a park's rating and rewrites the catalogue.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod catalogue;
mod error;
mod rank;
mod vote;

pub use error::CliError;

use rank::{RankArgs, run_rank};
use vote::{VoteArgs, run_vote};

pub(crate) const ARG_CATALOGUE: &str = "catalogue";
pub(crate) const ARG_RANK_QUERY: &str = "query";
pub(crate) const ARG_RANK_AREA: &str = "area";
pub(crate) const ARG_RANK_AMENITY: &str = "amenity";
pub(crate) const ARG_RANK_SORT: &str = "sort";
pub(crate) const ARG_RANK_LAT: &str = "lat";
pub(crate) const ARG_RANK_LON: &str = "lon";
pub(crate) const ARG_RANK_LOCALE: &str = "locale";
pub(crate) const ARG_VOTE_PARK: &str = "park";
pub(crate) const ARG_VOTE_RATING: &str = "rating";
pub(crate) const ARG_VOTE_PREVIOUS_RATING: &str = "previous-rating";
pub(crate) const ARG_VOTE_TARGET: &str = "target";
pub(crate) const ENV_RANK_CATALOGUE: &str = "SKATEPARK_CMDS_RANK_CATALOGUE";
pub(crate) const ENV_VOTE_CATALOGUE: &str = "SKATEPARK_CMDS_VOTE_CATALOGUE";
pub(crate) const ENV_VOTE_PARK: &str = "SKATEPARK_CMDS_VOTE_PARK";
pub(crate) const ENV_VOTE_RATING: &str = "SKATEPARK_CMDS_VOTE_RATING";

/// Run the CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Rank(args) => run_rank(args),
        Command::Vote(args) => run_vote(args),
    }
}

/// Write `value` as pretty JSON followed by a newline.
fn write_json<T>(writer: &mut dyn Write, value: &T) -> Result<(), CliError>
where
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "skatepark",
    about = "Rank skateparks and record votes in a JSON catalogue",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Filter and order the parks in a catalogue.
    Rank(RankArgs),
    /// Record a rating or difficulty vote for one park.
    Vote(VoteArgs),
}

#[cfg(test)]
mod tests;
