//! Vote command implementation for the skatepark CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use skatepark_core::{RatingTarget, RawVoteSubmission, VoteSubmission, submit_vote};

use crate::catalogue::{load_store, lock_catalogue, require_catalogue, save_catalogue};
use crate::{
    ARG_CATALOGUE, ARG_VOTE_PARK, ARG_VOTE_PREVIOUS_RATING, ARG_VOTE_RATING, ARG_VOTE_TARGET,
    CliError, ENV_VOTE_CATALOGUE, ENV_VOTE_PARK, ENV_VOTE_RATING, write_json,
};

/// CLI arguments for the `vote` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Fold one vote into a park's rating or difficulty pool and \
                 rewrite the catalogue. Pass --previous-rating when the \
                 voter is changing an earlier vote so the count stays put. \
                 Concurrent votes on one catalogue wait for each other \
                 through a .<name>.lock file beside it.",
    about = "Record a vote for one park"
)]
#[ortho_config(prefix = "SKATEPARK")]
pub(crate) struct VoteArgs {
    /// Path to the JSON park catalogue.
    #[arg(long = ARG_CATALOGUE, value_name = "path")]
    #[serde(default)]
    pub(crate) catalogue: Option<Utf8PathBuf>,
    /// Identifier of the park being rated.
    #[arg(long = ARG_VOTE_PARK, value_name = "id")]
    #[serde(default)]
    pub(crate) park: Option<String>,
    /// The vote, a whole number from 1 to 5.
    #[arg(long = ARG_VOTE_RATING, value_name = "n")]
    #[serde(default)]
    pub(crate) rating: Option<String>,
    /// The voter's earlier vote for this park, if any.
    #[arg(long = ARG_VOTE_PREVIOUS_RATING, value_name = "n")]
    #[serde(default)]
    pub(crate) previous_rating: Option<String>,
    /// Pool receiving the vote: rating or difficulty.
    #[arg(long = ARG_VOTE_TARGET, value_name = "target")]
    #[serde(default)]
    pub(crate) target: Option<String>,
}

impl VoteArgs {
    pub(crate) fn into_config(self) -> Result<VoteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        VoteConfig::try_from(merged)
    }
}

/// Resolved `vote` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VoteConfig {
    /// Path to the JSON catalogue.
    pub(crate) catalogue: Utf8PathBuf,
    /// The validated vote.
    pub(crate) submission: VoteSubmission,
}

impl TryFrom<VoteArgs> for VoteConfig {
    type Error = CliError;

    fn try_from(args: VoteArgs) -> Result<Self, Self::Error> {
        let catalogue = args.catalogue.ok_or(CliError::MissingArgument {
            field: ARG_CATALOGUE,
            env: ENV_VOTE_CATALOGUE,
        })?;
        let park = args.park.ok_or(CliError::MissingArgument {
            field: ARG_VOTE_PARK,
            env: ENV_VOTE_PARK,
        })?;
        let rating = args.rating.ok_or(CliError::MissingArgument {
            field: ARG_VOTE_RATING,
            env: ENV_VOTE_RATING,
        })?;
        let submission = VoteSubmission::parse(&RawVoteSubmission {
            skatepark_id: &park,
            rating: &rating,
            previous_rating: args.previous_rating.as_deref(),
            target: args.target.as_deref(),
        })?;
        Ok(Self {
            catalogue,
            submission,
        })
    }
}

/// `vote` output: the aggregate now stored for the park.
#[derive(Debug, Serialize)]
struct VoteOutcome<'a> {
    park: &'a str,
    target: RatingTarget,
    average: f64,
    count: u32,
}

pub(super) fn run_vote(args: VoteArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_vote_with(args, &mut stdout)
}

pub(super) fn run_vote_with(args: VoteArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_vote_config(args)?;
    let _lock = lock_catalogue(&config.catalogue)?;
    let mut store = load_store(&config.catalogue)?;
    let aggregate = submit_vote(&mut store, &config.submission)?;
    save_catalogue(&config.catalogue, store.into_parks())?;
    log::info!(
        "Saved {} vote for '{}' to {}",
        config.submission.target,
        config.submission.park_id,
        config.catalogue
    );
    write_json(
        writer,
        &VoteOutcome {
            park: config.submission.park_id.as_str(),
            target: config.submission.target,
            average: aggregate.average,
            count: aggregate.count,
        },
    )
}

fn resolve_vote_config(args: VoteArgs) -> Result<VoteConfig, CliError> {
    let config = args.into_config()?;
    require_catalogue(&config.catalogue)?;
    Ok(config)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<VoteConfig, CliError> {
    let merged = VoteArgs::merge_from_layers(layers).map_err(CliError::from)?;
    VoteConfig::try_from(merged)
}
