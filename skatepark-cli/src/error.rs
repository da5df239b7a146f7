//! Error types emitted by the skatepark CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use skatepark_core::{StoreError, SubmissionError, SubmitVoteError};
use thiserror::Error;

/// Errors emitted by the skatepark CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// An option was supplied but could not be interpreted.
    #[error("invalid --{field} value: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
    /// The catalogue path does not exist or is not a file.
    #[error("catalogue path {path:?} does not exist or is not a file")]
    MissingCatalogue { path: Utf8PathBuf },
    /// The catalogue path could not be inspected due to an IO error.
    #[error("failed to inspect catalogue path {path:?}: {source}")]
    InspectCatalogue {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Reading the catalogue failed.
    #[error("failed to read catalogue at {path:?}: {source}")]
    ReadCatalogue {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Catalogue JSON could not be decoded.
    #[error("failed to parse catalogue JSON at {path:?}: {source}")]
    ParseCatalogue {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The catalogue decoded but its parks are inconsistent.
    #[error("catalogue at {path:?} is invalid: {source}")]
    InvalidCatalogue {
        path: Utf8PathBuf,
        #[source]
        source: StoreError,
    },
    /// The catalogue lock could not be taken.
    #[error("failed to lock catalogue at {path:?}: {source}")]
    LockCatalogue {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Rewriting the catalogue failed.
    #[error("failed to write catalogue to {path:?}: {source}")]
    WriteCatalogue {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The vote fields failed validation.
    #[error("invalid vote: {0}")]
    InvalidVote(#[from] SubmissionError),
    /// The vote could not be applied to the stored aggregate.
    #[error(transparent)]
    SubmitVote(#[from] SubmitVoteError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
