//! Parsing raw vote submissions into typed requests.
//!
//! Form posts carry every field as text. [`VoteSubmission::parse`] applies the
//! directory's tolerance rules: the park id and the new rating must be valid,
//! while a missing or malformed previous rating simply means "first vote".

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::{ParkId, RatingError, Vote};

/// Which aggregate of a park a vote applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum RatingTarget {
    /// The overall park rating.
    #[default]
    Rating,
    /// The difficulty pool.
    Difficulty,
}

impl RatingTarget {
    /// Return the target as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::Difficulty => "difficulty",
        }
    }
}

impl fmt::Display for RatingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RatingTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "rating" => Ok(Self::Rating),
            "difficulty" => Ok(Self::Difficulty),
            _ => Err(format!("unknown rating target '{s}'")),
        }
    }
}

/// Errors raised while parsing a raw submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The park identifier was empty.
    #[error("submission must name a skatepark")]
    MissingParkId,
    /// The rating field was not an integer.
    #[error("rating '{raw}' is not a whole number")]
    UnparseableVote {
        /// Text received in the rating field.
        raw: String,
    },
    /// The rating was an integer outside the accepted range.
    #[error(transparent)]
    InvalidVote(#[from] RatingError),
    /// The target field named an unknown aggregate.
    #[error("{0}")]
    UnknownTarget(String),
}

/// Text fields of a vote as they arrive from a form post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawVoteSubmission<'a> {
    /// `skateparkId` field.
    pub skatepark_id: &'a str,
    /// `rating` field.
    pub rating: &'a str,
    /// `previousRating` field; empty when the voter has not voted before.
    pub previous_rating: Option<&'a str>,
    /// Optional target field; empty means the overall rating.
    pub target: Option<&'a str>,
}

/// A validated vote ready to be folded into a park's aggregate.
///
/// # Examples
/// ```
/// use skatepark_core::{RatingTarget, RawVoteSubmission, VoteSubmission};
///
/// # fn main() -> Result<(), skatepark_core::SubmissionError> {
/// let submission = VoteSubmission::parse(&RawVoteSubmission {
///     skatepark_id: "sportek",
///     rating: "4",
///     previous_rating: Some("not-a-number"),
///     target: None,
/// })?;
/// assert_eq!(submission.new_value.get(), 4);
/// assert!(submission.previous_value.is_none());
/// assert_eq!(submission.target, RatingTarget::Rating);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteSubmission {
    /// Park receiving the vote.
    pub park_id: ParkId,
    /// Aggregate the vote applies to.
    pub target: RatingTarget,
    /// The vote being cast.
    pub new_value: Vote,
    /// The voter's earlier vote for the same park and target, if any.
    pub previous_value: Option<Vote>,
}

impl VoteSubmission {
    /// Build a submission from already validated parts.
    pub fn new(
        park_id: impl Into<ParkId>,
        target: RatingTarget,
        new_value: Vote,
        previous_value: Option<Vote>,
    ) -> Self {
        Self {
            park_id: park_id.into(),
            target,
            new_value,
            previous_value,
        }
    }

    /// Parse the text fields of a form post.
    ///
    /// # Errors
    /// Returns [`SubmissionError`] when the park id is empty, the rating is not
    /// an integer in `1..=5`, or the target is unknown. A malformed previous
    /// rating is not an error; it is dropped.
    pub fn parse(raw: &RawVoteSubmission<'_>) -> Result<Self, SubmissionError> {
        let park_id = raw.skatepark_id.trim();
        if park_id.is_empty() {
            return Err(SubmissionError::MissingParkId);
        }
        let target = RatingTarget::from_str(raw.target.unwrap_or_default())
            .map_err(SubmissionError::UnknownTarget)?;
        let new_value = parse_vote(raw.rating)?;
        let previous_value = raw.previous_rating.and_then(parse_previous_vote);
        Ok(Self::new(park_id, target, new_value, previous_value))
    }
}

fn parse_vote(raw: &str) -> Result<Vote, SubmissionError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| SubmissionError::UnparseableVote {
            raw: raw.to_owned(),
        })?;
    Ok(Vote::new(value)?)
}

fn parse_previous_vote(raw: &str) -> Option<Vote> {
    if raw.trim().is_empty() {
        return None;
    }
    match parse_vote(raw) {
        Ok(vote) => Some(vote),
        Err(err) => {
            log::debug!("Dropping previous rating '{raw}': {err}");
            None
        }
    }
}
