//! Running-mean rating aggregation.
//!
//! A park's rating is stored as a `{ average, count }` pair rather than as the
//! individual votes. [`apply_vote`] folds one vote into that pair, either as a
//! first-time vote (the count grows) or as a change of an earlier vote by the
//! same voter (the count stays put and the old value is swapped out of the
//! total).
//!
//! # Examples
//! ```
//! use skatepark_core::{RatingAggregate, apply_vote};
//!
//! # fn main() -> Result<(), skatepark_core::RatingError> {
//! let first = apply_vote(RatingAggregate::new(4.0, 10), 5, None)?;
//! assert_eq!(first, RatingAggregate::new(4.09, 11));
//!
//! let changed = apply_vote(first, 2, Some(5))?;
//! assert_eq!(changed, RatingAggregate::new(3.82, 11));
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Lowest accepted vote.
pub const MIN_VOTE: u8 = 1;
/// Highest accepted vote.
pub const MAX_VOTE: u8 = 5;

/// Errors returned while folding a vote into an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RatingError {
    /// The submitted vote is not an integer in `1..=5`.
    #[error("vote {value} is outside the accepted range {MIN_VOTE}..={MAX_VOTE}")]
    InvalidVoteValue {
        /// Rejected value.
        value: i64,
    },
    /// The computed average was not a finite number.
    #[error("rating calculation produced a non-finite average")]
    RatingCalculationFailed,
    /// The vote count cannot grow any further.
    #[error("vote count cannot exceed {}", u32::MAX)]
    VoteCountOverflow,
}

/// A single validated vote in `1..=5`.
///
/// # Examples
/// ```
/// use skatepark_core::Vote;
///
/// assert_eq!(Vote::new(4).map(Vote::get), Ok(4));
/// assert!(Vote::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vote(u8);

impl Vote {
    /// Validate `value` as a vote.
    ///
    /// # Errors
    /// Returns [`RatingError::InvalidVoteValue`] when `value` is outside
    /// `1..=5`.
    pub fn new(value: i64) -> Result<Self, RatingError> {
        u8::try_from(value)
            .ok()
            .filter(|vote| (MIN_VOTE..=MAX_VOTE).contains(vote))
            .map(Self)
            .ok_or(RatingError::InvalidVoteValue { value })
    }

    /// Return the vote value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl TryFrom<i64> for Vote {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Vote> for u8 {
    fn from(vote: Vote) -> Self {
        vote.0
    }
}

/// Mean of all votes for a park together with the number of votes.
///
/// When `count` is zero the average is `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatingAggregate {
    /// Arithmetic mean of the votes, rounded to two decimals.
    pub average: f64,
    /// Number of votes contributing to `average`.
    pub count: u32,
}

impl RatingAggregate {
    /// Aggregate of a park nobody has voted for yet.
    pub const EMPTY: Self = Self {
        average: 0.0,
        count: 0,
    };

    /// Construct an aggregate from stored values.
    #[must_use]
    pub const fn new(average: f64, count: u32) -> Self {
        Self { average, count }
    }

    /// Return the average, reading non-finite values as `0.0`.
    #[must_use]
    pub const fn sanitised_average(self) -> f64 {
        if self.average.is_finite() {
            self.average
        } else {
            0.0
        }
    }

    /// Fold an already validated vote into the aggregate.
    ///
    /// `previous` is the value this voter submitted earlier, if any. It only
    /// replaces an existing vote when the aggregate holds at least one vote;
    /// otherwise the vote counts as new.
    ///
    /// # Errors
    /// Returns [`RatingError::RatingCalculationFailed`] when the result is
    /// not finite and [`RatingError::VoteCountOverflow`] when a new vote
    /// would overflow the count.
    pub fn apply(self, vote: Vote, previous: Option<Vote>) -> Result<Self, RatingError> {
        let current_average = self.healed_average();
        let (average, count) = match previous {
            Some(earlier) if self.count > 0 => (
                replace_vote(current_average, self.count, earlier, vote),
                self.count,
            ),
            _ => {
                let count = self
                    .count
                    .checked_add(1)
                    .ok_or(RatingError::VoteCountOverflow)?;
                (add_vote(current_average, self.count, vote), count)
            }
        };
        if !average.is_finite() {
            return Err(RatingError::RatingCalculationFailed);
        }
        Ok(Self {
            average: round_to_cents(average.clamp(0.0, f64::from(MAX_VOTE))),
            count,
        })
    }

    fn healed_average(self) -> f64 {
        if !self.average.is_finite() {
            log::warn!(
                "Non-finite rating average {} with {} votes; treating it as 0",
                self.average,
                self.count
            );
        }
        self.sanitised_average()
    }
}

/// Fold a raw vote into `current`.
///
/// A `previous_value` outside `1..=5` is ignored and the vote counts as new.
///
/// # Errors
/// Returns [`RatingError::InvalidVoteValue`] when `new_value` is outside
/// `1..=5`, plus any error from [`RatingAggregate::apply`].
pub fn apply_vote(
    current: RatingAggregate,
    new_value: i64,
    previous_value: Option<i64>,
) -> Result<RatingAggregate, RatingError> {
    let vote = Vote::new(new_value)?;
    let previous = previous_value.and_then(|raw| {
        Vote::new(raw)
            .inspect_err(|_| {
                log::debug!("Ignoring malformed previous vote {raw}; counting as a new vote");
            })
            .ok()
    });
    current.apply(vote, previous)
}

#[expect(
    clippy::float_arithmetic,
    reason = "running means require floating-point totals"
)]
fn add_vote(average: f64, count: u32, vote: Vote) -> f64 {
    if count == 0 {
        return vote.as_f64();
    }
    let total = average * f64::from(count) + vote.as_f64();
    total / (f64::from(count) + 1.0)
}

#[expect(
    clippy::float_arithmetic,
    reason = "running means require floating-point totals"
)]
fn replace_vote(average: f64, count: u32, previous: Vote, vote: Vote) -> f64 {
    let total = average * f64::from(count) - previous.as_f64() + vote.as_f64();
    total / f64::from(count)
}

#[expect(
    clippy::float_arithmetic,
    reason = "rounding to two decimals scales by 100"
)]
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-1)]
    #[case(i64::MAX)]
    fn rejects_out_of_range_votes(#[case] value: i64) {
        let err = apply_vote(RatingAggregate::EMPTY, value, None).expect_err("invalid vote");
        assert_eq!(err, RatingError::InvalidVoteValue { value });
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(5)]
    fn first_vote_sets_average_exactly(#[case] value: i64) {
        let result = apply_vote(RatingAggregate::EMPTY, value, None).expect("valid vote");
        assert_eq!(result.count, 1);
        assert_close(result.average, f64::from(u8::try_from(value).expect("small")));
    }

    #[rstest]
    fn new_vote_updates_mean_and_count() {
        let result = apply_vote(RatingAggregate::new(4.0, 10), 5, None).expect("valid vote");
        assert_eq!(result.count, 11);
        assert_close(result.average, 4.09);
    }

    #[rstest]
    fn changed_vote_keeps_count() {
        let result = apply_vote(RatingAggregate::new(4.09, 11), 2, Some(5)).expect("valid vote");
        assert_eq!(result.count, 11);
        assert_close(result.average, 3.82);
    }

    #[rstest]
    fn same_vote_again_changes_nothing() {
        let current = RatingAggregate::new(3.5, 4);
        let result = apply_vote(current, 4, Some(4)).expect("valid vote");
        assert_eq!(result, current);
    }

    #[rstest]
    #[case(Some(0))]
    #[case(Some(9))]
    #[case(Some(-3))]
    fn malformed_previous_vote_counts_as_new(#[case] previous: Option<i64>) {
        let result = apply_vote(RatingAggregate::new(2.0, 1), 4, previous).expect("valid vote");
        assert_eq!(result, RatingAggregate::new(3.0, 2));
    }

    #[rstest]
    fn previous_vote_without_votes_counts_as_new() {
        let result = apply_vote(RatingAggregate::EMPTY, 4, Some(2)).expect("valid vote");
        assert_eq!(result, RatingAggregate::new(4.0, 1));
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn non_finite_average_is_healed(#[case] average: f64) {
        let result = apply_vote(RatingAggregate::new(average, 3), 4, None).expect("healed");
        assert_eq!(result.count, 4);
        assert_close(result.average, 1.0);
    }

    #[rstest]
    fn corrupt_totals_are_clamped() {
        let result = apply_vote(RatingAggregate::new(5.0, 2), 1, Some(5)).expect("valid vote");
        assert_close(result.average, 3.0);

        let skewed = apply_vote(RatingAggregate::new(0.5, 1), 1, Some(5)).expect("valid vote");
        assert_close(skewed.average, 0.0);
    }

    #[rstest]
    fn count_overflow_is_reported() {
        let err = apply_vote(RatingAggregate::new(3.0, u32::MAX), 4, None)
            .expect_err("count cannot grow");
        assert_eq!(err, RatingError::VoteCountOverflow);
    }

    #[rstest]
    fn huge_totals_fail_instead_of_propagating() {
        let err = apply_vote(RatingAggregate::new(f64::MAX, 2), 4, Some(3))
            .expect_err("overflowing total");
        assert_eq!(err, RatingError::RatingCalculationFailed);
    }
}
