//! Park storage and the vote submission workflow.
//!
//! [`ParkStore`] is the seam between ranking and rating logic and wherever
//! the directory lives. [`MemoryParkStore`] keeps the whole catalogue in a
//! vector, which suits file-backed catalogues of a few hundred parks.

use std::collections::HashMap;

use thiserror::Error;

use crate::{Park, ParkId, RatingAggregate, RatingError, RatingTarget, VoteSubmission};

/// Errors raised by a [`ParkStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No park carries the identifier.
    #[error("unknown skatepark '{id}'")]
    UnknownPark {
        /// Identifier that was looked up.
        id: ParkId,
    },
    /// Two parks share an identifier.
    #[error("skatepark '{id}' appears more than once")]
    DuplicatePark {
        /// Identifier that was repeated.
        id: ParkId,
    },
}

/// Read and update access to the park directory.
pub trait ParkStore {
    /// Look up a park by identifier.
    fn park(&self, id: &ParkId) -> Option<&Park>;

    /// Every park in directory order.
    fn parks(&self) -> &[Park];

    /// Persist a new aggregate for one of a park's rating pools.
    ///
    /// # Errors
    /// Returns [`StoreError::UnknownPark`] when `id` is not stored, or any
    /// backend-specific failure.
    fn save_aggregate(
        &mut self,
        id: &ParkId,
        target: RatingTarget,
        aggregate: RatingAggregate,
    ) -> Result<(), StoreError>;
}

/// Vector-backed [`ParkStore`] with an identifier index.
///
/// # Examples
/// ```
/// use skatepark_core::{Area, LocalizedNames, MemoryParkStore, Park, ParkId, ParkStore};
///
/// # fn main() -> Result<(), skatepark_core::StoreError> {
/// let store = MemoryParkStore::new(vec![Park::new(
///     "sportek",
///     LocalizedNames::english("Sportek"),
///     Area::Center,
/// )])?;
/// assert!(store.park(&ParkId::from("sportek")).is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryParkStore {
    parks: Vec<Park>,
    index: HashMap<ParkId, usize>,
}

impl MemoryParkStore {
    /// Build a store, rejecting duplicate identifiers.
    ///
    /// # Errors
    /// Returns [`StoreError::DuplicatePark`] naming the first repeated id.
    pub fn new(parks: Vec<Park>) -> Result<Self, StoreError> {
        let mut index = HashMap::with_capacity(parks.len());
        for (position, park) in parks.iter().enumerate() {
            if index.insert(park.id.clone(), position).is_some() {
                return Err(StoreError::DuplicatePark {
                    id: park.id.clone(),
                });
            }
        }
        Ok(Self { parks, index })
    }

    /// Consume the store and return the parks in directory order.
    #[must_use]
    pub fn into_parks(self) -> Vec<Park> {
        self.parks
    }
}

impl ParkStore for MemoryParkStore {
    fn park(&self, id: &ParkId) -> Option<&Park> {
        self.index
            .get(id)
            .and_then(|position| self.parks.get(*position))
    }

    fn parks(&self) -> &[Park] {
        &self.parks
    }

    fn save_aggregate(
        &mut self,
        id: &ParkId,
        target: RatingTarget,
        aggregate: RatingAggregate,
    ) -> Result<(), StoreError> {
        let park = self
            .index
            .get(id)
            .and_then(|position| self.parks.get_mut(*position))
            .ok_or_else(|| StoreError::UnknownPark { id: id.clone() })?;
        park.set_aggregate(target, aggregate);
        Ok(())
    }
}

/// Errors raised by [`submit_vote`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitVoteError {
    /// The submission names a park the store does not hold.
    #[error("unknown skatepark '{id}'")]
    UnknownPark {
        /// Identifier from the submission.
        id: ParkId,
    },
    /// The aggregate could not absorb the vote.
    #[error(transparent)]
    Rating(#[from] RatingError),
    /// The store failed to persist the new aggregate.
    #[error("failed to save rating: {0}")]
    Store(#[from] StoreError),
}

/// Fold a validated vote into the stored aggregate and persist the result.
///
/// Votes for [`RatingTarget::Difficulty`] on a park without a difficulty
/// pool start a fresh one.
///
/// # Errors
/// Returns [`SubmitVoteError`] when the park is unknown, the aggregate
/// update fails, or the store rejects the write. The stored aggregate is
/// left untouched on error.
pub fn submit_vote<S>(
    store: &mut S,
    submission: &VoteSubmission,
) -> Result<RatingAggregate, SubmitVoteError>
where
    S: ParkStore + ?Sized,
{
    let current = store
        .park(&submission.park_id)
        .map(|park| park.aggregate(submission.target))
        .ok_or_else(|| SubmitVoteError::UnknownPark {
            id: submission.park_id.clone(),
        })?;
    let updated = current.apply(submission.new_value, submission.previous_value)?;
    store.save_aggregate(&submission.park_id, submission.target, updated)?;
    log::debug!(
        "Recorded {} vote {} for '{}': {} over {} votes",
        submission.target,
        submission.new_value.get(),
        submission.park_id,
        updated.average,
        updated.count
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vote;
    use crate::test_support::rated_park;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> MemoryParkStore {
        MemoryParkStore::new(vec![
            rated_park("a", "Alpha", 4.0, 10),
            rated_park("b", "Beta", 0.0, 0),
        ])
        .expect("unique ids")
    }

    fn vote(id: &str, value: i64, previous: Option<i64>) -> VoteSubmission {
        VoteSubmission::new(
            id,
            RatingTarget::Rating,
            Vote::new(value).expect("valid vote"),
            previous.map(|p| Vote::new(p).expect("valid vote")),
        )
    }

    #[rstest]
    fn rejects_duplicate_ids() {
        let err = MemoryParkStore::new(vec![
            rated_park("a", "Alpha", 1.0, 1),
            rated_park("a", "Again", 2.0, 1),
        ])
        .expect_err("duplicate");
        assert_eq!(
            err,
            StoreError::DuplicatePark {
                id: ParkId::from("a")
            }
        );
    }

    #[rstest]
    fn new_vote_is_persisted(mut store: MemoryParkStore) {
        let updated = submit_vote(&mut store, &vote("a", 5, None)).expect("vote");
        assert_eq!(updated, RatingAggregate::new(4.09, 11));
        let park = store.park(&ParkId::from("a")).expect("stored");
        assert_eq!(park.rating, updated);
    }

    #[rstest]
    fn changed_vote_keeps_count(mut store: MemoryParkStore) {
        submit_vote(&mut store, &vote("a", 5, None)).expect("vote");
        let updated = submit_vote(&mut store, &vote("a", 2, Some(5))).expect("vote");
        assert_eq!(updated, RatingAggregate::new(3.82, 11));
    }

    #[rstest]
    fn difficulty_vote_starts_pool(mut store: MemoryParkStore) {
        let submission = VoteSubmission {
            target: RatingTarget::Difficulty,
            ..vote("b", 3, None)
        };
        let updated = submit_vote(&mut store, &submission).expect("vote");
        assert_eq!(updated, RatingAggregate::new(3.0, 1));
        let park = store.park(&ParkId::from("b")).expect("stored");
        assert_eq!(park.difficulty, Some(updated));
        assert_eq!(park.rating, RatingAggregate::EMPTY);
    }

    #[rstest]
    fn unknown_park_is_rejected(mut store: MemoryParkStore) {
        let err = submit_vote(&mut store, &vote("zzz", 3, None)).expect_err("unknown");
        assert_eq!(
            err,
            SubmitVoteError::UnknownPark {
                id: ParkId::from("zzz")
            }
        );
    }

    #[rstest]
    fn failed_update_leaves_store_untouched() {
        let mut store =
            MemoryParkStore::new(vec![rated_park("full", "Full", 3.0, u32::MAX)]).expect("store");
        let err = submit_vote(&mut store, &vote("full", 4, None)).expect_err("overflow");
        assert_eq!(err, SubmitVoteError::Rating(RatingError::VoteCountOverflow));
        let park = store.park(&ParkId::from("full")).expect("stored");
        assert_eq!(park.rating, RatingAggregate::new(3.0, u32::MAX));
    }

    #[rstest]
    fn save_to_unknown_park_fails(mut store: MemoryParkStore) {
        let err = store
            .save_aggregate(
                &ParkId::from("nope"),
                RatingTarget::Rating,
                RatingAggregate::EMPTY,
            )
            .expect_err("unknown");
        assert!(matches!(err, StoreError::UnknownPark { .. }));
    }

    #[rstest]
    fn into_parks_keeps_order(store: MemoryParkStore) {
        let ids: Vec<_> = store
            .into_parks()
            .into_iter()
            .map(|park| park.id.to_string())
            .collect();
        assert_eq!(ids, ["a", "b"]);
    }
}
