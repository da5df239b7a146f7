//! Domain model and algorithms for a skatepark directory.
//!
//! The crate keeps two concerns apart:
//!
//! - rating aggregation, which folds one 1 to 5 vote at a time into a
//!   stored `{ average, count }` pair ([`apply_vote`], [`submit_vote`]);
//! - ranking, which filters and orders the directory for display
//!   ([`search::rank_parks`]).
//!
//! Both work on plain values. Storage sits behind [`ParkStore`].

#![forbid(unsafe_code)]

mod distance;
mod park;
mod rating;
pub mod search;
mod store;
mod submission;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use distance::haversine_km;
pub use park::{Amenities, Amenity, Area, Locale, LocalizedNames, Park, ParkId};
pub use rating::{MAX_VOTE, MIN_VOTE, RatingAggregate, RatingError, Vote, apply_vote};
pub use store::{MemoryParkStore, ParkStore, StoreError, SubmitVoteError, submit_vote};
pub use submission::{RatingTarget, RawVoteSubmission, SubmissionError, VoteSubmission};
