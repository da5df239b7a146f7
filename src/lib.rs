//! Facade crate for the skatepark directory engine.
//!
//! This crate re-exports the core domain types, the rating aggregator and the
//! search ranker so callers depend on a single crate.

#![forbid(unsafe_code)]

pub use skatepark_core::search;
pub use skatepark_core::{
    Amenities, Amenity, Area, Locale, LocalizedNames, MAX_VOTE, MIN_VOTE, MemoryParkStore, Park,
    ParkId, ParkStore, RatingAggregate, RatingError, RatingTarget, RawVoteSubmission, StoreError,
    SubmissionError, SubmitVoteError, Vote, VoteSubmission, apply_vote, haversine_km, submit_vote,
};
