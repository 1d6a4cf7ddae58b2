use crate::authoring::PollSubmission;
use crate::error::ApiError;
use crate::model::{OptionId, Poll, PollId};
use std::future::Future;

/// Writes against the remote system of record.
///
/// Futures are not required to be `Send`: the browser client runs on a
/// single-threaded event loop.
pub trait PollApi {
    /// Create the profile's poll or replace it; returns the stored poll.
    fn create_or_update_poll(
        &self,
        submission: &PollSubmission,
    ) -> impl Future<Output = Result<Poll, ApiError>>;

    fn delete_poll(&self) -> impl Future<Output = Result<(), ApiError>>;

    fn vote(
        &self,
        poll_id: &PollId,
        option_id: OptionId,
    ) -> impl Future<Output = Result<(), ApiError>>;
}

/// Read of the current poll with server-confirmed counters.
pub trait ProfileApi {
    /// `Ok(None)` when the profile has no poll.
    fn fetch_poll(&self) -> impl Future<Output = Result<Option<Poll>, ApiError>>;
}
