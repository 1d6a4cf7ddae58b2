//! Poll authoring and single-vote voting for a profile page.
//!
//! Polls and their counters live in a remote system of record reached
//! through [`api::PollApi`] and [`api::ProfileApi`]. The only state this
//! crate owns is the per-viewer [`vote_guard::VoteRecord`], kept in a
//! [`store::KeyValueStore`].
//!
//! The vote guard is a client-side convenience: clearing storage or switching
//! device lets a viewer vote again. Real duplicate-vote prevention has to be
//! enforced by the remote API.

pub mod api;
pub mod authoring;
pub mod config;
pub mod error;
pub mod model;
#[cfg(feature = "sqlite")]
pub mod sqlite_store;
pub mod store;
pub mod tally;
pub mod vote_guard;
pub mod voting;

#[cfg(test)]
mod fake;

pub use api::{PollApi, ProfileApi};
pub use authoring::{PollChange, PollDraft, PollEditor, PollSubmission};
pub use config::ClientConfig;
pub use error::{ApiError, AuthoringError, DraftError, StoreError, VoteError};
pub use model::{OptionId, Poll, PollId, PollOption};
pub use store::{KeyValueStore, MemoryStore};
pub use tally::{percentage, OptionResult};
pub use vote_guard::{VoteGuard, VoteRecord};
pub use voting::{VoteController, VotePhase};
