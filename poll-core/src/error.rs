use crate::model::OptionId;
use thiserror::Error;

/// Message shown to the user for any failed remote call.
pub const RETRY_MESSAGE: &str = "Something went wrong. Please try again.";

/// Remote failure. Callers only distinguish "failed"; the message is for logs.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("poll api request failed: {message}")]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("question is required")]
    EmptyQuestion,

    #[error("poll needs at least 2 options, got {0}")]
    TooFewOptions(usize),

    #[error("option {0} has no text")]
    EmptyOption(OptionId),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(feature = "sqlite")]
    #[error("sqlite store error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VoteError {
    #[error("a vote is already being submitted")]
    InFlight,

    #[error("already voted for option {0}")]
    AlreadyVoted(OptionId),

    #[error("option {0} is not part of this poll")]
    UnknownOption(OptionId),

    #[error(transparent)]
    Remote(#[from] ApiError),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AuthoringError {
    #[error("a poll change is already being submitted")]
    Busy,

    #[error("invalid poll: {0}")]
    Invalid(#[from] DraftError),

    #[error(transparent)]
    Remote(#[from] ApiError),
}
