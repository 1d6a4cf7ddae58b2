use crate::error::StoreError;
use crate::model::{OptionId, Poll, PollId};
use crate::store::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Local evidence that this viewer already voted on a poll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub poll_id: PollId,
    /// Question at vote time; a different question means a replaced poll.
    pub question: String,
    pub selected_option_id: OptionId,
    pub voted_at: DateTime<Utc>,
}

/// Reads and writes [`VoteRecord`]s keyed by poll id.
#[derive(Clone, Debug)]
pub struct VoteGuard<S> {
    store: S,
    prefix: String,
}

impl<S: KeyValueStore> VoteGuard<S> {
    pub fn new(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn key(&self, poll_id: &PollId) -> String {
        format!("{}:{}", self.prefix, poll_id)
    }

    /// Record for `poll`, if one exists and still belongs to it.
    ///
    /// Malformed records and records left by a superseded poll (same id,
    /// different question) are removed and reported as absent.
    pub fn load(&self, poll: &Poll) -> Option<VoteRecord> {
        let key = self.key(poll.id());
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(poll_id = %poll.id(), "failed to read vote record: {e}");
                return None;
            }
        };

        let record = match serde_json::from_str::<VoteRecord>(&raw) {
            Ok(record) => record,
            Err(e) => {
                debug!(poll_id = %poll.id(), "discarding malformed vote record: {e}");
                self.discard(&key);
                return None;
            }
        };

        if record.poll_id != *poll.id() || record.question != poll.question() {
            debug!(poll_id = %poll.id(), "discarding vote record of a replaced poll");
            self.discard(&key);
            return None;
        }

        if poll.option(record.selected_option_id).is_none() {
            debug!(
                poll_id = %poll.id(),
                option_id = %record.selected_option_id,
                "discarding vote record for a missing option"
            );
            self.discard(&key);
            return None;
        }

        Some(record)
    }

    pub fn record(
        &self,
        poll: &Poll,
        option_id: OptionId,
        voted_at: DateTime<Utc>,
    ) -> Result<VoteRecord, StoreError> {
        let record = VoteRecord {
            poll_id: poll.id().clone(),
            question: poll.question().to_string(),
            selected_option_id: option_id,
            voted_at,
        };
        let raw = serde_json::to_string(&record)?;
        self.store.set(&self.key(poll.id()), &raw)?;
        Ok(record)
    }

    pub fn clear(&self, poll_id: &PollId) -> Result<(), StoreError> {
        self.store.remove(&self.key(poll_id))
    }

    fn discard(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!("failed to discard vote record {key}: {e}");
        }
    }
}
