use crate::api::PollApi;
use crate::error::{AuthoringError, DraftError, RETRY_MESSAGE};
use crate::model::{OptionId, Poll};
use poll_schema::{PollOptionDraftV1, PollUpsertV1};
use std::cell::{Cell, RefCell};
use tracing::{info, warn};

pub const MIN_OPTIONS: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraftOption {
    pub id: OptionId,
    pub text: String,
}

/// Editable form state for a poll. Never sent as-is: [`PollDraft::build`]
/// turns it into a [`PollSubmission`] or says why it can't.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollDraft {
    question: String,
    options: Vec<DraftOption>,
}

impl Default for PollDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl PollDraft {
    pub fn new() -> Self {
        Self {
            question: String::new(),
            options: (1..=MIN_OPTIONS as u32)
                .map(|id| DraftOption {
                    id: OptionId(id),
                    text: String::new(),
                })
                .collect(),
        }
    }

    pub fn from_poll(poll: &Poll) -> Self {
        Self {
            question: poll.question().to_string(),
            options: poll
                .options()
                .iter()
                .map(|o| DraftOption {
                    id: o.id,
                    text: o.text.clone(),
                })
                .collect(),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[DraftOption] {
        &self.options
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    /// Returns false when `id` is not in the draft.
    pub fn set_option_text(&mut self, id: OptionId, text: impl Into<String>) -> bool {
        match self.options.iter_mut().find(|o| o.id == id) {
            Some(option) => {
                option.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Appends a blank option with id `max(existing ids) + 1`. Returns `None`
    /// and leaves the draft untouched when that id would overflow.
    pub fn add_option(&mut self) -> Option<OptionId> {
        let max = self.options.iter().map(|o| o.id.0).max().unwrap_or(0);
        let id = OptionId(max.checked_add(1)?);
        self.options.push(DraftOption {
            id,
            text: String::new(),
        });
        Some(id)
    }

    /// No-op when only the minimum number of options remains.
    pub fn remove_option(&mut self, id: OptionId) -> bool {
        if self.options.len() <= MIN_OPTIONS {
            return false;
        }
        let before = self.options.len();
        self.options.retain(|o| o.id != id);
        self.options.len() != before
    }

    pub fn is_valid(&self) -> bool {
        self.build().is_ok()
    }

    pub fn build(&self) -> Result<PollSubmission, DraftError> {
        let question = self.question.trim();
        if question.is_empty() {
            return Err(DraftError::EmptyQuestion);
        }
        if self.options.len() < MIN_OPTIONS {
            return Err(DraftError::TooFewOptions(self.options.len()));
        }
        let mut options = Vec::with_capacity(self.options.len());
        for option in &self.options {
            let text = option.text.trim();
            if text.is_empty() {
                return Err(DraftError::EmptyOption(option.id));
            }
            options.push(DraftOption {
                id: option.id,
                text: text.to_string(),
            });
        }
        Ok(PollSubmission {
            question: question.to_string(),
            options,
        })
    }
}

/// A complete, trimmed poll ready to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollSubmission {
    question: String,
    options: Vec<DraftOption>,
}

impl PollSubmission {
    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[DraftOption] {
        &self.options
    }
}

impl From<&PollSubmission> for PollUpsertV1 {
    fn from(submission: &PollSubmission) -> Self {
        Self {
            question: submission.question.clone(),
            options: submission
                .options
                .iter()
                .map(|o| PollOptionDraftV1 {
                    id: o.id.0,
                    text: o.text.clone(),
                })
                .collect(),
        }
    }
}

/// Result handed back after a save or a delete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollChange {
    Saved(Poll),
    Deleted,
}

/// Form controller behind the poll editor modal.
pub struct PollEditor<A> {
    api: A,
    draft: RefCell<PollDraft>,
    busy: Cell<bool>,
    error: RefCell<Option<String>>,
}

impl<A: PollApi> PollEditor<A> {
    pub fn new(api: A, draft: PollDraft) -> Self {
        Self {
            api,
            draft: RefCell::new(draft),
            busy: Cell::new(false),
            error: RefCell::new(None),
        }
    }

    pub fn draft(&self) -> PollDraft {
        self.draft.borrow().clone()
    }

    pub fn edit<R>(&self, f: impl FnOnce(&mut PollDraft) -> R) -> R {
        f(&mut self.draft.borrow_mut())
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Drives the submit button's enabled state.
    pub fn can_submit(&self) -> bool {
        !self.busy.get() && self.draft.borrow().is_valid()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub async fn submit(&self) -> Result<PollChange, AuthoringError> {
        if self.busy.get() {
            return Err(AuthoringError::Busy);
        }
        let submission = self.draft.borrow().build()?;

        self.begin();
        let result = self.api.create_or_update_poll(&submission).await;
        self.busy.set(false);

        match result {
            Ok(poll) => {
                info!(poll_id = %poll.id(), options = poll.options().len(), "poll saved");
                *self.draft.borrow_mut() = PollDraft::new();
                Ok(PollChange::Saved(poll))
            }
            Err(e) => {
                warn!("poll save failed: {e}");
                *self.error.borrow_mut() = Some(RETRY_MESSAGE.to_string());
                Err(e.into())
            }
        }
    }

    pub async fn delete(&self) -> Result<PollChange, AuthoringError> {
        if self.busy.get() {
            return Err(AuthoringError::Busy);
        }

        self.begin();
        let result = self.api.delete_poll().await;
        self.busy.set(false);

        match result {
            Ok(()) => {
                info!("poll deleted");
                *self.draft.borrow_mut() = PollDraft::new();
                Ok(PollChange::Deleted)
            }
            Err(e) => {
                warn!("poll delete failed: {e}");
                *self.error.borrow_mut() = Some(RETRY_MESSAGE.to_string());
                Err(e.into())
            }
        }
    }

    fn begin(&self) {
        self.busy.set(true);
        *self.error.borrow_mut() = None;
    }
}
