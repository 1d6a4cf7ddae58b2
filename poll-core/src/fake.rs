//! In-memory system of record for tests.

use crate::api::{PollApi, ProfileApi};
use crate::authoring::PollSubmission;
use crate::error::ApiError;
use crate::model::{OptionId, Poll, PollId};
use futures::channel::oneshot;
use poll_schema::{PollOptionV1, PollV1};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct ServerState {
    poll: Option<PollV1>,
    next_poll: u32,
    upserts: usize,
    vote_calls: usize,
    fetches: usize,
    fail_upsert: bool,
    fail_vote: bool,
    fail_fetch: bool,
    fail_delete: bool,
    held_upsert: Option<oneshot::Receiver<()>>,
    held_vote: Option<oneshot::Receiver<()>>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeServer {
    state: Rc<RefCell<ServerState>>,
}

impl FakeServer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn publish(&self, question: &str, texts: &[&str]) -> Poll {
        let mut state = self.state.borrow_mut();
        state.next_poll += 1;
        let wire = PollV1 {
            id: format!("poll-{}", state.next_poll),
            question: question.into(),
            options: texts
                .iter()
                .enumerate()
                .map(|(i, text)| PollOptionV1 {
                    id: i as u32 + 1,
                    text: (*text).into(),
                    vote_count: 0,
                })
                .collect(),
        };
        state.poll = Some(wire.clone());
        Poll::try_from(wire).expect("valid fake poll")
    }

    pub(crate) fn set_counts(&self, counts: &[u64]) {
        let mut state = self.state.borrow_mut();
        if let Some(poll) = state.poll.as_mut() {
            for (option, count) in poll.options.iter_mut().zip(counts) {
                option.vote_count = *count;
            }
        }
    }

    /// Owner edits the question behind the viewer's back.
    pub(crate) fn replace_question(&self, question: &str) {
        if let Some(poll) = self.state.borrow_mut().poll.as_mut() {
            poll.question = question.into();
        }
    }

    pub(crate) fn current(&self) -> Option<Poll> {
        let wire = self.state.borrow().poll.clone()?;
        Poll::try_from(wire).ok()
    }

    pub(crate) fn upserts(&self) -> usize {
        self.state.borrow().upserts
    }

    pub(crate) fn vote_calls(&self) -> usize {
        self.state.borrow().vote_calls
    }

    pub(crate) fn fetches(&self) -> usize {
        self.state.borrow().fetches
    }

    pub(crate) fn fail_next_upsert(&self) {
        self.state.borrow_mut().fail_upsert = true;
    }

    pub(crate) fn fail_next_vote(&self) {
        self.state.borrow_mut().fail_vote = true;
    }

    pub(crate) fn fail_next_delete(&self) {
        self.state.borrow_mut().fail_delete = true;
    }

    pub(crate) fn fail_next_fetch(&self) {
        self.state.borrow_mut().fail_fetch = true;
    }

    /// The next create/update call waits until `gate` fires.
    pub(crate) fn hold_next_upsert(&self, gate: oneshot::Receiver<()>) {
        self.state.borrow_mut().held_upsert = Some(gate);
    }

    /// The next vote call waits until `gate` fires.
    pub(crate) fn hold_next_vote(&self, gate: oneshot::Receiver<()>) {
        self.state.borrow_mut().held_vote = Some(gate);
    }
}

impl PollApi for FakeServer {
    async fn create_or_update_poll(&self, submission: &PollSubmission) -> Result<Poll, ApiError> {
        let held = self.state.borrow_mut().held_upsert.take();
        if let Some(gate) = held {
            let _ = gate.await;
        }

        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_upsert) {
            return Err(ApiError::new("upsert rejected"));
        }
        state.upserts += 1;

        let previous = state.poll.take();
        let id = match &previous {
            Some(p) => p.id.clone(),
            None => {
                state.next_poll += 1;
                format!("poll-{}", state.next_poll)
            }
        };
        let options = submission
            .options()
            .iter()
            .map(|o| PollOptionV1 {
                id: o.id.0,
                text: o.text.clone(),
                vote_count: previous
                    .as_ref()
                    .and_then(|p| p.options.iter().find(|x| x.id == o.id.0))
                    .map(|x| x.vote_count)
                    .unwrap_or(0),
            })
            .collect();
        let wire = PollV1 {
            id,
            question: submission.question().to_string(),
            options,
        };
        state.poll = Some(wire.clone());
        Poll::try_from(wire)
    }

    async fn delete_poll(&self) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_delete) {
            return Err(ApiError::new("delete rejected"));
        }
        state.poll = None;
        Ok(())
    }

    async fn vote(&self, poll_id: &PollId, option_id: OptionId) -> Result<(), ApiError> {
        let held = {
            let mut state = self.state.borrow_mut();
            state.vote_calls += 1;
            state.held_vote.take()
        };
        if let Some(gate) = held {
            let _ = gate.await;
        }

        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_vote) {
            return Err(ApiError::new("vote rejected"));
        }
        let option = state
            .poll
            .as_mut()
            .filter(|p| p.id == poll_id.0)
            .and_then(|p| p.options.iter_mut().find(|o| o.id == option_id.0))
            .ok_or_else(|| ApiError::new("no such poll option"))?;
        option.vote_count += 1;
        Ok(())
    }
}

impl ProfileApi for FakeServer {
    async fn fetch_poll(&self) -> Result<Option<Poll>, ApiError> {
        let mut state = self.state.borrow_mut();
        state.fetches += 1;
        if std::mem::take(&mut state.fail_fetch) {
            return Err(ApiError::new("profile fetch failed"));
        }
        state.poll.clone().map(Poll::try_from).transpose()
    }
}
