use crate::api::{PollApi, ProfileApi};
use crate::error::{ApiError, VoteError, RETRY_MESSAGE};
use crate::model::{OptionId, Poll};
use crate::store::KeyValueStore;
use crate::tally::{tally, OptionResult};
use crate::vote_guard::VoteGuard;
use chrono::Utc;
use std::cell::RefCell;
use std::future::Future;
use tracing::{debug, info, warn};

/// Per-viewer voting state for one poll identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VotePhase {
    /// Options are selectable.
    NotVoted,
    /// A vote call is in flight; further selections are rejected.
    Submitting(OptionId),
    /// Terminal for this poll identity; options render as results.
    Voted(OptionId),
}

impl VotePhase {
    pub fn selected(&self) -> Option<OptionId> {
        match self {
            VotePhase::NotVoted => None,
            VotePhase::Submitting(id) | VotePhase::Voted(id) => Some(*id),
        }
    }
}

/// A vote that has entered `Submitting`. Dropped before the remote call
/// settles, it puts the session back to `NotVoted`.
struct PendingVote<'a> {
    session: &'a RefCell<Session>,
    poll: Poll,
    option_id: OptionId,
    settled: bool,
}

impl Drop for PendingVote<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let Ok(mut session) = self.session.try_borrow_mut() else {
            return;
        };
        if session.phase == VotePhase::Submitting(self.option_id) {
            debug!(poll_id = %self.poll.id(), "vote abandoned before it settled");
            session.phase = VotePhase::NotVoted;
        }
    }
}

struct Session {
    poll: Poll,
    phase: VotePhase,
    error: Option<String>,
}

/// Voting controller behind the survey modal.
///
/// State sits in a `RefCell` and no borrow is held across an `.await`, so
/// the controller can be shared by UI callbacks on one thread.
pub struct VoteController<A, P, S> {
    api: A,
    profile: P,
    guard: VoteGuard<S>,
    session: RefCell<Session>,
}

impl<A, P, S> VoteController<A, P, S>
where
    A: PollApi,
    P: ProfileApi,
    S: KeyValueStore,
{
    pub fn mount(poll: Poll, api: A, profile: P, guard: VoteGuard<S>) -> Self {
        let phase = initial_phase(&guard, &poll);
        Self {
            api,
            profile,
            guard,
            session: RefCell::new(Session {
                poll,
                phase,
                error: None,
            }),
        }
    }

    pub fn poll(&self) -> Poll {
        self.session.borrow().poll.clone()
    }

    pub fn phase(&self) -> VotePhase {
        self.session.borrow().phase
    }

    pub fn error_message(&self) -> Option<String> {
        self.session.borrow().error.clone()
    }

    pub fn total_votes(&self) -> u64 {
        self.session.borrow().poll.total_votes()
    }

    pub fn results(&self) -> Vec<OptionResult> {
        let session = self.session.borrow();
        tally(&session.poll, session.phase.selected())
    }

    /// Casts a vote for `option_id`.
    ///
    /// The selection is checked and the session enters `Submitting` before
    /// this returns, so a second call made while the first is pending fails
    /// with [`VoteError::InFlight`] even if neither future has been polled.
    /// On success the vote is recorded locally and the counters re-read.
    pub fn vote(&self, option_id: OptionId) -> impl Future<Output = Result<(), VoteError>> + '_ {
        let begun = self.begin_vote(option_id);
        async move { self.complete_vote(begun?).await }
    }

    fn begin_vote(&self, option_id: OptionId) -> Result<PendingVote<'_>, VoteError> {
        let mut session = self.session.borrow_mut();
        match session.phase {
            VotePhase::Submitting(_) => {
                debug!(poll_id = %session.poll.id(), "vote rejected: another vote is in flight");
                return Err(VoteError::InFlight);
            }
            VotePhase::Voted(voted) => return Err(VoteError::AlreadyVoted(voted)),
            VotePhase::NotVoted => {}
        }
        if session.poll.option(option_id).is_none() {
            return Err(VoteError::UnknownOption(option_id));
        }

        session.phase = VotePhase::Submitting(option_id);
        session.error = None;
        Ok(PendingVote {
            session: &self.session,
            poll: session.poll.clone(),
            option_id,
            settled: false,
        })
    }

    async fn complete_vote(&self, mut pending: PendingVote<'_>) -> Result<(), VoteError> {
        let poll = pending.poll.clone();
        let option_id = pending.option_id;

        let sent = self.api.vote(poll.id(), option_id).await;
        pending.settled = true;

        if let Err(e) = sent {
            warn!(poll_id = %poll.id(), option_id = %option_id, "vote failed: {e}");
            let mut session = self.session.borrow_mut();
            session.phase = VotePhase::NotVoted;
            session.error = Some(RETRY_MESSAGE.to_string());
            return Err(e.into());
        }

        if let Err(e) = self.guard.record(&poll, option_id, Utc::now()) {
            warn!(poll_id = %poll.id(), "vote accepted but not recorded locally: {e}");
        }

        {
            let mut session = self.session.borrow_mut();
            session.phase = if session.poll.same_identity(&poll) {
                VotePhase::Voted(option_id)
            } else {
                initial_phase(&self.guard, &session.poll)
            };
        }
        info!(poll_id = %poll.id(), option_id = %option_id, "vote recorded");

        if let Err(e) = self.refresh().await {
            warn!(poll_id = %poll.id(), "vote counts not refreshed: {e}");
        }
        Ok(())
    }

    /// Replaces the displayed poll with a fresh read from the profile.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let Some(fetched) = self.profile.fetch_poll().await? else {
            debug!("profile no longer has a poll");
            return Ok(());
        };

        let same = self.session.borrow().poll.same_identity(&fetched);
        if same {
            self.session.borrow_mut().poll = fetched;
        } else {
            self.remount(fetched);
        }
        Ok(())
    }

    /// Switches to another poll identity and re-checks the vote guard.
    pub fn remount(&self, poll: Poll) {
        let mut session = self.session.borrow_mut();
        if let VotePhase::Submitting(_) = session.phase {
            session.poll = poll;
            return;
        }
        session.phase = initial_phase(&self.guard, &poll);
        session.poll = poll;
        session.error = None;
    }
}

fn initial_phase<S: KeyValueStore>(guard: &VoteGuard<S>, poll: &Poll) -> VotePhase {
    match guard.load(poll) {
        Some(record) => {
            debug!(
                poll_id = %poll.id(),
                option_id = %record.selected_option_id,
                "viewer already voted"
            );
            VotePhase::Voted(record.selected_option_id)
        }
        None => VotePhase::NotVoted,
    }
}
