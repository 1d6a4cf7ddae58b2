use crate::error::ApiError;
use poll_schema::{validate_poll_v1, PollOptionV1, PollV1};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity assigned to a poll by the remote system of record.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollId(pub String);

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PollId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Option id, unique within one poll and starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub u32);

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollOption {
    pub id: OptionId,
    pub text: String,
    pub vote_count: u64,
}

/// Display copy of a published poll. Only built from a validated payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poll {
    id: PollId,
    question: String,
    options: Vec<PollOption>,
}

impl Poll {
    pub fn id(&self) -> &PollId {
        &self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[PollOption] {
        &self.options
    }

    pub fn option(&self, id: OptionId) -> Option<&PollOption> {
        self.options.iter().find(|o| o.id == id)
    }

    pub fn total_votes(&self) -> u64 {
        self.options.iter().map(|o| o.vote_count).sum()
    }

    /// Two polls share an identity when both id and question match. A content
    /// owner replacing the question starts a new poll as far as voting goes.
    pub fn same_identity(&self, other: &Poll) -> bool {
        self.id == other.id && self.question == other.question
    }
}

impl TryFrom<PollV1> for Poll {
    type Error = ApiError;

    fn try_from(wire: PollV1) -> Result<Self, Self::Error> {
        validate_poll_v1(&wire).map_err(|e| ApiError::new(format!("invalid poll payload: {e}")))?;
        Ok(Self {
            id: PollId(wire.id),
            question: wire.question,
            options: wire
                .options
                .into_iter()
                .map(|o| PollOption {
                    id: OptionId(o.id),
                    text: o.text,
                    vote_count: o.vote_count,
                })
                .collect(),
        })
    }
}

impl From<&Poll> for PollV1 {
    fn from(poll: &Poll) -> Self {
        Self {
            id: poll.id.0.clone(),
            question: poll.question.clone(),
            options: poll
                .options
                .iter()
                .map(|o| PollOptionV1 {
                    id: o.id.0,
                    text: o.text.clone(),
                    vote_count: o.vote_count,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_poll(id: &str, question: &str, counts: &[(&str, u64)]) -> Poll {
    Poll::try_from(PollV1 {
        id: id.into(),
        question: question.into(),
        options: counts
            .iter()
            .enumerate()
            .map(|(i, (text, votes))| PollOptionV1 {
                id: i as u32 + 1,
                text: (*text).into(),
                vote_count: *votes,
            })
            .collect(),
    })
    .expect("valid sample poll")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_payload() {
        let err = Poll::try_from(PollV1 {
            id: "p".into(),
            question: "q".into(),
            options: vec![PollOptionV1 {
                id: 1,
                text: "only".into(),
                vote_count: 0,
            }],
        })
        .expect_err("single option");
        assert!(err.to_string().contains("at least 2 options"));
    }

    #[test]
    fn totals_and_identity() {
        let a = sample_poll("p1", "Best color?", &[("Red", 2), ("Blue", 3)]);
        assert_eq!(a.total_votes(), 5);
        assert_eq!(a.option(OptionId(2)).map(|o| o.text.as_str()), Some("Blue"));
        assert!(a.option(OptionId(9)).is_none());

        let recounted = sample_poll("p1", "Best color?", &[("Red", 9), ("Blue", 9)]);
        assert!(a.same_identity(&recounted));

        let replaced = sample_poll("p1", "Best shape?", &[("Red", 2), ("Blue", 3)]);
        assert!(!a.same_identity(&replaced));
    }
}
