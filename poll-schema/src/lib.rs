use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOptionV1 {
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub vote_count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollV1 {
    pub id: String,
    pub question: String,
    pub options: Vec<PollOptionV1>,
}

/// Profile read used to refresh the displayed poll and its counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileV1 {
    pub id: String,
    #[serde(default)]
    pub poll: Option<PollV1>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOptionDraftV1 {
    pub id: u32,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollUpsertV1 {
    pub question: String,
    pub options: Vec<PollOptionDraftV1>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequestV1 {
    pub option_id: u32,
}

pub fn validate_poll_v1(poll: &PollV1) -> Result<(), String> {
    if poll.id.trim().is_empty() {
        return Err("id is required".into());
    }
    if poll.question.trim().is_empty() {
        return Err("question is required".into());
    }
    if poll.options.len() < 2 {
        return Err(format!(
            "poll needs at least 2 options, got {}",
            poll.options.len()
        ));
    }
    let mut seen = BTreeSet::new();
    for option in &poll.options {
        if option.id == 0 {
            return Err("option ids start at 1".into());
        }
        if !seen.insert(option.id) {
            return Err(format!("duplicate option id {}", option.id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll() -> PollV1 {
        PollV1 {
            id: "poll-1".into(),
            question: "Best color?".into(),
            options: vec![
                PollOptionV1 {
                    id: 1,
                    text: "Red".into(),
                    vote_count: 2,
                },
                PollOptionV1 {
                    id: 2,
                    text: "Blue".into(),
                    vote_count: 2,
                },
            ],
        }
    }

    #[test]
    fn validates_poll_v1() {
        assert!(validate_poll_v1(&poll()).is_ok());
    }

    #[test]
    fn rejects_single_option() {
        let mut p = poll();
        p.options.pop();
        assert!(validate_poll_v1(&p).is_err());
    }

    #[test]
    fn rejects_duplicate_option_ids() {
        let mut p = poll();
        p.options[1].id = 1;
        assert_eq!(
            validate_poll_v1(&p),
            Err("duplicate option id 1".to_string())
        );
    }

    #[test]
    fn rejects_blank_question() {
        let mut p = poll();
        p.question = "   ".into();
        assert!(validate_poll_v1(&p).is_err());
    }

    #[test]
    fn decodes_camel_case_and_defaults_counts() {
        let p: PollV1 = serde_json::from_value(serde_json::json!({
            "id": "p",
            "question": "q",
            "options": [{"id": 1, "text": "a", "voteCount": 4}, {"id": 2, "text": "b"}]
        }))
        .expect("decode");
        assert_eq!(p.options[0].vote_count, 4);
        assert_eq!(p.options[1].vote_count, 0);

        let req = serde_json::to_value(VoteRequestV1 { option_id: 2 }).expect("encode");
        assert_eq!(req, serde_json::json!({"optionId": 2}));
    }
}
