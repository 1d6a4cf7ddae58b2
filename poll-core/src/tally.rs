use crate::model::{OptionId, Poll};

/// `round(votes / total * 100)`, halves rounded up; 0 when nobody voted.
pub fn percentage(votes: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((votes * 200 + total) / (total * 2)) as u32
}

/// One row of the results view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionResult {
    pub id: OptionId,
    pub text: String,
    pub votes: u64,
    pub percent: u32,
    pub selected: bool,
}

pub fn tally(poll: &Poll, selected: Option<OptionId>) -> Vec<OptionResult> {
    let total = poll.total_votes();
    poll.options()
        .iter()
        .map(|o| OptionResult {
            id: o.id,
            text: o.text.clone(),
            votes: o.vote_count,
            percent: percentage(o.vote_count, total),
            selected: selected == Some(o.id),
        })
        .collect()
}
