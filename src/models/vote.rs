use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteResult {
    Executed,
    Survived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub round: u32,
    pub nominator_seat_id: Option<usize>,
    pub nominee_seat_id: usize,
    pub votes: Vec<usize>,
    pub vote_count: usize,
    pub timestamp: DateTime<Utc>,
    pub result: VoteResult,
}

/// 開票中の状態。閉票時に VoteRecord へ変換して破棄する
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voting {
    pub is_open: bool,
    pub nominator_seat_id: Option<usize>,
    pub nominee_seat_id: usize,
    // 説書人が時計回りに指している座席
    pub clock_hand_seat_id: Option<usize>,
    pub votes: Vec<usize>,
}

impl Voting {
    pub fn open(nominator_seat_id: Option<usize>, nominee_seat_id: usize, seat_count: usize) -> Self {
        Voting {
            is_open: true,
            nominator_seat_id,
            nominee_seat_id,
            // 被提名者の次の座席から時計回りに回る
            clock_hand_seat_id: Some((nominee_seat_id + 1) % seat_count),
            votes: Vec::new(),
        }
    }
}

/// 処刑に必要な票数: floor(生存者数 / 2) + 1
pub fn required_votes(alive_count: usize) -> usize {
    alive_count / 2 + 1
}
