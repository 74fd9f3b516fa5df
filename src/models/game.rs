use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::chat::ChatMessage;
use super::config::{MAX_SEATS, MIN_SEATS};
use super::night::NightActionRequest;
use super::seat::Seat;
use super::swap::SwapRequest;
use super::vote::{VoteRecord, Voting};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Setup,      // ゲーム開始前
    Night,      // 夜フェーズ
    Day,        // 昼フェーズ
    Nomination, // 提名フェーズ
    Voting,     // 投票フェーズ
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::Setup => write!(f, "Setup"),
            GamePhase::Night => write!(f, "Night"),
            GamePhase::Day => write!(f, "Day"),
            GamePhase::Nomination => write!(f, "Nomination"),
            GamePhase::Voting => write!(f, "Voting"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundInfo {
    pub day_count: u32,
    pub night_count: u32,
    pub nomination_count: u32,
    pub total_rounds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Winner {
    Good,
    Evil,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOverState {
    pub is_over: bool,
    pub winner: Option<Winner>,
    pub reason: String,
}

impl Default for GameOverState {
    fn default() -> Self {
        GameOverState {
            is_over: false,
            winner: None,
            reason: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    MarkDead,
    EndGame,
}

/// 死亡が引き起こす連鎖イベント。説書人が confirm / skip するまで保留される
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainReactionEvent {
    pub id: String,
    pub title: String,
    pub message: String,
    pub affected_seat_ids: Vec<usize>,
    pub suggested_action: SuggestedAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ChainReactionEvent {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        affected_seat_ids: Vec<usize>,
        suggested_action: SuggestedAction,
    ) -> Self {
        ChainReactionEvent {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            message: message.into(),
            affected_seat_ids,
            suggested_action,
            data: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorytellerNote {
    pub id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// ルームごとに一つだけ存在する集約。エンジンの操作以外から変更してはならない
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub room_id: String,
    pub script_id: String,
    pub phase: GamePhase,
    pub round_info: RoundInfo,
    pub allow_whispers: bool,
    pub seats: Vec<Seat>,
    pub messages: Vec<ChatMessage>,
    pub game_over: GameOverState,

    // 夜の進行
    pub night_queue: Vec<String>,
    pub night_current_index: i32, // -1 = 未開始
    pub night_action_requests: Vec<NightActionRequest>,

    // 投票
    pub voting: Option<Voting>,
    pub vote_history: Vec<VoteRecord>,

    // 保留中の確認事項
    pub pending_chain_events: Vec<ChainReactionEvent>,
    pub swap_requests: Vec<SwapRequest>,

    pub storyteller_notes: Vec<StorytellerNote>,
}

impl GameState {
    /// 座席数は [MIN_SEATS, MAX_SEATS] に収める
    pub fn new(room_id: impl Into<String>, seat_count: usize) -> Self {
        let seat_count = seat_count.clamp(MIN_SEATS, MAX_SEATS);
        GameState {
            room_id: room_id.into(),
            script_id: "tb".to_string(),
            phase: GamePhase::Setup,
            round_info: RoundInfo::default(),
            allow_whispers: false,
            seats: (0..seat_count).map(Seat::vacant).collect(),
            messages: Vec::new(),
            game_over: GameOverState::default(),
            night_queue: Vec::new(),
            night_current_index: -1,
            night_action_requests: Vec::new(),
            voting: None,
            vote_history: Vec::new(),
            pending_chain_events: Vec::new(),
            swap_requests: Vec::new(),
            storyteller_notes: Vec::new(),
        }
    }

    pub fn seat(&self, seat_id: usize) -> Option<&Seat> {
        self.seats.get(seat_id)
    }

    pub fn seat_mut(&mut self, seat_id: usize) -> Option<&mut Seat> {
        self.seats.get_mut(seat_id)
    }

    pub fn seat_of_user(&self, user_id: &str) -> Option<&Seat> {
        self.seats.iter().find(|s| s.user_id.as_deref() == Some(user_id))
    }

    pub fn seat_of_user_mut(&mut self, user_id: &str) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|s| s.user_id.as_deref() == Some(user_id))
    }

    /// 生存者数 = 占有されていて死亡していない座席の数
    pub fn alive_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_alive_occupant()).count()
    }

    pub fn push_system_message(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::system(content));
    }

    pub fn pending_night_requests(&self) -> impl Iterator<Item = &NightActionRequest> {
        self.night_action_requests
            .iter()
            .filter(|r| r.status == super::night::RequestStatus::Pending)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GameState {{ room_id: {}, phase: {:?}, seats: {}, alive: {}, round: {:?} }}",
            self.room_id,
            self.phase,
            self.seats.len(),
            self.alive_count(),
            self.round_info
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_seat_invariants() {
        for n in MIN_SEATS..=MAX_SEATS {
            let state = GameState::new("1234", n);
            assert_eq!(state.seats.len(), n);
            for (i, seat) in state.seats.iter().enumerate() {
                assert_eq!(seat.id, i);
                assert!(seat.user_id.is_none());
                assert!(!seat.is_dead);
                assert!(seat.has_ghost_vote);
                assert!(seat.real_role_id.is_none());
                assert!(seat.seen_role_id.is_none());
            }
        }
    }

    #[test]
    fn seat_count_is_clamped() {
        assert_eq!(GameState::new("r", 1).seats.len(), MIN_SEATS);
        assert_eq!(GameState::new("r", 99).seats.len(), MAX_SEATS);
    }

    #[test]
    fn alive_count_ignores_empty_seats() {
        let mut state = GameState::new("r", 7);
        assert_eq!(state.alive_count(), 0);
        state.seats[0].user_id = Some("u1".to_string());
        state.seats[1].seat_virtual_player();
        state.seats[2].user_id = Some("u2".to_string());
        state.seats[2].is_dead = true;
        assert_eq!(state.alive_count(), 2);
    }
}
