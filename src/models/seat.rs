use serde::{Deserialize, Serialize};

pub const VIRTUAL_PLAYER_MARKER: &str = "Bot";

/// 全員に見えるリマインダーの出所。役職由来のものは説書人専用
pub const PUBLIC_REMINDER_SOURCE: &str = "public";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Poisoned,
    Drunk,
    Protected,
    Madness,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub text: String,
    pub source_role: String,
    pub seat_id: usize,
}

impl Reminder {
    pub fn new(seat_id: usize, text: impl Into<String>, source_role: impl Into<String>) -> Self {
        Reminder {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            source_role: source_role.into(),
            seat_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub id: usize,
    pub user_id: Option<String>,
    pub user_name: String,
    pub is_virtual: bool,
    pub is_dead: bool,
    pub has_ghost_vote: bool,
    // real_role_id はルール判定の真実、seen_role_id はプレイヤーに見せる身分。
    // 酒鬼のような役職のみ両者が異なる
    pub real_role_id: Option<String>,
    pub seen_role_id: Option<String>,
    pub statuses: Vec<SeatStatus>,
    pub reminders: Vec<Reminder>,
    pub is_hand_raised: bool,
    pub vote_locked: bool,
    pub has_used_ability: bool,
    pub is_ready: bool,
}

impl Seat {
    pub fn vacant(id: usize) -> Self {
        Seat {
            id,
            user_id: None,
            user_name: format!("Seat {}", id + 1),
            is_virtual: false,
            is_dead: false,
            has_ghost_vote: true,
            real_role_id: None,
            seen_role_id: None,
            statuses: Vec::new(),
            reminders: Vec::new(),
            is_hand_raised: false,
            vote_locked: false,
            has_used_ability: false,
            is_ready: false,
        }
    }

    /// ユーザーまたは仮想プレイヤーが座っているか
    pub fn is_occupied(&self) -> bool {
        self.user_id.is_some() || self.is_virtual
    }

    pub fn is_alive_occupant(&self) -> bool {
        self.is_occupied() && !self.is_dead
    }

    /// 占有者情報を消す。座席行そのものは残る
    pub fn clear_occupant(&mut self) {
        self.user_id = None;
        self.user_name = format!("Seat {}", self.id + 1);
        self.is_virtual = false;
        self.is_ready = false;
    }

    /// プレイヤー固有の状態を初期値へ戻す（離席時など）
    pub fn reset_player_state(&mut self) {
        self.real_role_id = None;
        self.seen_role_id = None;
        self.statuses.clear();
        self.reminders.clear();
        self.is_hand_raised = false;
        self.vote_locked = false;
        self.has_used_ability = false;
        self.is_dead = false;
        self.has_ghost_vote = true;
    }

    pub fn seat_virtual_player(&mut self) {
        self.is_virtual = true;
        self.user_id = None;
        self.user_name = format!("{} {}", VIRTUAL_PLAYER_MARKER, self.id + 1);
    }
}
