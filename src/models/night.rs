use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::NightActionDef;

/// プレイヤーが提出する夜アクションの内容。役職定義の形と一致する必要がある
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NightActionPayload {
    ChoosePlayer { seat_id: usize },
    ChooseTwoPlayers { seat_ids: [usize; 2] },
    Confirm { confirmed: bool },
    Binary { choice: usize },
}

impl NightActionPayload {
    pub fn matches(&self, def: &NightActionDef) -> bool {
        match (self, def) {
            (NightActionPayload::ChoosePlayer { .. }, NightActionDef::ChoosePlayer { .. }) => true,
            (NightActionPayload::ChooseTwoPlayers { .. }, NightActionDef::ChooseTwoPlayers { .. }) => true,
            (NightActionPayload::Confirm { .. }, NightActionDef::Confirm { .. }) => true,
            (NightActionPayload::Binary { choice }, NightActionDef::Binary { options, .. }) => {
                *choice < options.len()
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Resolved,
}

pub const SKIP_RESULT: &str = "(no info)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightActionRequest {
    pub id: String,
    pub seat_id: usize,
    pub role_id: String,
    pub payload: NightActionPayload,
    pub status: RequestStatus,
    // real と seen が食い違う座席からの申請。説書人が偽の返答を作る合図で、
    // メカニクス上の効果は一切ない
    pub is_misdirected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl NightActionRequest {
    pub fn pending(seat_id: usize, role_id: impl Into<String>, payload: NightActionPayload, is_misdirected: bool) -> Self {
        NightActionRequest {
            id: uuid::Uuid::new_v4().to_string(),
            seat_id,
            role_id: role_id.into(),
            payload,
            status: RequestStatus::Pending,
            is_misdirected,
            result: None,
            timestamp: Utc::now(),
        }
    }
}
