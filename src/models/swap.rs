use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 座席交換のリクエスト。受諾か拒否で消える
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub id: String,
    pub from_user_id: String,
    pub from_name: String,
    pub from_seat_id: usize,
    pub to_user_id: String,
    pub to_seat_id: usize,
    pub timestamp: DateTime<Utc>,
}

impl SwapRequest {
    pub fn new(
        from_user_id: impl Into<String>,
        from_name: impl Into<String>,
        from_seat_id: usize,
        to_user_id: impl Into<String>,
        to_seat_id: usize,
    ) -> Self {
        SwapRequest {
            id: uuid::Uuid::new_v4().to_string(),
            from_user_id: from_user_id.into(),
            from_name: from_name.into(),
            from_seat_id,
            to_user_id: to_user_id.into(),
            to_seat_id,
            timestamp: Utc::now(),
        }
    }
}
