use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SYSTEM_SENDER_ID: &str = "system";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMessageType {
    Chat,
    System,
}

/// 説書人がプレイヤーへ送る構造化カード（役職情報やヒントなど）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoCard {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    // None = 全体公開、Some = 指定ユーザーへのささやき
    pub recipient_id: Option<String>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub message_type: ChatMessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<InfoCard>,
}

impl ChatMessage {
    pub fn new(
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
        content: impl Into<String>,
        recipient_id: Option<String>,
    ) -> Self {
        ChatMessage {
            id: uuid::Uuid::new_v4().to_string(),
            sender_id: sender_id.into(),
            sender_name: sender_name.into(),
            recipient_id,
            content: content.into(),
            timestamp: Utc::now(),
            message_type: ChatMessageType::Chat,
            card: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            id: uuid::Uuid::new_v4().to_string(),
            sender_id: SYSTEM_SENDER_ID.to_string(),
            sender_name: "System".to_string(),
            recipient_id: None,
            content: content.into(),
            timestamp: Utc::now(),
            message_type: ChatMessageType::System,
            card: None,
        }
    }

    pub fn is_whisper(&self) -> bool {
        self.recipient_id.is_some() && self.message_type == ChatMessageType::Chat
    }

    /// ささやきは送信者・受信者・説書人のみ閲覧可
    pub fn visible_to(&self, viewer_id: &str, is_storyteller: bool) -> bool {
        if is_storyteller || !self.is_whisper() {
            return true;
        }
        self.sender_id == viewer_id || self.recipient_id.as_deref() == Some(viewer_id)
    }
}
