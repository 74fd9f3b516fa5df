use axum::extract::ws::Message;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{broadcast, Mutex};

use crate::catalog::RoleCatalog;
use crate::engine::Engine;
use crate::models::config::RuleConfig;
use crate::models::game::{ChainReactionEvent, GameState};

#[derive(Clone)]
pub struct AppState {
    pub games: Arc<Mutex<HashMap<String, GameState>>>,
    pub channel: Arc<Mutex<HashMap<String, broadcast::Sender<Message>>>>,
    pub engine: Arc<Engine>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_rules(RuleConfig::from_env())
    }

    pub fn with_rules(rules: RuleConfig) -> Self {
        AppState {
            games: Arc::new(Mutex::new(HashMap::new())),
            channel: Arc::new(Mutex::new(HashMap::new())),
            engine: Arc::new(Engine::new(RoleCatalog::builtin(), rules)),
        }
    }

    pub async fn get_or_create_room_channel(&self, room_id: &str) -> broadcast::Sender<Message> {
        let mut channels = self.channel.lock().await;
        if let Some(channel) = channels.get(room_id) {
            channel.clone()
        } else {
            let (tx, _) = broadcast::channel(1000);
            channels.insert(room_id.to_string(), tx.clone());
            tx
        }
    }

    /// 状態が変わったことだけを通知する。本体は取得ルートで閲覧者ごとに
    /// フィルタして返す
    pub async fn broadcast_state_changed(&self, room_id: &str) {
        let tx = self.get_or_create_room_channel(room_id).await;

        let notification = serde_json::json!({
            "message_type": "state_changed",
            "room_id": room_id,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        if let Ok(message_text) = serde_json::to_string(&notification) {
            // 受信者がいない場合の送信失敗は無視してよい
            if let Err(e) = tx.send(Message::Text(message_text)) {
                log::debug!("No receivers for state change in room {}: {}", room_id, e);
            }
        }
    }

    /// 説書人クライアント向けに、保留になった連鎖イベントを知らせる
    pub async fn broadcast_chain_events(&self, room_id: &str, events: &[ChainReactionEvent]) {
        if events.is_empty() {
            return;
        }
        let tx = self.get_or_create_room_channel(room_id).await;

        let notification = serde_json::json!({
            "message_type": "chain_events",
            "room_id": room_id,
            "events": events,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        if let Ok(message_text) = serde_json::to_string(&notification) {
            if let Err(e) = tx.send(Message::Text(message_text)) {
                log::debug!("No receivers for chain events in room {}: {}", room_id, e);
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
