use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::engine::{Actor, Command};
use crate::services::game_service;
use crate::state::AppState;

/// ルームチャンネルを流れるチャットメッセージ。状態変更通知
/// （state_changed / chain_events）は AppState 側から同じチャンネルに流れる
#[derive(Debug, Serialize, Deserialize)]
struct WebSocketMessage {
    message_type: String,
    user_id: String,
    user_name: String,
    content: String,
    recipient_id: Option<String>,
    #[serde(default)]
    is_storyteller: bool,
    timestamp: String,
    room_id: String,
}

pub async fn handler(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.clone(), room_id))
}

pub async fn handle_socket(ws: WebSocket, state: AppState, room_id: String) {
    info!("New WebSocket connection established for room: {}", room_id);
    let tx = state.get_or_create_room_channel(&room_id).await;

    let (mut sender, mut receiver) = ws.split();
    let mut rx = tx.subscribe();

    let default_user_id = Uuid::new_v4().to_string();
    let room_id_for_send = room_id.clone();
    let room_id_for_receive = room_id.clone();

    let receive_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Text(text) = msg {
                match serde_json::from_str::<WebSocketMessage>(&text) {
                    Ok(mut ws_message) => {
                        // user_idが空の場合はデフォルトIDを使用
                        if ws_message.user_id.trim().is_empty() {
                            ws_message.user_id = default_user_id.clone();
                        }
                        ws_message.room_id = room_id_for_receive.clone();

                        // エンジン経由で保存する。ささやきの可否もそこで判定される
                        let actor = Actor {
                            user_id: ws_message.user_id.clone(),
                            user_name: ws_message.user_name.clone(),
                            is_storyteller: ws_message.is_storyteller,
                        };
                        let command = Command::SendMessage {
                            content: ws_message.content.clone(),
                            recipient_id: ws_message.recipient_id.clone(),
                            card: None,
                        };
                        if let Err(e) = game_service::apply_command(
                            state.clone(),
                            &room_id_for_receive,
                            &actor,
                            command,
                        )
                        .await
                        {
                            eprintln!("Error saving chat message: {}", e);
                            continue;
                        }

                        // ささやきは当事者の取得側でフィルタされるため、
                        // チャンネルには公開メッセージだけを流す
                        if ws_message.recipient_id.is_some() {
                            continue;
                        }
                        match serde_json::to_string(&ws_message) {
                            Ok(response) => {
                                info!(
                                    "Received valid message in room {}: {:?}",
                                    room_id_for_receive, response
                                );
                                if let Err(e) = tx.send(Message::Text(response)) {
                                    eprintln!("Error sending message: {}", e);
                                    break;
                                }
                            }
                            Err(e) => eprintln!("Error serializing message: {}", e),
                        }
                    }
                    Err(e) => {
                        // 不正なメッセージフォーマットの場合、エラーメッセージを送信
                        let error_message = WebSocketMessage {
                            message_type: "error".to_string(),
                            user_id: "system".to_string(),
                            user_name: "System".to_string(),
                            content: format!("Invalid message format: {}", e),
                            recipient_id: None,
                            is_storyteller: false,
                            timestamp: chrono::Utc::now().to_rfc3339(),
                            room_id: room_id_for_receive.clone(),
                        };

                        if let Ok(error_response) = serde_json::to_string(&error_message) {
                            info!("Sending error message: {}", error_response);
                            if let Err(e) = tx.send(Message::Text(error_response)) {
                                eprintln!("Error sending error message: {}", e);
                            }
                        }
                    }
                }
            }
        }
    });

    let send_task = tokio::spawn(async move {
        while let Ok(msg) = rx.recv().await {
            if let Message::Text(text) = msg.clone() {
                // メッセージがこのルームのものかを確認
                if let Ok(ws_message) = serde_json::from_str::<WebSocketMessage>(&text) {
                    if ws_message.room_id != room_id_for_send {
                        continue;
                    }
                }
            }

            info!("Sending message in room {}: {:?}", room_id_for_send, msg);
            if let Err(e) = sender.send(msg).await {
                eprintln!("Error sending message: {}", e);
                break;
            }
        }
    });

    let _ = tokio::join!(receive_task, send_task);
}
