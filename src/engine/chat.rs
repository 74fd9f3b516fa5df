//! チャットの書き込みとささやきの制御。表示側のフィルタは view.rs にある

use crate::engine::Actor;
use crate::models::chat::{ChatMessage, InfoCard};
use crate::models::game::GameState;

/// ささやきは allow_whispers が立っているか送信者が説書人の場合のみ通す。
/// 拒否されたささやきは黙って捨てる
pub fn send_message(
    state: &mut GameState,
    actor: &Actor,
    content: String,
    recipient_id: Option<String>,
    card: Option<InfoCard>,
) {
    if content.trim().is_empty() {
        return;
    }
    if recipient_id.is_some() && !state.allow_whispers && !actor.is_storyteller {
        return;
    }
    // カード付きメッセージは説書人専用
    let card = if actor.is_storyteller { card } else { None };

    let mut message = ChatMessage::new(
        actor.user_id.clone(),
        actor.user_name.clone(),
        content,
        recipient_id,
    );
    message.card = card;
    state.messages.push(message);
}

pub fn toggle_whispers(state: &mut GameState) {
    state.allow_whispers = !state.allow_whispers;
    let setting = if state.allow_whispers { "enabled" } else { "disabled" };
    state.push_system_message(format!("Whispers {setting}"));
}

/// 閲覧者に見せてよいメッセージだけを返す
pub fn visible_messages<'a>(
    state: &'a GameState,
    viewer_id: &str,
    is_storyteller: bool,
) -> Vec<&'a ChatMessage> {
    state
        .messages
        .iter()
        .filter(|m| m.visible_to(viewer_id, is_storyteller))
        .collect()
}
