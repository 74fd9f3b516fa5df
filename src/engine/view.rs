//! 閲覧者ごとの状態フィルタ。説書人は全情報、プレイヤーは自分の見かけの
//! 役職と公開情報だけを受け取る

use crate::engine::{chat, Actor};
use crate::models::game::GameState;
use crate::models::seat::PUBLIC_REMINDER_SOURCE;

/// 配信・取得用に状態を複製してから秘匿情報を削る
pub fn filter_state_for_viewer(state: &GameState, viewer: &Actor) -> GameState {
    let mut filtered = state.clone();
    if viewer.is_storyteller {
        return filtered;
    }

    let own_seat_id = state.seat_of_user(&viewer.user_id).map(|s| s.id);

    for seat in &mut filtered.seats {
        // real_role_id は本人にも決して見せない。偽装役職の根幹
        seat.real_role_id = None;
        seat.statuses.clear();
        // 役職由来のリマインダーは秘匿。説書人が置いた公開の印だけ残す
        seat.reminders.retain(|r| r.source_role == PUBLIC_REMINDER_SOURCE);
        if Some(seat.id) != own_seat_id {
            seat.seen_role_id = None;
            seat.has_used_ability = false;
        }
    }

    filtered.messages = chat::visible_messages(state, &viewer.user_id, false)
        .into_iter()
        .cloned()
        .collect();

    // 自分の申請だけを残し、偽装フラグは落とす
    filtered.night_action_requests.retain(|r| Some(r.seat_id) == own_seat_id);
    for request in &mut filtered.night_action_requests {
        request.is_misdirected = false;
    }

    filtered.storyteller_notes.clear();
    filtered.pending_chain_events.clear();
    filtered
        .swap_requests
        .retain(|r| r.from_user_id == viewer.user_id || r.to_user_id == viewer.user_id);
    filtered
}
