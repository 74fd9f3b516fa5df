//! 勝敗判定。死亡と閉票のたびに走る。一度決まった勝敗は覆らない

use crate::engine::Engine;
use crate::models::chat::{ChatMessage, SYSTEM_SENDER_ID};
use crate::models::game::{GameState, Winner};
use crate::models::role::Team;

pub fn end_game(state: &mut GameState, winner: Winner, reason: impl Into<String>) {
    if state.game_over.is_over {
        return;
    }
    let reason = reason.into();
    state.game_over.is_over = true;
    state.game_over.winner = Some(winner);
    state.game_over.reason = reason.clone();
    let side = match winner {
        Winner::Good => "Good",
        Winner::Evil => "Evil",
    };
    state.push_system_message(format!("Game over. {side} wins: {reason}"));
}

/// 死亡の確定後に呼ぶ。デーモンの死は緋色の女への継承条件を先に確かめる
pub fn evaluate_after_death(engine: &Engine, state: &mut GameState, dead_seat_id: usize) {
    if state.game_over.is_over {
        return;
    }
    let dead_team = state
        .seat(dead_seat_id)
        .and_then(|s| s.real_role_id.as_deref())
        .and_then(|id| engine.catalog().role(id))
        .map(|r| r.team);

    if dead_team == Some(Team::Demon) {
        if transfer_demonhood(engine, state, dead_seat_id) {
            return;
        }
        end_game(state, Winner::Good, "The demon is dead");
        return;
    }

    evaluate_alive_threshold(engine, state);
}

/// 閉票後に呼ぶ。生存者数の条件だけを見る
pub fn evaluate_after_vote(engine: &Engine, state: &mut GameState) {
    if state.game_over.is_over {
        return;
    }
    evaluate_alive_threshold(engine, state);
}

fn evaluate_alive_threshold(engine: &Engine, state: &mut GameState) {
    if state.alive_count() <= engine.rules().evil_win_alive_threshold {
        end_game(state, Winner::Evil, "Too few players remain alive");
    }
}

/// 生存する緋色の女がいて生存者数が閾値以上なら、彼女がデーモンになり勝敗は保留。
/// real と seen の両方を書き換える。以後の夜キューで新デーモンとして起こされる
fn transfer_demonhood(engine: &Engine, state: &mut GameState, dead_seat_id: usize) -> bool {
    if state.alive_count() < engine.rules().scarlet_woman_min_alive {
        return false;
    }
    let demon_role_id = match state.seat(dead_seat_id).and_then(|s| s.real_role_id.clone()) {
        Some(id) => id,
        None => return false,
    };
    let Some(heir) = state
        .seats
        .iter_mut()
        .find(|s| s.is_alive_occupant() && s.real_role_id.as_deref() == Some("scarlet_woman"))
    else {
        return false;
    };
    heir.real_role_id = Some(demon_role_id.clone());
    heir.seen_role_id = Some(demon_role_id.clone());
    let heir_user_id = heir.user_id.clone();

    // 継承は本人だけに知らせる
    if let Some(user_id) = heir_user_id {
        let demon_name = engine
            .catalog()
            .role(&demon_role_id)
            .map(|r| r.name.clone())
            .unwrap_or(demon_role_id);
        state.messages.push(ChatMessage::new(
            SYSTEM_SENDER_ID,
            "Storyteller",
            format!("The Demon has died. You are the {demon_name} now."),
            Some(user_id),
        ));
    }
    true
}
