//! 死亡の連鎖検出。死は即時に確定し、波及分はイベントとして保留され、
//! 説書人が先頭から一つずつ confirm / skip する

use serde_json::json;

use crate::engine::{game_over, Engine};
use crate::models::game::{
    ChainReactionEvent, GamePhase, GameState, SuggestedAction, Winner,
};
use crate::models::vote::VoteResult;

/// 生死の反転。死→生（蘇生）は連鎖検出を起こさない
pub fn toggle_dead(engine: &Engine, state: &mut GameState, seat_id: usize) -> Vec<ChainReactionEvent> {
    let Some(seat) = state.seat_mut(seat_id) else {
        return Vec::new();
    };
    if !seat.is_occupied() {
        return Vec::new();
    }

    if seat.is_dead {
        seat.is_dead = false;
        let name = seat.user_name.clone();
        state.push_system_message(format!("{name} has been revived"));
        return Vec::new();
    }

    commit_death(engine, state, seat_id)
}

/// 死を確定し、波及イベントを検出してキューに積む。幽霊票は初回の死では残る
fn commit_death(engine: &Engine, state: &mut GameState, seat_id: usize) -> Vec<ChainReactionEvent> {
    if let Some(seat) = state.seat_mut(seat_id) {
        seat.is_dead = true;
        let name = seat.user_name.clone();
        state.push_system_message(format!("{name} has died"));
    }

    let events = detect(state, seat_id);
    state.pending_chain_events.extend(events.iter().cloned());

    game_over::evaluate_after_death(engine, state, seat_id);
    events
}

fn detect(state: &GameState, seat_id: usize) -> Vec<ChainReactionEvent> {
    let mut events = Vec::new();
    let Some(dead) = state.seat(seat_id) else {
        return events;
    };
    let dead_name = dead.user_name.clone();
    let dead_role = dead.real_role_id.clone();

    // 祖母の孫が死んだ場合、祖母も死ぬ
    let is_grandchild = dead
        .reminders
        .iter()
        .any(|r| r.source_role == "grandmother" && r.text == "Grandchild");
    if is_grandchild {
        if let Some(grandmother) = state
            .seats
            .iter()
            .find(|s| s.is_alive_occupant() && s.real_role_id.as_deref() == Some("grandmother"))
        {
            events.push(ChainReactionEvent::new(
                "Grandmother",
                format!("{} was the Grandchild. The Grandmother dies too.", dead_name),
                vec![grandmother.id],
                SuggestedAction::MarkDead,
            ));
        }
    }

    // 月の子が死んだ場合、選んでいた善良なプレイヤーが死ぬ
    if dead_role.as_deref() == Some("moonchild") {
        let chosen: Vec<usize> = state
            .seats
            .iter()
            .filter(|s| {
                s.is_alive_occupant()
                    && s.reminders
                        .iter()
                        .any(|r| r.source_role == "moonchild" && r.text == "Chosen")
            })
            .map(|s| s.id)
            .collect();
        if !chosen.is_empty() {
            events.push(ChainReactionEvent::new(
                "Moonchild",
                format!("{} was the Moonchild. Their chosen player dies.", dead_name),
                chosen,
                SuggestedAction::MarkDead,
            ));
        }
    }

    // 聖者が昼の処刑で死んだ場合、その陣営の敗北
    if dead_role.as_deref() == Some("saint") && died_by_execution(state, seat_id) {
        let mut event = ChainReactionEvent::new(
            "Saint",
            format!("{} the Saint was executed. Evil wins.", dead_name),
            vec![seat_id],
            SuggestedAction::EndGame,
        );
        event.data = Some(json!({
            "winner": "EVIL",
            "reason": "The Saint was executed",
        }));
        events.push(event);
    }

    events
}

fn died_by_execution(state: &GameState, seat_id: usize) -> bool {
    let day_phase = matches!(
        state.phase,
        GamePhase::Day | GamePhase::Nomination | GamePhase::Voting
    );
    day_phase
        && state
            .vote_history
            .last()
            .map(|r| r.nominee_seat_id == seat_id && r.result == VoteResult::Executed)
            .unwrap_or(false)
}

/// 先頭のイベントのみ確定できる。MarkDead は新たな連鎖を生むことがある
pub fn confirm_chain_event(
    engine: &Engine,
    state: &mut GameState,
    event_id: &str,
) -> Vec<ChainReactionEvent> {
    if state.pending_chain_events.first().map(|e| e.id.as_str()) != Some(event_id) {
        return Vec::new();
    }
    let event = state.pending_chain_events.remove(0);

    match event.suggested_action {
        SuggestedAction::MarkDead => {
            let mut cascaded = Vec::new();
            for seat_id in event.affected_seat_ids {
                let still_alive = state
                    .seat(seat_id)
                    .map(|s| s.is_alive_occupant())
                    .unwrap_or(false);
                if still_alive {
                    cascaded.extend(commit_death(engine, state, seat_id));
                }
            }
            cascaded
        }
        SuggestedAction::EndGame => {
            let winner = event
                .data
                .as_ref()
                .and_then(|d| d.get("winner"))
                .and_then(|w| w.as_str())
                .map(|w| if w == "GOOD" { Winner::Good } else { Winner::Evil })
                .unwrap_or(Winner::Evil);
            let reason = event
                .data
                .as_ref()
                .and_then(|d| d.get("reason"))
                .and_then(|r| r.as_str())
                .unwrap_or(&event.message)
                .to_string();
            game_over::end_game(state, winner, reason);
            Vec::new()
        }
    }
}

/// 先頭のイベントのみ破棄できる
pub fn skip_chain_event(state: &mut GameState, event_id: &str) {
    if state.pending_chain_events.first().map(|e| e.id.as_str()) == Some(event_id) {
        state.pending_chain_events.remove(0);
    }
}
