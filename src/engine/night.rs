//! 夜の進行。説書人がキューを進め、プレイヤーがアクションを提出し、
//! 説書人が結果を返す submit / resolve の二段構え

use crate::engine::{Actor, Engine, EngineError};
use crate::models::chat::ChatMessage;
use crate::models::game::{GamePhase, GameState};
use crate::models::night::{NightActionPayload, NightActionRequest, RequestStatus, SKIP_RESULT};

/// キューの末尾を越えたら自動で昼に移る
pub fn night_next(state: &mut GameState) {
    if state.phase != GamePhase::Night {
        return;
    }
    let next = state.night_current_index + 1;
    if next as usize >= state.night_queue.len() {
        state.night_current_index = -1;
        state.phase = GamePhase::Day;
        state.round_info.day_count += 1;
        state.push_system_message("Dawn breaks. Phase changed to Day");
        return;
    }
    state.night_current_index = next;
}

pub fn night_prev(state: &mut GameState) {
    if state.phase != GamePhase::Night {
        return;
    }
    if state.night_current_index > -1 {
        state.night_current_index -= 1;
    }
}

/// プレイヤーは自分の見かけの役職としてのみ提出できる。酒鬼の提出は
/// is_misdirected 付きで積まれ、説書人が偽の結果を作る
pub fn submit_night_action(
    engine: &Engine,
    state: &mut GameState,
    actor: &Actor,
    role_id: &str,
    payload: NightActionPayload,
) -> Result<(), EngineError> {
    let role = engine
        .catalog()
        .role(role_id)
        .ok_or_else(|| EngineError::UnknownRole(role_id.to_string()))?;
    let Some(def) = role.night_action.as_ref() else {
        return Err(EngineError::PayloadMismatch(role_id.to_string()));
    };
    if !payload.matches(def) {
        return Err(EngineError::PayloadMismatch(role_id.to_string()));
    }

    if state.phase != GamePhase::Night || state.game_over.is_over {
        return Ok(());
    }
    let Some(seat) = state.seat_of_user(&actor.user_id) else {
        return Ok(());
    };
    if seat.is_dead || seat.seen_role_id.as_deref() != Some(role_id) {
        return Ok(());
    }
    let seat_id = seat.id;
    let is_misdirected = seat.real_role_id != seat.seen_role_id;

    // 同じ座席からの提出し直しは前の申請を置き換える
    state
        .night_action_requests
        .retain(|r| !(r.seat_id == seat_id && r.status == RequestStatus::Pending));
    state
        .night_action_requests
        .push(NightActionRequest::pending(seat_id, role_id, payload, is_misdirected));
    Ok(())
}

/// 結果は本人だけに見えるささやきとして届く。空の結果は「情報なし」で
/// 解決したとみなし、申請は閉じる
pub fn resolve_night_action(state: &mut GameState, request_id: &str, result: String) {
    let result = if result.trim().is_empty() {
        SKIP_RESULT.to_string()
    } else {
        result
    };
    let Some(request) = state
        .night_action_requests
        .iter_mut()
        .find(|r| r.id == request_id && r.status == RequestStatus::Pending)
    else {
        return;
    };
    request.status = RequestStatus::Resolved;
    request.result = Some(result.clone());
    let seat_id = request.seat_id;

    let Some(seat) = state.seat(seat_id) else {
        return;
    };
    if let Some(user_id) = seat.user_id.clone() {
        state.messages.push(ChatMessage::new(
            crate::models::chat::SYSTEM_SENDER_ID,
            "Storyteller",
            result,
            Some(user_id),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RoleCatalog;
    use crate::engine::{assignment, phase};
    use crate::models::config::RuleConfig;

    fn engine() -> Engine {
        Engine::new(RoleCatalog::builtin(), RuleConfig::default())
    }

    fn night_state(engine: &Engine) -> GameState {
        let mut state = engine.create_game("test", 7);
        for i in 0..7 {
            state.seats[i].user_id = Some(format!("u{i}"));
            state.seats[i].user_name = format!("Player {i}");
        }
        assignment::assign_role(engine, &mut state, 0, Some("poisoner")).unwrap();
        assignment::assign_role(engine, &mut state, 1, Some("imp")).unwrap();
        assignment::assign_role(engine, &mut state, 2, Some("fortune_teller")).unwrap();
        phase::set_phase(engine, &mut state, GamePhase::Night);
        state
    }

    #[test]
    fn queue_walks_forward_and_back_then_dawns() {
        let engine = engine();
        let mut state = night_state(&engine);
        assert_eq!(state.night_queue.len(), 3);

        night_next(&mut state);
        assert_eq!(state.night_current_index, 0);
        night_next(&mut state);
        night_prev(&mut state);
        assert_eq!(state.night_current_index, 0);

        night_next(&mut state);
        night_next(&mut state);
        assert_eq!(state.night_current_index, 2);
        night_next(&mut state);
        assert_eq!(state.phase, GamePhase::Day);
        assert_eq!(state.round_info.day_count, 1);
        assert_eq!(state.night_current_index, -1);
    }

    #[test]
    fn submission_goes_through_the_request_list() {
        let engine = engine();
        let mut state = night_state(&engine);
        let poisoner = Actor::player("u0", "Player 0");

        submit_night_action(
            &engine,
            &mut state,
            &poisoner,
            "poisoner",
            NightActionPayload::ChoosePlayer { seat_id: 3 },
        )
        .unwrap();
        assert_eq!(state.night_action_requests.len(), 1);
        assert!(!state.night_action_requests[0].is_misdirected);

        // 提出し直しは置き換え
        submit_night_action(
            &engine,
            &mut state,
            &poisoner,
            "poisoner",
            NightActionPayload::ChoosePlayer { seat_id: 4 },
        )
        .unwrap();
        assert_eq!(state.night_action_requests.len(), 1);
        assert_eq!(
            state.night_action_requests[0].payload,
            NightActionPayload::ChoosePlayer { seat_id: 4 }
        );
    }

    #[test]
    fn wrong_payload_shape_is_an_error() {
        let engine = engine();
        let mut state = night_state(&engine);
        let seer = Actor::player("u2", "Player 2");

        let err = submit_night_action(
            &engine,
            &mut state,
            &seer,
            "fortune_teller",
            NightActionPayload::ChoosePlayer { seat_id: 3 },
        )
        .unwrap_err();
        assert_eq!(err, EngineError::PayloadMismatch("fortune_teller".to_string()));
    }

    #[test]
    fn cannot_submit_as_someone_elses_role() {
        let engine = engine();
        let mut state = night_state(&engine);
        let poisoner = Actor::player("u0", "Player 0");

        submit_night_action(
            &engine,
            &mut state,
            &poisoner,
            "imp",
            NightActionPayload::ChoosePlayer { seat_id: 3 },
        )
        .unwrap();
        assert!(state.night_action_requests.is_empty());
    }

    #[test]
    fn misdirected_seat_is_flagged() {
        let engine = engine();
        let mut state = engine.create_game("test", 7);
        for i in 0..7 {
            state.seats[i].user_id = Some(format!("u{i}"));
        }
        // 酒鬼に fortune_teller を見せるため先に他の townsfolk を埋める
        for (seat, role) in [(1, "washerwoman"), (2, "librarian"), (3, "investigator"), (4, "chef"), (5, "empath")] {
            assignment::assign_role(&engine, &mut state, seat, Some(role)).unwrap();
        }
        assignment::assign_role(&engine, &mut state, 0, Some("drunk")).unwrap();
        assert_eq!(state.seats[0].seen_role_id.as_deref(), Some("fortune_teller"));
        phase::set_phase(&engine, &mut state, GamePhase::Night);

        let drunk = Actor::player("u0", "Player 0");
        submit_night_action(
            &engine,
            &mut state,
            &drunk,
            "fortune_teller",
            NightActionPayload::ChooseTwoPlayers { seat_ids: [1, 2] },
        )
        .unwrap();
        assert_eq!(state.night_action_requests.len(), 1);
        assert!(state.night_action_requests[0].is_misdirected);
    }

    #[test]
    fn resolution_whispers_to_the_actor() {
        let engine = engine();
        let mut state = night_state(&engine);
        let seer = Actor::player("u2", "Player 2");
        submit_night_action(
            &engine,
            &mut state,
            &seer,
            "fortune_teller",
            NightActionPayload::ChooseTwoPlayers { seat_ids: [0, 1] },
        )
        .unwrap();
        let request_id = state.night_action_requests[0].id.clone();

        resolve_night_action(&mut state, &request_id, "Yes".to_string());
        assert_eq!(state.night_action_requests[0].status, RequestStatus::Resolved);
        assert_eq!(state.night_action_requests[0].result.as_deref(), Some("Yes"));

        let msg = state.messages.last().unwrap();
        assert_eq!(msg.recipient_id.as_deref(), Some("u2"));
        assert_eq!(msg.content, "Yes");

        // 解決済みの申請は二度解決できない
        resolve_night_action(&mut state, &request_id, "No".to_string());
        assert_eq!(state.night_action_requests[0].result.as_deref(), Some("Yes"));
    }

    #[test]
    fn empty_resolution_means_no_info() {
        let engine = engine();
        let mut state = night_state(&engine);
        let seer = Actor::player("u2", "Player 2");
        submit_night_action(
            &engine,
            &mut state,
            &seer,
            "fortune_teller",
            NightActionPayload::ChooseTwoPlayers { seat_ids: [0, 1] },
        )
        .unwrap();
        let request_id = state.night_action_requests[0].id.clone();

        resolve_night_action(&mut state, &request_id, "  ".to_string());
        assert_eq!(state.night_action_requests[0].status, RequestStatus::Resolved);
        assert_eq!(state.night_action_requests[0].result.as_deref(), Some(SKIP_RESULT));

        let msg = state.messages.last().unwrap();
        assert_eq!(msg.recipient_id.as_deref(), Some("u2"));
        assert_eq!(msg.content, SKIP_RESULT);

        // 空で閉じた申請も終端。以後の解決は無視される
        resolve_night_action(&mut state, &request_id, "late info".to_string());
        assert_eq!(state.night_action_requests[0].result.as_deref(), Some(SKIP_RESULT));
    }
}
