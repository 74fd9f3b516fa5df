//! フェーズ時計の進行。Setup → Night → Day → Nomination → Voting → Night …

use crate::engine::{Engine, EngineError};
use crate::models::game::{GamePhase, GameState};

pub fn set_script(engine: &Engine, state: &mut GameState, script_id: &str) -> Result<(), EngineError> {
    if engine.catalog().script(script_id).is_none() {
        return Err(EngineError::UnknownScript(script_id.to_string()));
    }
    if state.phase != GamePhase::Setup {
        return Ok(());
    }
    state.script_id = script_id.to_string();
    Ok(())
}

/// フェーズ遷移に伴う副作用（カウンタ、夜キュー、投票状態の破棄）はすべてここで起こす
pub fn set_phase(engine: &Engine, state: &mut GameState, phase: GamePhase) {
    if state.game_over.is_over || state.phase == phase {
        return;
    }

    // 投票フェーズを離れたら開票中の状態は破棄する
    if state.voting.is_some() && phase != GamePhase::Voting {
        clear_voting(state);
    }

    match phase {
        GamePhase::Night => {
            state.round_info.night_count += 1;
            state.round_info.total_rounds += 1;
            rebuild_night_queue(engine, state);
        }
        GamePhase::Day => {
            state.round_info.day_count += 1;
            state.night_current_index = -1;
        }
        GamePhase::Nomination => {
            state.round_info.nomination_count += 1;
        }
        _ => {}
    }

    state.phase = phase;
    state.push_system_message(format!("Phase changed to {phase}"));
}

/// 夜キューは見かけの役職で作る。酒鬼も本人の知る身分で起こされる
pub fn rebuild_night_queue(engine: &Engine, state: &mut GameState) {
    let first_night = state.round_info.night_count <= 1;
    let seen_alive: Vec<&str> = state
        .seats
        .iter()
        .filter(|s| s.is_alive_occupant())
        .filter_map(|s| s.seen_role_id.as_deref())
        .collect();

    state.night_queue = engine
        .catalog()
        .night_order(first_night)
        .iter()
        .filter(|role_id| {
            let acts_tonight = engine
                .catalog()
                .role(role_id)
                .map(|r| if first_night { r.first_night } else { r.other_night })
                .unwrap_or(false);
            acts_tonight && seen_alive.contains(&role_id.as_str())
        })
        .cloned()
        .collect();
    state.night_current_index = -1;
    state.night_action_requests.clear();
}

pub fn clear_voting(state: &mut GameState) {
    state.voting = None;
    for seat in &mut state.seats {
        seat.is_hand_raised = false;
        seat.vote_locked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RoleCatalog;
    use crate::engine::assignment;
    use crate::models::config::RuleConfig;

    fn engine() -> Engine {
        Engine::new(RoleCatalog::builtin(), RuleConfig::default())
    }

    fn seated_state(engine: &Engine, n: usize) -> GameState {
        let mut state = engine.create_game("test", n);
        for i in 0..n {
            state.seats[i].user_id = Some(format!("u{i}"));
            state.seats[i].user_name = format!("Player {i}");
        }
        state
    }

    #[test]
    fn unknown_script_is_rejected() {
        let engine = engine();
        let mut state = seated_state(&engine, 7);
        assert_eq!(
            set_script(&engine, &mut state, "nope"),
            Err(EngineError::UnknownScript("nope".to_string()))
        );
        assert!(set_script(&engine, &mut state, "bmr").is_ok());
        assert_eq!(state.script_id, "bmr");
    }

    #[test]
    fn script_is_locked_after_setup() {
        let engine = engine();
        let mut state = seated_state(&engine, 7);
        set_phase(&engine, &mut state, GamePhase::Night);
        set_script(&engine, &mut state, "bmr").unwrap();
        assert_eq!(state.script_id, "tb");
    }

    #[test]
    fn night_entry_builds_queue_from_seen_roles() {
        let engine = engine();
        let mut state = seated_state(&engine, 7);
        assignment::assign_role(&engine, &mut state, 0, Some("poisoner")).unwrap();
        assignment::assign_role(&engine, &mut state, 1, Some("imp")).unwrap();
        assignment::assign_role(&engine, &mut state, 2, Some("monk")).unwrap();
        assignment::assign_role(&engine, &mut state, 3, Some("drunk")).unwrap();

        set_phase(&engine, &mut state, GamePhase::Night);
        assert_eq!(state.round_info.night_count, 1);
        // 初夜: monk は行動しない。酒鬼は washerwoman と信じており、そちらで起こされる
        assert_eq!(state.seats[3].seen_role_id.as_deref(), Some("washerwoman"));
        assert_eq!(state.night_queue, vec!["poisoner", "imp", "washerwoman"]);
        assert_eq!(state.night_current_index, -1);
    }

    #[test]
    fn later_nights_use_the_other_order() {
        let engine = engine();
        let mut state = seated_state(&engine, 7);
        assignment::assign_role(&engine, &mut state, 0, Some("monk")).unwrap();
        assignment::assign_role(&engine, &mut state, 1, Some("imp")).unwrap();

        set_phase(&engine, &mut state, GamePhase::Night);
        assert_eq!(state.night_queue, vec!["imp"]);

        set_phase(&engine, &mut state, GamePhase::Day);
        set_phase(&engine, &mut state, GamePhase::Night);
        assert_eq!(state.round_info.night_count, 2);
        assert_eq!(state.night_queue, vec!["monk", "imp"]);
    }

    #[test]
    fn leaving_voting_resets_hands() {
        let engine = engine();
        let mut state = seated_state(&engine, 7);
        state.phase = GamePhase::Voting;
        state.voting = Some(crate::models::vote::Voting::open(Some(0), 1, 7));
        state.seats[2].is_hand_raised = true;
        state.seats[3].vote_locked = true;

        set_phase(&engine, &mut state, GamePhase::Day);
        assert!(state.voting.is_none());
        assert!(!state.seats[2].is_hand_raised);
        assert!(!state.seats[3].vote_locked);
    }

    #[test]
    fn phase_is_frozen_after_game_over() {
        let engine = engine();
        let mut state = seated_state(&engine, 7);
        state.game_over.is_over = true;
        set_phase(&engine, &mut state, GamePhase::Night);
        assert_eq!(state.phase, GamePhase::Setup);
    }
}
