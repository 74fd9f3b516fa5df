//! 役職の割り当て。偽装役職（酒鬼・狂人）は seen_role_id に偽の身分を入れる

use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::engine::{Engine, EngineError};
use crate::models::game::GameState;
use crate::models::role::Team;
use crate::models::seat::Reminder;

/// `role_id = None` で役職を外す。すでに他の座席へ割り当て済みの役職は
/// 重複させず no-op とする
pub fn assign_role(
    engine: &Engine,
    state: &mut GameState,
    seat_id: usize,
    role_id: Option<&str>,
) -> Result<(), EngineError> {
    let Some(role_id) = role_id else {
        if let Some(seat) = state.seat_mut(seat_id) {
            seat.real_role_id = None;
            seat.seen_role_id = None;
            seat.has_used_ability = false;
            seat.statuses.clear();
            seat.reminders.clear();
        }
        return Ok(());
    };

    let role = engine
        .catalog()
        .role(role_id)
        .ok_or_else(|| EngineError::UnknownRole(role_id.to_string()))?
        .clone();

    // 一意性ガード: 他の座席がすでにこの役職を持っている場合は無視
    let taken_elsewhere = state
        .seats
        .iter()
        .any(|s| s.id != seat_id && s.real_role_id.as_deref() == Some(role_id));
    if taken_elsewhere {
        return Ok(());
    }

    let seen_role_id = seen_role_for(engine, state, seat_id, role_id);

    if let Some(seat) = state.seat_mut(seat_id) {
        seat.real_role_id = Some(role_id.to_string());
        seat.seen_role_id = seen_role_id;
        seat.has_used_ability = false;
        seat.statuses.clear();
        seat.reminders = role
            .reminders
            .iter()
            .map(|text| Reminder::new(seat_id, text.clone(), role_id))
            .collect();
    }
    Ok(())
}

/// 偽装役職の見かけの身分を決める。決定的に選ぶ:
/// 酒鬼 → スクリプト順で最初の未使用 TOWNSFOLK、狂人 → スクリプトのデーモン
fn seen_role_for(
    engine: &Engine,
    state: &GameState,
    seat_id: usize,
    role_id: &str,
) -> Option<String> {
    match role_id {
        "drunk" => {
            let in_use: Vec<&str> = state
                .seats
                .iter()
                .filter(|s| s.id != seat_id)
                .filter_map(|s| s.real_role_id.as_deref())
                .collect();
            engine
                .catalog()
                .townsfolk_in_script(&state.script_id)
                .into_iter()
                .find(|id| !in_use.contains(id))
                .map(str::to_string)
                // スクリプトが枯れている場合でも何かは見せる
                .or_else(|| Some("washerwoman".to_string()))
        }
        "lunatic" => engine
            .catalog()
            .first_demon_in_script(&state.script_id)
            .map(str::to_string),
        _ => Some(role_id.to_string()),
    }
}

/// 人数ごとの標準構成（townsfolk, outsider, minion, demon）
pub fn standard_composition(player_count: usize) -> (usize, usize, usize, usize) {
    match player_count {
        0..=5 => (3, 0, 1, 1),
        6 => (3, 1, 1, 1),
        7 => (5, 0, 1, 1),
        8 => (5, 1, 1, 1),
        9 => (5, 2, 1, 1),
        10 => (7, 0, 2, 1),
        11 => (7, 1, 2, 1),
        12 => (7, 2, 2, 1),
        13 => (9, 0, 3, 1),
        14 => (9, 1, 3, 1),
        _ => (9, 2, 3, 1),
    }
}

/// 占有されている座席へスクリプトから自動で役職を配る
pub fn distribute_roles(engine: &Engine, state: &mut GameState) {
    let occupied: Vec<usize> = state
        .seats
        .iter()
        .filter(|s| s.is_occupied())
        .map(|s| s.id)
        .collect();
    if occupied.len() < 5 {
        state.push_system_message("Not enough players to distribute roles (5 required)");
        return;
    }

    let Some(script) = engine.catalog().script(&state.script_id) else {
        return;
    };

    let mut by_team: [Vec<&str>; 4] = Default::default();
    for role_id in &script.roles {
        let Some(role) = engine.catalog().role(role_id) else {
            continue;
        };
        let bucket = match role.team {
            Team::Townsfolk => 0,
            Team::Outsider => 1,
            Team::Minion => 2,
            Team::Demon => 3,
            _ => continue,
        };
        by_team[bucket].push(role.id.as_str());
    }

    let (townsfolk, outsiders, minions, demons) = standard_composition(occupied.len());
    let mut rng = thread_rng();
    let mut picked: Vec<String> = Vec::with_capacity(occupied.len());
    for (bucket, count) in [(0, townsfolk), (1, outsiders), (2, minions), (3, demons)] {
        let mut pool = by_team[bucket].clone();
        pool.shuffle(&mut rng);
        picked.extend(pool.into_iter().take(count).map(str::to_string));
    }
    picked.shuffle(&mut rng);

    // 既存の割り当てを消してから配る
    for seat in &mut state.seats {
        seat.real_role_id = None;
        seat.seen_role_id = None;
        seat.reminders.clear();
        seat.statuses.clear();
        seat.has_used_ability = false;
    }
    for (seat_id, role_id) in occupied.iter().zip(picked) {
        // カタログ由来の役職IDなので失敗しない
        let _ = assign_role(engine, state, *seat_id, Some(&role_id));
    }

    let count = occupied.len();
    state.push_system_message(format!("Roles distributed to {count} players"));
}
