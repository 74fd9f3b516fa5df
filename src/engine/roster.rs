//! 座席のライフサイクル管理。座席は作られたら破棄されず、占有者だけが入れ替わる

use crate::engine::Actor;
use crate::models::config::{MAX_SEATS, MIN_SEATS};
use crate::models::game::{GamePhase, GameState};
use crate::models::seat::Seat;

/// 上限に達している場合は何もしない
pub fn add_seat(state: &mut GameState) {
    if state.seats.len() >= MAX_SEATS {
        return;
    }
    let id = state.seats.len();
    state.seats.push(Seat::vacant(id));
}

/// 下限に達している場合は何もしない。末尾の座席を落とす
pub fn remove_seat(state: &mut GameState) {
    if state.seats.len() <= MIN_SEATS {
        return;
    }
    state.seats.pop();
}

pub fn join_seat(state: &mut GameState, actor: &Actor, seat_id: usize) {
    // すでにどこかに座っている場合は no-op
    if state.seat_of_user(&actor.user_id).is_some() {
        return;
    }
    let Some(seat) = state.seat_mut(seat_id) else {
        return;
    };
    // 他人の座席、または仮想プレイヤー用の座席には座れない
    if seat.user_id.is_some() || (seat.is_virtual && !actor.is_storyteller) {
        return;
    }
    seat.is_virtual = false;
    seat.user_id = Some(actor.user_id.clone());
    seat.user_name = actor.user_name.clone();
    let seat_no = seat_id + 1;
    state.push_system_message(format!("{} took seat {}", actor.user_name, seat_no));
}

pub fn leave_seat(state: &mut GameState, actor: &Actor) {
    let Some(seat) = state.seat_of_user_mut(&actor.user_id) else {
        return;
    };
    seat.clear_occupant();
    seat.reset_player_state();
    state.push_system_message(format!("{} left their seat", actor.user_name));
}

pub fn force_leave_seat(state: &mut GameState, seat_id: usize) {
    let Some(seat) = state.seat_mut(seat_id) else {
        return;
    };
    if !seat.is_occupied() {
        return;
    }
    let name = seat.user_name.clone();
    seat.clear_occupant();
    seat.reset_player_state();
    state.push_system_message(format!("{} was removed from their seat", name));
}

/// 最初の空席に仮想プレイヤーを座らせる
pub fn add_virtual_player(state: &mut GameState) {
    let Some(seat) = state.seats.iter_mut().find(|s| !s.is_occupied()) else {
        return;
    };
    seat.seat_virtual_player();
    let name = seat.user_name.clone();
    state.push_system_message(format!("{} joined the game", name));
}

pub fn remove_virtual_player(state: &mut GameState, seat_id: usize) {
    let Some(seat) = state.seat_mut(seat_id) else {
        return;
    };
    if !seat.is_virtual {
        return;
    }
    seat.clear_occupant();
    seat.reset_player_state();
}

/// 準備完了はゲーム開始前にのみ意味を持つ
pub fn toggle_ready(state: &mut GameState, actor: &Actor, seat_id: usize) {
    if state.phase != GamePhase::Setup {
        return;
    }
    let Some(seat) = state.seat_mut(seat_id) else {
        return;
    };
    let owns_seat = seat.user_id.as_deref() == Some(actor.user_id.as_str());
    if !owns_seat && !actor.is_storyteller {
        return;
    }
    seat.is_ready = !seat.is_ready;
}
