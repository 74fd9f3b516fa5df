//! 終末時計投票。説書人が時計の針を回し、座席が挙手し、閉票で記録が残る

use chrono::Utc;

use crate::engine::{game_over, phase, Actor, Engine};
use crate::models::game::GameState;
use crate::models::vote::{required_votes, VoteRecord, VoteResult, Voting};

/// 開票。被提名者は占有された生存座席でなければならない
pub fn start_vote(state: &mut GameState, nominator_seat_id: Option<usize>, nominee_seat_id: usize) {
    if state.game_over.is_over || state.voting.is_some() {
        return;
    }
    let Some(nominee) = state.seat(nominee_seat_id) else {
        return;
    };
    if !nominee.is_alive_occupant() {
        return;
    }
    for seat in &mut state.seats {
        seat.is_hand_raised = false;
        seat.vote_locked = false;
    }
    state.voting = Some(Voting::open(nominator_seat_id, nominee_seat_id, state.seats.len()));

    let name = state.seats[nominee_seat_id].user_name.clone();
    state.push_system_message(format!("{name} has been nominated"));
}

/// 死亡座席は幽霊票が残っている間だけ挙手できる
pub fn toggle_hand(state: &mut GameState, actor: &Actor, seat_id: usize) {
    let Some(voting) = state.voting.as_ref() else {
        return;
    };
    if !voting.is_open {
        return;
    }
    let Some(seat) = state.seat(seat_id) else {
        return;
    };
    let owns_seat = seat.user_id.as_deref() == Some(actor.user_id.as_str());
    if !owns_seat && !actor.is_storyteller {
        return;
    }
    if !seat.is_occupied() || seat.vote_locked {
        return;
    }
    if seat.is_dead && !seat.has_ghost_vote {
        return;
    }

    let raised = {
        let seat = &mut state.seats[seat_id];
        seat.is_hand_raised = !seat.is_hand_raised;
        seat.is_hand_raised
    };
    if let Some(voting) = state.voting.as_mut() {
        if raised {
            voting.votes.push(seat_id);
        } else {
            voting.votes.retain(|id| *id != seat_id);
        }
    }
}

/// 針が離れた座席は挙手を確定（ロック）する。被提名者まで一周したら針を下ろす
pub fn next_clock_hand(state: &mut GameState) {
    let seat_count = state.seats.len();
    let Some(voting) = state.voting.as_mut() else {
        return;
    };
    let Some(current) = voting.clock_hand_seat_id else {
        return;
    };
    let nominee = voting.nominee_seat_id;
    let next = (current + 1) % seat_count;
    voting.clock_hand_seat_id = if next == (nominee + 1) % seat_count {
        None
    } else {
        Some(next)
    };
    if let Some(seat) = state.seat_mut(current) {
        seat.vote_locked = true;
    }
}

/// 閉票。記録を残し、死亡座席の使った幽霊票を消費する。
/// 処刑そのものは別途 toggleDead で確定する
pub fn close_vote(engine: &Engine, state: &mut GameState) {
    let Some(voting) = state.voting.take() else {
        return;
    };
    let votes = voting.votes.clone();
    let required = required_votes(state.alive_count());
    let result = if votes.len() >= required {
        VoteResult::Executed
    } else {
        VoteResult::Survived
    };

    // 挙手していた死亡座席は幽霊票を永久に失う
    for seat_id in &votes {
        if let Some(seat) = state.seat_mut(*seat_id) {
            if seat.is_dead {
                seat.has_ghost_vote = false;
            }
        }
    }

    state.vote_history.push(VoteRecord {
        round: state.round_info.day_count,
        nominator_seat_id: voting.nominator_seat_id,
        nominee_seat_id: voting.nominee_seat_id,
        vote_count: votes.len(),
        votes,
        timestamp: Utc::now(),
        result,
    });

    let name = state
        .seat(voting.nominee_seat_id)
        .map(|s| s.user_name.clone())
        .unwrap_or_else(|| format!("Seat {}", voting.nominee_seat_id + 1));
    let record = state.vote_history.last().map(|r| r.vote_count).unwrap_or(0);
    match result {
        VoteResult::Executed => state.push_system_message(format!(
            "{name} is to be executed ({record} votes, {required} required)"
        )),
        VoteResult::Survived => state.push_system_message(format!(
            "{name} survives the vote ({record} votes, {required} required)"
        )),
    }

    phase::clear_voting(state);
    game_over::evaluate_after_vote(engine, state);
}
