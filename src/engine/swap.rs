//! 座席交換。プレイヤー同士はリクエスト経由、説書人は直接入れ替えられる

use crate::engine::Actor;
use crate::models::game::GameState;
use crate::models::swap::SwapRequest;

pub fn request_seat_swap(state: &mut GameState, actor: &Actor, to_seat_id: usize) {
    let Some(from_seat) = state.seat_of_user(&actor.user_id) else {
        return;
    };
    let from_seat_id = from_seat.id;
    if from_seat_id == to_seat_id {
        return;
    }
    // 交換相手は実プレイヤーの座席のみ
    let Some(to_user_id) = state.seat(to_seat_id).and_then(|s| s.user_id.clone()) else {
        return;
    };
    // 同じ相手への重複リクエストは一つに保つ
    state
        .swap_requests
        .retain(|r| !(r.from_user_id == actor.user_id && r.to_seat_id == to_seat_id));
    state.swap_requests.push(SwapRequest::new(
        actor.user_id.clone(),
        actor.user_name.clone(),
        from_seat_id,
        to_user_id,
        to_seat_id,
    ));
}

/// 受諾できるのは宛先のプレイヤーだけ。受諾・拒否どちらでもリクエストは消える
pub fn respond_to_swap_request(
    state: &mut GameState,
    actor: &Actor,
    request_id: &str,
    accept: bool,
) {
    let Some(idx) = state.swap_requests.iter().position(|r| r.id == request_id) else {
        return;
    };
    if state.swap_requests[idx].to_user_id != actor.user_id {
        return;
    }
    let request = state.swap_requests.remove(idx);
    if !accept {
        return;
    }
    // 発行時から座席が動いていたら黙って流す
    let from_ok = state
        .seat(request.from_seat_id)
        .map(|s| s.user_id.as_deref() == Some(request.from_user_id.as_str()))
        .unwrap_or(false);
    let to_ok = state
        .seat(request.to_seat_id)
        .map(|s| s.user_id.as_deref() == Some(request.to_user_id.as_str()))
        .unwrap_or(false);
    if from_ok && to_ok {
        swap_seats(state, request.from_seat_id, request.to_seat_id);
    }
}

/// 占有者の身元だけを入れ替える。役職・生死・リマインダーは座席に残る
pub fn swap_seats(state: &mut GameState, seat_a: usize, seat_b: usize) {
    if seat_a == seat_b || seat_a >= state.seats.len() || seat_b >= state.seats.len() {
        return;
    }
    let (low, high) = if seat_a < seat_b { (seat_a, seat_b) } else { (seat_b, seat_a) };
    let (head, tail) = state.seats.split_at_mut(high);
    let a = &mut head[low];
    let b = &mut tail[0];

    std::mem::swap(&mut a.user_id, &mut b.user_id);
    std::mem::swap(&mut a.user_name, &mut b.user_name);
    std::mem::swap(&mut a.is_virtual, &mut b.is_virtual);
    std::mem::swap(&mut a.is_ready, &mut b.is_ready);

    let name_a = state.seats[seat_a].user_name.clone();
    let name_b = state.seats[seat_b].user_name.clone();
    state.push_system_message(format!("{name_a} and {name_b} swapped seats"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seated_state(n: usize) -> GameState {
        let mut state = GameState::new("test", n);
        for i in 0..n {
            state.seats[i].user_id = Some(format!("u{i}"));
            state.seats[i].user_name = format!("Player {i}");
        }
        state
    }

    #[test]
    fn accepted_swap_moves_people_not_roles() {
        let mut state = seated_state(5);
        state.seats[0].real_role_id = Some("imp".to_string());
        state.seats[2].is_dead = true;

        let alice = Actor::player("u0", "Player 0");
        request_seat_swap(&mut state, &alice, 2);
        let request_id = state.swap_requests[0].id.clone();

        let carol = Actor::player("u2", "Player 2");
        respond_to_swap_request(&mut state, &carol, &request_id, true);

        assert_eq!(state.seats[0].user_id.as_deref(), Some("u2"));
        assert_eq!(state.seats[2].user_id.as_deref(), Some("u0"));
        // 役職と生死は座席に残る
        assert_eq!(state.seats[0].real_role_id.as_deref(), Some("imp"));
        assert!(state.seats[2].is_dead);
        assert!(state.swap_requests.is_empty());
    }

    #[test]
    fn only_the_target_may_respond() {
        let mut state = seated_state(5);
        let alice = Actor::player("u0", "Player 0");
        request_seat_swap(&mut state, &alice, 2);
        let request_id = state.swap_requests[0].id.clone();

        let mallory = Actor::player("u3", "Player 3");
        respond_to_swap_request(&mut state, &mallory, &request_id, true);
        assert_eq!(state.swap_requests.len(), 1);
        assert_eq!(state.seats[0].user_id.as_deref(), Some("u0"));
    }

    #[test]
    fn rejection_just_clears_the_request() {
        let mut state = seated_state(5);
        let alice = Actor::player("u0", "Player 0");
        request_seat_swap(&mut state, &alice, 2);
        let request_id = state.swap_requests[0].id.clone();

        let carol = Actor::player("u2", "Player 2");
        respond_to_swap_request(&mut state, &carol, &request_id, false);
        assert!(state.swap_requests.is_empty());
        assert_eq!(state.seats[0].user_id.as_deref(), Some("u0"));
    }

    #[test]
    fn stale_request_fizzles_if_seats_moved() {
        let mut state = seated_state(5);
        let alice = Actor::player("u0", "Player 0");
        request_seat_swap(&mut state, &alice, 2);
        let request_id = state.swap_requests[0].id.clone();

        // 発行後にアリスが席を移る
        state.seats[0].user_id = None;
        state.seats[4].user_id = Some("u0".to_string());

        let carol = Actor::player("u2", "Player 2");
        respond_to_swap_request(&mut state, &carol, &request_id, true);
        assert_eq!(state.seats[2].user_id.as_deref(), Some("u2"));
        assert!(state.swap_requests.is_empty());
    }

    #[test]
    fn cannot_request_an_empty_seat() {
        let mut state = GameState::new("test", 5);
        state.seats[0].user_id = Some("u0".to_string());
        let alice = Actor::player("u0", "Player 0");
        request_seat_swap(&mut state, &alice, 2);
        assert!(state.swap_requests.is_empty());
    }
}
