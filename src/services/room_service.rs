use serde::{Deserialize, Serialize};

use crate::engine::{view, Actor};
use crate::models::game::GameState;
use crate::state::AppState;

/// ルーム一覧用の要約。座席の中身は出さない
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummary {
    pub room_id: String,
    pub seat_count: usize,
    pub occupied_count: usize,
    pub phase: String,
    pub is_over: bool,
}

impl RoomSummary {
    fn of(game: &GameState) -> Self {
        RoomSummary {
            room_id: game.room_id.clone(),
            seat_count: game.seats.len(),
            occupied_count: game.seats.iter().filter(|s| s.is_occupied()).count(),
            phase: game.phase.to_string(),
            is_over: game.game_over.is_over,
        }
    }
}

pub async fn create_room(state: AppState, seat_count: usize) -> String {
    let mut games = state.games.lock().await;
    let new_id = games
        .keys()
        .filter_map(|k| k.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
        + 1;
    let room_id = new_id.to_string();
    let game = state.engine.create_game(&room_id, seat_count);
    games.insert(room_id.clone(), game);
    room_id
}

pub async fn get_rooms(state: &AppState) -> Vec<RoomSummary> {
    let games = state.games.lock().await;
    let mut rooms: Vec<RoomSummary> = games.values().map(RoomSummary::of).collect();
    rooms.sort_by_key(|r| r.room_id.parse::<u32>().unwrap_or(u32::MAX));
    rooms
}

/// 閲覧者の立場でフィルタした状態を返す
pub async fn get_room_info(
    state: &AppState,
    room_id: &str,
    viewer: &Actor,
) -> Result<GameState, String> {
    let games = state.games.lock().await;
    if let Some(game) = games.get(room_id) {
        Ok(view::filter_state_for_viewer(game, viewer))
    } else {
        Err("Room not found".to_string())
    }
}

pub async fn delete_room(state: AppState, room_id: &str) -> bool {
    let removed = state.games.lock().await.remove(room_id).is_some();
    if removed {
        state.channel.lock().await.remove(room_id);
    }
    removed
}
