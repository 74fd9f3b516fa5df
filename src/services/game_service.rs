use crate::engine::{view, Actor, Command};
use crate::models::game::{ChainReactionEvent, GameState};
use crate::state::AppState;

/// すべてのゲーム操作の入口。エンジンにコマンドを適用し、変更を部屋へ通知する
pub async fn apply_command(
    state: AppState,
    room_id: &str,
    actor: &Actor,
    command: Command,
) -> Result<Vec<ChainReactionEvent>, String> {
    let events = {
        let mut games = state.games.lock().await;
        let Some(game) = games.get_mut(room_id) else {
            return Err("Game not found".to_string());
        };
        state
            .engine
            .apply(game, actor, command)
            .map_err(|e| e.to_string())?
    };

    state.broadcast_state_changed(room_id).await;
    state.broadcast_chain_events(room_id, &events).await;
    Ok(events)
}

pub async fn get_game_state(
    state: &AppState,
    room_id: &str,
    viewer: &Actor,
) -> Result<GameState, String> {
    let games = state.games.lock().await;
    if let Some(game) = games.get(room_id) {
        Ok(view::filter_state_for_viewer(game, viewer))
    } else {
        Err("Game not found".to_string())
    }
}
