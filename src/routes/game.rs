use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::engine::{Actor, Command};
use crate::routes::ViewerQuery;
use crate::services::game_service;
use crate::state::AppState;

/// すべてのゲーム操作はコマンドとして一本のルートに入る
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub actor: Actor,
    pub command: Command,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .nest(
            "/:roomid",
            Router::new()
                // コマンド適用。戻り値は保留になった連鎖イベント
                // curl -X POST http://localhost:8080/api/game/{roomid}/command -H 'Content-Type: application/json' \
                //   -d '{"actor": {"user_id": "u1", "user_name": "Alice"}, "command": {"op": "join_seat", "seat_id": 0}}'
                .route("/command", post(apply_command_handler))
                // 閲覧者でフィルタした状態取得
                // curl 'http://localhost:8080/api/game/{roomid}/state?user_id=u1'
                .route("/state", get(get_game_state)),
        )
        .with_state(state)
}

async fn apply_command_handler(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(request): Json<CommandRequest>,
) -> impl IntoResponse {
    match game_service::apply_command(state, &room_id, &request.actor, request.command).await {
        Ok(events) => (StatusCode::OK, Json(events)).into_response(),
        Err(message) if message == "Game not found" => {
            (StatusCode::NOT_FOUND, Json(message)).into_response()
        }
        Err(message) => (StatusCode::BAD_REQUEST, Json(message)).into_response(),
    }
}

async fn get_game_state(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Query(viewer): Query<ViewerQuery>,
) -> impl IntoResponse {
    match game_service::get_game_state(&state, &room_id, &viewer.into_actor()).await {
        Ok(game) => (StatusCode::OK, Json(game)).into_response(),
        Err(message) => (StatusCode::NOT_FOUND, Json(message)).into_response(),
    }
}
