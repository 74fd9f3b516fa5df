use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::models::config::MIN_SEATS;
use crate::routes::ViewerQuery;
use crate::{services::room_service, state::AppState, utils::websocket};

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub seat_count: usize,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        // ルーム作成
        // curl -X POST http://localhost:8080/api/room/create -H 'Content-Type: application/json' -d '{"seat_count": 10}'
        .route("/create", post(create_room))
        // ルーム一覧取得
        // curl http://localhost:8080/api/room/rooms
        .route("/rooms", get(get_rooms))
        // 特定のルーム情報取得（閲覧者でフィルタ）
        // curl 'http://localhost:8080/api/room/{roomid}?user_id=u1'
        .route("/:roomid", get(get_room_info))
        // ルーム削除
        // curl -X DELETE http://localhost:8080/api/room/{roomid}/delete
        .route("/:roomid/delete", delete(delete_room))
        // WebSocket接続
        // websocat ws://localhost:8080/api/room/{roomid}/ws
        .route("/:roomid/ws", get(websocket::handler))
        .with_state(state)
}

pub async fn create_room(
    State(state): State<AppState>,
    body: Option<Json<CreateRoomRequest>>,
) -> impl IntoResponse {
    let seat_count = body.map(|Json(req)| req.seat_count).unwrap_or(MIN_SEATS);
    let room_id = room_service::create_room(state, seat_count).await;
    (
        StatusCode::OK,
        Json(format!("Room created with ID: {}", room_id)),
    )
}

async fn get_rooms(State(state): State<AppState>) -> impl IntoResponse {
    let rooms = room_service::get_rooms(&state).await;
    (StatusCode::OK, Json(rooms))
}

async fn get_room_info(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Query(viewer): Query<ViewerQuery>,
) -> impl IntoResponse {
    match room_service::get_room_info(&state, &room_id, &viewer.into_actor()).await {
        Ok(game) => (StatusCode::OK, Json(game)).into_response(),
        Err(message) => (StatusCode::NOT_FOUND, Json(message)).into_response(),
    }
}

async fn delete_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    let success = room_service::delete_room(state, &room_id).await;
    if success {
        (
            StatusCode::OK,
            Json(format!("Room {} deleted successfully", room_id)),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(format!("Failed to delete room {}", room_id)),
        )
    }
}
