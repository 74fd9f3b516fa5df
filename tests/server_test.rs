use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use grimoire_server::app;
use grimoire_server::models::game::{GamePhase, GameState};
use grimoire_server::state::AppState;
use grimoire_server::utils::test_setup::setup_test_env;

fn command_request(room_id: &str, actor: serde_json::Value, command: serde_json::Value) -> Request<Body> {
    let body = json!({ "actor": actor, "command": command });
    Request::builder()
        .method("POST")
        .uri(format!("/api/game/{room_id}/command"))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn storyteller() -> serde_json::Value {
    json!({"user_id": "st", "user_name": "Host", "is_storyteller": true})
}

async fn create_room(app: &axum::Router, seat_count: usize) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/room/create")
        .header("Content-Type", "application/json")
        .body(Body::from(json!({"seat_count": seat_count}).to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body_str = String::from_utf8(body.to_vec()).unwrap();
    body_str
        .replace("\"Room created with ID: ", "")
        .replace("\"", "")
}

async fn fetch_state(app: &axum::Router, room_id: &str, query: &str) -> GameState {
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/game/{room_id}/state{query}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_create_room() {
    setup_test_env();
    let app = app::create_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/room/create")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body_str = String::from_utf8(body.to_vec()).unwrap();
    assert!(body_str.contains("Room created with ID:"));
}

#[tokio::test]
async fn test_join_and_fetch_state() {
    setup_test_env();
    let app = app::create_app();
    let room_id = create_room(&app, 7).await;

    let join = command_request(
        &room_id,
        json!({"user_id": "u1", "user_name": "Alice"}),
        json!({"op": "join_seat", "seat_id": 0}),
    );
    let response = app.clone().oneshot(join).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let state = fetch_state(&app, &room_id, "?user_id=u1&user_name=Alice").await;
    assert_eq!(state.seats.len(), 7);
    assert_eq!(state.seats[0].user_id.as_deref(), Some("u1"));
}

#[tokio::test]
async fn test_role_secrecy_over_http() {
    setup_test_env();
    let app = app::create_app();
    let room_id = create_room(&app, 7).await;

    for i in 0..7 {
        let join = command_request(
            &room_id,
            json!({"user_id": format!("u{i}"), "user_name": format!("Player {i}")}),
            json!({"op": "join_seat", "seat_id": i}),
        );
        app.clone().oneshot(join).await.unwrap();
    }
    let assign = command_request(
        &room_id,
        storyteller(),
        json!({"op": "assign_role", "seat_id": 0, "role_id": "drunk"}),
    );
    app.clone().oneshot(assign).await.unwrap();

    // 本人: 見かけの役職だけが見える
    let own = fetch_state(&app, &room_id, "?user_id=u0").await;
    assert!(own.seats[0].real_role_id.is_none());
    let seen = own.seats[0].seen_role_id.clone().unwrap();
    assert_ne!(seen, "drunk");

    // 他人: 何も見えない
    let other = fetch_state(&app, &room_id, "?user_id=u1").await;
    assert!(other.seats[0].seen_role_id.is_none());

    // 説書人: すべて見える
    let st = fetch_state(&app, &room_id, "?user_id=st&storyteller=true").await;
    assert_eq!(st.seats[0].real_role_id.as_deref(), Some("drunk"));
}

#[tokio::test]
async fn test_voting_flow_over_http() {
    setup_test_env();
    let state = AppState::new();
    let app = app::create_app_with_state(state);
    let room_id = create_room(&app, 7).await;

    for i in 0..7 {
        let join = command_request(
            &room_id,
            json!({"user_id": format!("u{i}"), "user_name": format!("Player {i}")}),
            json!({"op": "join_seat", "seat_id": i}),
        );
        app.clone().oneshot(join).await.unwrap();
    }

    let start = command_request(
        &room_id,
        storyteller(),
        json!({"op": "start_vote", "nominator_seat_id": 0, "nominee_seat_id": 1}),
    );
    app.clone().oneshot(start).await.unwrap();

    // 4人が挙手（必要票数ちょうど）
    for i in 2..6 {
        let hand = command_request(
            &room_id,
            json!({"user_id": format!("u{i}"), "user_name": format!("Player {i}")}),
            json!({"op": "toggle_hand", "seat_id": i}),
        );
        app.clone().oneshot(hand).await.unwrap();
    }

    let close = command_request(&room_id, storyteller(), json!({"op": "close_vote"}));
    app.clone().oneshot(close).await.unwrap();

    let snapshot = fetch_state(&app, &room_id, "?user_id=st&storyteller=true").await;
    assert_eq!(snapshot.vote_history.len(), 1);
    assert_eq!(snapshot.vote_history[0].vote_count, 4);
    assert!(snapshot.voting.is_none());
}

#[tokio::test]
async fn test_demon_death_ends_game_over_http() {
    setup_test_env();
    let app = app::create_app();
    let room_id = create_room(&app, 7).await;

    for i in 0..7 {
        let join = command_request(
            &room_id,
            json!({"user_id": format!("u{i}"), "user_name": format!("Player {i}")}),
            json!({"op": "join_seat", "seat_id": i}),
        );
        app.clone().oneshot(join).await.unwrap();
    }
    let assign = command_request(
        &room_id,
        storyteller(),
        json!({"op": "assign_role", "seat_id": 0, "role_id": "imp"}),
    );
    app.clone().oneshot(assign).await.unwrap();

    let kill = command_request(&room_id, storyteller(), json!({"op": "toggle_dead", "seat_id": 0}));
    app.clone().oneshot(kill).await.unwrap();

    let snapshot = fetch_state(&app, &room_id, "?user_id=st&storyteller=true").await;
    assert!(snapshot.game_over.is_over);
    assert!(!snapshot.game_over.reason.is_empty());
}

#[tokio::test]
async fn test_phase_transitions_over_http() {
    setup_test_env();
    let app = app::create_app();
    let room_id = create_room(&app, 7).await;

    let night = command_request(
        &room_id,
        storyteller(),
        json!({"op": "set_phase", "phase": "NIGHT"}),
    );
    app.clone().oneshot(night).await.unwrap();

    let snapshot = fetch_state(&app, &room_id, "?user_id=st&storyteller=true").await;
    assert_eq!(snapshot.phase, GamePhase::Night);
    assert_eq!(snapshot.round_info.night_count, 1);

    // プレイヤーはフェーズを変えられない
    let illegal = command_request(
        &room_id,
        json!({"user_id": "u1", "user_name": "Alice"}),
        json!({"op": "set_phase", "phase": "DAY"}),
    );
    let response = app.clone().oneshot(illegal).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let snapshot = fetch_state(&app, &room_id, "?user_id=st&storyteller=true").await;
    assert_eq!(snapshot.phase, GamePhase::Night);
}
