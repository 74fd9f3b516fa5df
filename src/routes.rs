use crate::engine::Actor;
use crate::state::AppState;
use axum::Router;
use serde::Deserialize;

mod game;
mod room;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .nest("/api/room", room::routes(state.clone()))
        .nest("/api/game", game::routes(state.clone()))
}

/// 状態取得ルートの閲覧者。認証は外部の責務なので自己申告をそのまま使う
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ViewerQuery {
    user_id: Option<String>,
    user_name: Option<String>,
    #[serde(default)]
    storyteller: bool,
}

impl ViewerQuery {
    pub(crate) fn into_actor(self) -> Actor {
        Actor {
            user_id: self.user_id.unwrap_or_else(|| "anonymous".to_string()),
            user_name: self.user_name.unwrap_or_else(|| "Anonymous".to_string()),
            is_storyteller: self.storyteller,
        }
    }
}
