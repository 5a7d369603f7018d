//! World interaction handlers: looking, moving and fighting.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::{AttackReport, RoomView};

/// Create game routes (require authentication)
pub fn game_routes() -> Router<AppState> {
    Router::new()
        .route("/room", get(look))
        .route("/move/:room_id", post(move_to))
        .route("/attack/:npc_id", post(attack))
}

/// Describe the room the character stands in
#[utoipa::path(
    get,
    path = "/room",
    tag = "Game",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Room description", body = RoomView),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No character created yet")
    )
)]
pub async fn look(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<RoomView>> {
    let view = state.game_service.look(user.id).await?;
    Ok(Json(view))
}

/// Move through an exit into an adjacent room
#[utoipa::path(
    post,
    path = "/move/{room_id}",
    tag = "Game",
    security(("bearer_auth" = [])),
    params(("room_id" = Uuid, Path, description = "Destination room id")),
    responses(
        (status = 200, description = "Moved; the new room is described", body = RoomView),
        (status = 400, description = "Destination is not adjacent"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No character or no such room")
    )
)]
pub async fn move_to(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(room_id): Path<Uuid>,
) -> AppResult<Json<RoomView>> {
    let view = state.game_service.move_to(user.id, room_id).await?;
    Ok(Json(view))
}

/// Attack an NPC in the same room
#[utoipa::path(
    post,
    path = "/attack/{npc_id}",
    tag = "Game",
    security(("bearer_auth" = [])),
    params(("npc_id" = Uuid, Path, description = "Target NPC id")),
    responses(
        (status = 200, description = "Attack resolved", body = AttackReport),
        (status = 400, description = "No such target here"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No character or no such NPC")
    )
)]
pub async fn attack(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(npc_id): Path<Uuid>,
) -> AppResult<Json<AttackReport>> {
    let report = state.game_service.attack(user.id, npc_id).await?;
    Ok(Json(report))
}
