//! Character and inventory handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::ItemView;
use crate::errors::AppResult;
use crate::services::CharacterSheet;

/// Character creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCharacterRequest {
    /// Character name
    #[validate(length(min = 3, max = 35, message = "Name must be 3 to 35 characters"))]
    #[schema(example = "Jax")]
    pub name: String,
    /// Character race; defaults to human
    #[schema(example = "human")]
    pub race: Option<String>,
}

/// Equip request; omitting item_id is a (refused) attempt to equip nothing
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EquipRequest {
    pub item_id: Option<Uuid>,
}

/// Create character and inventory routes (require authentication)
pub fn character_routes() -> Router<AppState> {
    Router::new()
        .route("/character", post(create_character).get(get_character))
        .route("/inventory", get(get_inventory))
        .route("/inventory/equip", post(equip_item))
}

/// Create the character for the authenticated user
#[utoipa::path(
    post,
    path = "/character",
    tag = "Character",
    request_body = CreateCharacterRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Character created", body = CharacterSheet),
        (status = 400, description = "Validation error or empty world"),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Character already exists")
    )
)]
pub async fn create_character(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateCharacterRequest>,
) -> AppResult<(StatusCode, Json<CharacterSheet>)> {
    let sheet = state
        .character_service
        .create_character(user.id, payload.name, payload.race)
        .await?;

    Ok((StatusCode::CREATED, Json(sheet)))
}

/// Get the authenticated user's character sheet
#[utoipa::path(
    get,
    path = "/character",
    tag = "Character",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Character sheet", body = CharacterSheet),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No character created yet")
    )
)]
pub async fn get_character(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<CharacterSheet>> {
    let sheet = state.character_service.sheet(user.id).await?;
    Ok(Json(sheet))
}

/// List the items the character carries
#[utoipa::path(
    get,
    path = "/inventory",
    tag = "Character",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Carried items", body = [ItemView]),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No character created yet")
    )
)]
pub async fn get_inventory(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<ItemView>>> {
    let items = state.character_service.inventory(user.id).await?;
    Ok(Json(items))
}

/// Equip a carried item
#[utoipa::path(
    post,
    path = "/inventory/equip",
    tag = "Character",
    request_body = EquipRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Item equipped", body = CharacterSheet),
        (status = 400, description = "Item not carried, or nothing to equip"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No character created yet")
    )
)]
pub async fn equip_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<EquipRequest>,
) -> AppResult<Json<CharacterSheet>> {
    let sheet = state
        .character_service
        .equip(user.id, payload.item_id)
        .await?;
    Ok(Json(sheet))
}
