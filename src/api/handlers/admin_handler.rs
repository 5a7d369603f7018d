//! Admin handlers: user maintenance and world building.
//!
//! Every handler checks the admin role of the authenticated user before
//! touching the service layer.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{Attributes, ItemView, LivingView, Room, UserResponse};
use crate::errors::AppResult;
use crate::types::{MessageResponse, NoContent, Paginated, PaginationParams};

/// Role change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleRequest {
    /// New role, `user` or `admin`
    #[schema(example = "admin")]
    pub role: String,
}

/// Room creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Docking Bay")]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    #[schema(example = "Rows of battered shuttles under flickering lights.")]
    pub description: String,
    /// Room category; `start` marks the spawn room
    #[schema(example = "start")]
    pub kind: Option<String>,
}

/// Room update request; absent fields keep their value
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoomRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
}

/// Exit management request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ExitRequest {
    pub from_room_id: Uuid,
    pub to_room_id: Uuid,
    /// Also manage the return exit
    #[serde(default)]
    pub two_way: bool,
}

/// NPC creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SpawnNpcRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Maintenance Drone")]
    pub name: String,
    #[schema(example = "android")]
    pub race: String,
    #[validate(range(min = 0, message = "strength must not be negative"))]
    pub strength: i32,
    #[validate(range(min = 0, message = "dexterity must not be negative"))]
    pub dexterity: i32,
    #[validate(range(min = 0, message = "intelligence must not be negative"))]
    pub intelligence: i32,
    #[validate(range(min = 1, message = "hps must be positive"))]
    pub hps: i32,
    pub room_id: Uuid,
}

/// Living update request; absent fields keep their value
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLivingRequest {
    /// New hit points, clamped to the maximum
    pub hps: Option<i32>,
    pub credits: Option<i64>,
    /// Teleport the living to this room
    pub room_id: Option<Uuid>,
}

/// Item creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Rusty Blaster")]
    pub name: String,
    /// Trade value in credits
    #[validate(range(min = 0, message = "value must not be negative"))]
    pub value: i64,
    /// Body slot: weapon, head, chest, legs, feet or hands
    #[schema(example = "weapon")]
    pub slot: String,
    /// Item kind: weapon, armor or trinket
    #[schema(example = "weapon")]
    pub kind: String,
    /// Damage dice, weapons only
    #[schema(example = "2d6")]
    pub damage_dice: Option<String>,
    /// Armor class, armor only
    pub armor_class: Option<i32>,
}

/// Item update request; absent fields keep their value
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub value: Option<i64>,
}

/// Ownership transfer request; omitting owner_id takes the item away
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GiveItemRequest {
    pub owner_id: Option<Uuid>,
}

/// Create admin routes (require authentication, enforce admin role)
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id/role", put(update_user_role))
        .route("/users/:id", delete(delete_user))
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/:id", put(update_room).delete(delete_room))
        .route("/rooms/exits", post(add_exit).delete(remove_exit))
        .route("/npcs", post(spawn_npc))
        .route("/livings", get(list_livings))
        .route("/livings/:id", put(update_living).delete(delete_living))
        .route("/items", get(list_items).post(create_item))
        .route("/items/:id", put(update_item).delete(delete_item))
        .route("/items/:id/give", post(give_item))
}

/// List user accounts
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated user list"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    require_admin(&user)?;
    let (users, total) = state.admin_service.list_users(&params).await?;
    let users = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(Paginated::new(users, params.page, params.limit(), total)))
}

/// Change a user's role
#[utoipa::path(
    put,
    path = "/admin/users/{id}/role",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = UserResponse),
        (status = 400, description = "Unknown role"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "No such user")
    )
)]
pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateRoleRequest>,
) -> AppResult<Json<UserResponse>> {
    require_admin(&user)?;
    let updated = state.admin_service.update_user_role(id, payload.role).await?;
    Ok(Json(UserResponse::from(updated)))
}

/// Delete a user account and their character
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "No such user")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_admin(&user)?;
    state.admin_service.delete_user(id).await?;
    Ok(NoContent)
}

/// List rooms
#[utoipa::path(
    get,
    path = "/admin/rooms",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated room list"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Room>>> {
    require_admin(&user)?;
    let (rooms, total) = state.admin_service.list_rooms(&params).await?;
    Ok(Json(Paginated::new(rooms, params.page, params.limit(), total)))
}

/// Create a room
#[utoipa::path(
    post,
    path = "/admin/rooms",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created", body = Room),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_room(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateRoomRequest>,
) -> AppResult<(StatusCode, Json<Room>)> {
    require_admin(&user)?;
    let room = state
        .admin_service
        .create_room(
            payload.name,
            payload.description,
            payload.kind.unwrap_or_else(|| "generic".to_string()),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// Update a room
#[utoipa::path(
    put,
    path = "/admin/rooms/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Room id")),
    request_body = UpdateRoomRequest,
    responses(
        (status = 200, description = "Room updated", body = Room),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "No such room")
    )
)]
pub async fn update_room(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateRoomRequest>,
) -> AppResult<Json<Room>> {
    require_admin(&user)?;
    let room = state
        .admin_service
        .update_room(id, payload.name, payload.description, payload.kind)
        .await?;
    Ok(Json(room))
}

/// Delete an empty room
#[utoipa::path(
    delete,
    path = "/admin/rooms/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Room id")),
    responses(
        (status = 204, description = "Room deleted"),
        (status = 400, description = "Room is occupied"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "No such room")
    )
)]
pub async fn delete_room(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_admin(&user)?;
    state.admin_service.delete_room(id).await?;
    Ok(NoContent)
}

/// Connect two rooms
#[utoipa::path(
    post,
    path = "/admin/rooms/exits",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = ExitRequest,
    responses(
        (status = 200, description = "Exit added", body = MessageResponse),
        (status = 400, description = "Invalid exit"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "No such room")
    )
)]
pub async fn add_exit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ExitRequest>,
) -> AppResult<Json<MessageResponse>> {
    require_admin(&user)?;
    state
        .admin_service
        .link_rooms(payload.from_room_id, payload.to_room_id, payload.two_way)
        .await?;
    Ok(Json(MessageResponse::new("exit added")))
}

/// Disconnect two rooms
#[utoipa::path(
    delete,
    path = "/admin/rooms/exits",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = ExitRequest,
    responses(
        (status = 200, description = "Exit removed", body = MessageResponse),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn remove_exit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ExitRequest>,
) -> AppResult<Json<MessageResponse>> {
    require_admin(&user)?;
    state
        .admin_service
        .unlink_rooms(payload.from_room_id, payload.to_room_id, payload.two_way)
        .await?;
    Ok(Json(MessageResponse::new("exit removed")))
}

/// Spawn an NPC into a room
#[utoipa::path(
    post,
    path = "/admin/npcs",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = SpawnNpcRequest,
    responses(
        (status = 201, description = "NPC spawned", body = LivingView),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "No such room")
    )
)]
pub async fn spawn_npc(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<SpawnNpcRequest>,
) -> AppResult<(StatusCode, Json<LivingView>)> {
    require_admin(&user)?;
    let npc = state
        .admin_service
        .spawn_npc(
            payload.name,
            payload.race,
            Attributes::new(payload.strength, payload.dexterity, payload.intelligence),
            payload.hps,
            payload.room_id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(npc)))
}

/// List characters and NPCs
#[utoipa::path(
    get,
    path = "/admin/livings",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated living list"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_livings(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<LivingView>>> {
    require_admin(&user)?;
    let (livings, total) = state.admin_service.list_livings(&params).await?;
    Ok(Json(Paginated::new(
        livings,
        params.page,
        params.limit(),
        total,
    )))
}

/// Update a living's hit points, credits or location
#[utoipa::path(
    put,
    path = "/admin/livings/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Living id")),
    request_body = UpdateLivingRequest,
    responses(
        (status = 200, description = "Living updated", body = LivingView),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "No such living")
    )
)]
pub async fn update_living(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateLivingRequest>,
) -> AppResult<Json<LivingView>> {
    require_admin(&user)?;
    let living = state
        .admin_service
        .update_living(id, payload.hps, payload.credits, payload.room_id)
        .await?;
    Ok(Json(living))
}

/// Remove a living from the world
#[utoipa::path(
    delete,
    path = "/admin/livings/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Living id")),
    responses(
        (status = 204, description = "Living removed"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "No such living")
    )
)]
pub async fn delete_living(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_admin(&user)?;
    state.admin_service.delete_living(id).await?;
    Ok(NoContent)
}

/// List items
#[utoipa::path(
    get,
    path = "/admin/items",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated item list"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<ItemView>>> {
    require_admin(&user)?;
    let (items, total) = state.admin_service.list_items(&params).await?;
    Ok(Json(Paginated::new(items, params.page, params.limit(), total)))
}

/// Create an item
#[utoipa::path(
    post,
    path = "/admin/items",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemView),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<ItemView>)> {
    require_admin(&user)?;
    let item = state
        .admin_service
        .create_item(
            payload.name,
            payload.value,
            payload.slot,
            payload.kind,
            payload.damage_dice,
            payload.armor_class,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Rename or reprice an item
#[utoipa::path(
    put,
    path = "/admin/items/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Item id")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ItemView),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "No such item")
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateItemRequest>,
) -> AppResult<Json<ItemView>> {
    require_admin(&user)?;
    let item = state
        .admin_service
        .update_item(id, payload.name, payload.value)
        .await?;
    Ok(Json(item))
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/admin/items/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Item id")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "No such item")
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_admin(&user)?;
    state.admin_service.delete_item(id).await?;
    Ok(NoContent)
}

/// Hand an item to a living, or confiscate it
#[utoipa::path(
    post,
    path = "/admin/items/{id}/give",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Item id")),
    request_body = GiveItemRequest,
    responses(
        (status = 200, description = "Ownership updated", body = ItemView),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "No such item or living")
    )
)]
pub async fn give_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<GiveItemRequest>,
) -> AppResult<Json<ItemView>> {
    require_admin(&user)?;
    let item = state.admin_service.give_item(id, payload.owner_id).await?;
    Ok(Json(item))
}
