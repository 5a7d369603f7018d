//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{admin_handler, auth_handler, character_handler, game_handler};
use crate::domain::{AttackOutcome, Attributes, ItemView, LivingView, Room, Slot, UserResponse, UserRole};
use crate::services::{
    AttackReport, CharacterSheet, ExitView, NpcPresence, RoomView, TokenResponse,
};
use crate::types::MessageResponse;

/// OpenAPI documentation for the spacerpg API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "spacerpg",
        version = "0.1.0",
        description = "A multi-user text role-playing game served as a JSON API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // Character endpoints
        character_handler::create_character,
        character_handler::get_character,
        character_handler::get_inventory,
        character_handler::equip_item,
        // Game endpoints
        game_handler::look,
        game_handler::move_to,
        game_handler::attack,
        // Admin endpoints
        admin_handler::list_users,
        admin_handler::update_user_role,
        admin_handler::delete_user,
        admin_handler::list_rooms,
        admin_handler::create_room,
        admin_handler::update_room,
        admin_handler::delete_room,
        admin_handler::add_exit,
        admin_handler::remove_exit,
        admin_handler::spawn_npc,
        admin_handler::list_livings,
        admin_handler::update_living,
        admin_handler::delete_living,
        admin_handler::list_items,
        admin_handler::create_item,
        admin_handler::update_item,
        admin_handler::delete_item,
        admin_handler::give_item,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            Attributes,
            Slot,
            ItemView,
            LivingView,
            Room,
            AttackOutcome,
            // Service views
            CharacterSheet,
            RoomView,
            ExitView,
            NpcPresence,
            AttackReport,
            TokenResponse,
            MessageResponse,
            // Auth requests
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            // Character requests
            character_handler::CreateCharacterRequest,
            character_handler::EquipRequest,
            // Admin requests
            admin_handler::UpdateRoleRequest,
            admin_handler::CreateRoomRequest,
            admin_handler::UpdateRoomRequest,
            admin_handler::ExitRequest,
            admin_handler::SpawnNpcRequest,
            admin_handler::UpdateLivingRequest,
            admin_handler::CreateItemRequest,
            admin_handler::UpdateItemRequest,
            admin_handler::GiveItemRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Character", description = "Character sheet and inventory"),
        (name = "Game", description = "Moving through the world and fighting"),
        (name = "Admin", description = "World building and account maintenance")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
