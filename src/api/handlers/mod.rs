//! HTTP request handlers.

pub mod admin_handler;
pub mod auth_handler;
pub mod character_handler;
pub mod game_handler;

pub use admin_handler::admin_routes;
pub use auth_handler::auth_routes;
pub use character_handler::character_routes;
pub use game_handler::game_routes;
