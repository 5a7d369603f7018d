//! Application state - Dependency injection container.
//!
//! Holds one trait object per service plus the database handle the
//! health check pings. Handlers reach everything through this state.

use std::sync::Arc;

use crate::infra::Database;
use crate::services::{
    AdminService, AuthService, CharacterService, GameService, ServiceContainer, Services,
};

/// Application state shared by every route.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Character service
    pub character_service: Arc<dyn CharacterService>,
    /// Game service
    pub game_service: Arc<dyn GameService>,
    /// Admin service
    pub admin_service: Arc<dyn AdminService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the live services over the database connection.
    pub fn from_config(database: Arc<Database>, config: crate::config::Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);

        Self {
            auth_service: container.auth(),
            character_service: container.characters(),
            game_service: container.game(),
            admin_service: container.admin(),
            database,
        }
    }
}
