//! Service container: centralized access to all application services.

use std::sync::Arc;

use super::{AdminService, AuthService, CharacterService, GameService};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get character service
    fn characters(&self) -> Arc<dyn CharacterService>;

    /// Get game service
    fn game(&self) -> Arc<dyn GameService>;

    /// Get admin service
    fn admin(&self) -> Arc<dyn AdminService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    character_service: Arc<dyn CharacterService>,
    game_service: Arc<dyn GameService>,
    admin_service: Arc<dyn AdminService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        character_service: Arc<dyn CharacterService>,
        game_service: Arc<dyn GameService>,
        admin_service: Arc<dyn AdminService>,
    ) -> Self {
        Self {
            auth_service,
            character_service,
            game_service,
            admin_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        use super::{AdminManager, Authenticator, CharacterManager, GameManager};

        let uow = Arc::new(Persistence::new(db));
        let auth_service = Arc::new(Authenticator::new(uow.clone(), config));
        let character_service = Arc::new(CharacterManager::new(uow.clone()));
        let game_service = Arc::new(GameManager::new(uow.clone()));
        let admin_service = Arc::new(AdminManager::new(uow));

        Self {
            auth_service,
            character_service,
            game_service,
            admin_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn characters(&self) -> Arc<dyn CharacterService> {
        self.character_service.clone()
    }

    fn game(&self) -> Arc<dyn GameService> {
        self.game_service.clone()
    }

    fn admin(&self) -> Arc<dyn AdminService> {
        self.admin_service.clone()
    }
}
