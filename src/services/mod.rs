//! Business logic layer.
//!
//! Services orchestrate domain operations through the Unit of Work and are
//! exposed to the API layer as trait objects.

mod admin_service;
mod auth_service;
mod character_service;
mod container;
mod game_service;

pub use admin_service::{AdminManager, AdminService};
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use character_service::{CharacterManager, CharacterService, CharacterSheet};
pub use container::{ServiceContainer, Services};
pub use game_service::{AttackReport, ExitView, GameManager, GameService, NpcPresence, RoomView};

/// Shared fixtures for service unit tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::infra::repositories::{
        MockItemRepository, MockLivingRepository, MockRoomRepository, MockUserRepository,
    };
    use crate::infra::{
        ItemRepository, LivingRepository, RoomRepository, UnitOfWork, UserRepository,
    };

    /// UnitOfWork over mock repositories; tests populate only what they use.
    pub(crate) struct MockUow {
        pub users: Arc<MockUserRepository>,
        pub livings: Arc<MockLivingRepository>,
        pub items: Arc<MockItemRepository>,
        pub rooms: Arc<MockRoomRepository>,
    }

    impl MockUow {
        pub fn new() -> Self {
            Self {
                users: Arc::new(MockUserRepository::new()),
                livings: Arc::new(MockLivingRepository::new()),
                items: Arc::new(MockItemRepository::new()),
                rooms: Arc::new(MockRoomRepository::new()),
            }
        }
    }

    impl UnitOfWork for MockUow {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.users.clone()
        }

        fn livings(&self) -> Arc<dyn LivingRepository> {
            self.livings.clone()
        }

        fn items(&self) -> Arc<dyn ItemRepository> {
            self.items.clone()
        }

        fn rooms(&self) -> Arc<dyn RoomRepository> {
            self.rooms.clone()
        }
    }
}
