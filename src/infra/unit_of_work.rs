//! Central access point to all repositories.
//!
//! Every game action runs inside a single request: read entity state,
//! mutate it through the domain, persist, return. Each repository call
//! commits on its own; there is no overlapping mutation of one entity
//! within a request, so no explicit locking is carried here.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{
    ItemRepository, ItemStore, LivingRepository, LivingStore, RoomRepository, RoomStore,
    UserRepository, UserStore,
};

/// Repository access for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get living (character/NPC) repository
    fn livings(&self) -> Arc<dyn LivingRepository>;

    /// Get item repository
    fn items(&self) -> Arc<dyn ItemRepository>;

    /// Get room repository
    fn rooms(&self) -> Arc<dyn RoomRepository>;
}

/// Concrete implementation of [`UnitOfWork`] over one database connection.
pub struct Persistence {
    user_repo: Arc<UserStore>,
    living_repo: Arc<LivingStore>,
    item_repo: Arc<ItemStore>,
    room_repo: Arc<RoomStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            living_repo: Arc::new(LivingStore::new(db.clone())),
            item_repo: Arc::new(ItemStore::new(db.clone())),
            room_repo: Arc::new(RoomStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn livings(&self) -> Arc<dyn LivingRepository> {
        self.living_repo.clone()
    }

    fn items(&self) -> Arc<dyn ItemRepository> {
        self.item_repo.clone()
    }

    fn rooms(&self) -> Arc<dyn RoomRepository> {
        self.room_repo.clone()
    }
}
