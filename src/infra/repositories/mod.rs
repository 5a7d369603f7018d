//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod entities;
mod item_repository;
mod living_repository;
mod room_repository;
mod user_repository;

pub use item_repository::{ItemRepository, ItemStore};
pub use living_repository::{LivingRepository, LivingStore};
pub use room_repository::{RoomRepository, RoomStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for unit tests
#[cfg(test)]
pub use item_repository::MockItemRepository;
#[cfg(test)]
pub use living_repository::MockLivingRepository;
#[cfg(test)]
pub use room_repository::MockRoomRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
