//! Infrastructure concerns: database access and repositories.

pub mod db;
pub mod repositories;
mod unit_of_work;

pub use db::Database;
pub use repositories::{ItemRepository, LivingRepository, RoomRepository, UserRepository};
pub use unit_of_work::{Persistence, UnitOfWork};
