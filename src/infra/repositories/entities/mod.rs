//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod item;
pub mod living;
pub mod room;
pub mod room_exit;
pub mod user;
