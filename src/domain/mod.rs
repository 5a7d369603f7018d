//! Core game entities and rules.
//!
//! Everything in this module is plain data and pure logic: no database,
//! no HTTP. Randomness is injected through `rand::Rng` so combat stays
//! testable.

mod attributes;
mod combat;
mod item;
mod living;
mod password;
mod room;
mod user;

pub use attributes::Attributes;
pub use combat::{attack, AttackOutcome};
pub use item::{DiceExpr, Item, ItemKind, ItemView, ParseDiceError, Slot};
pub use living::{Body, LifeState, Living, LivingKind, LivingView};
pub use password::Password;
pub use room::{MoveError, Room};
pub use user::{User, UserResponse, UserRole};
