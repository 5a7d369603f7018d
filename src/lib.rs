//! spacerpg - a multi-user text role-playing game served as a JSON API.
//!
//! Users register an account, create a character, walk a graph of rooms,
//! fight the NPCs they find there and manage their inventory. All state is
//! persisted through SeaORM; the HTTP surface is an Axum application with
//! token-based authentication and an admin surface over the game records.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core game entities and rules (combat, movement, regeneration)
//! - **services**: Application use cases and business logic
//! - **infra**: Infrastructure concerns (database, repositories)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Seed the starting world
//! cargo run -- seed
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Living, Password, User, UserRole};
pub use errors::{AppError, AppResult};
