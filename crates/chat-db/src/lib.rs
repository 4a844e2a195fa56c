//! # chat-db
//!
//! Storage layer implementing the `chat-core` collaborator traits.
//!
//! ## Overview
//!
//! - Connection pool management and migrations (PostgreSQL via SQLx)
//! - Database models with SQLx `FromRow` derives
//! - Model -> entity mappers
//! - PostgreSQL repositories for sessions and messages
//! - In-memory repositories for local runs and tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chat_db::{create_pool, run_migrations, DatabaseConfig, PgSessionRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let sessions = PgSessionRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{seed_demo, DemoSeed, InMemoryMessageRepository, InMemorySessionStore};
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgMessageRepository, PgSessionRepository};
