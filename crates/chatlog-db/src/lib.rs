//! # chatlog-db
//!
//! Database layer implementing the ledger store with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides the PostgreSQL implementation of the `Store` and
//! `UnitOfWork` ports defined in `chatlog-core`. It handles:
//!
//! - Connection pool management
//! - Schema migrations (`migrations/`)
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - One transaction per unit of work
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chatlog_db::{create_pool, PgStore, PoolConfig};
//! use chatlog_core::traits::Store;
//!
//! async fn example(config: &PoolConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PgStore::new(create_pool(config).await?);
//!     store.migrate().await?;
//!
//!     let mut uow = store.begin().await?;
//!     // Use the repositories on `uow`...
//!     uow.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, PgPool, PoolConfig};
pub use repositories::{PgStore, PgUnitOfWork};
