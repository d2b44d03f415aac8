//! # Stockbook Store
//!
//! Persistence layer. Exposes the [`StoreGateway`] trait, a SQLite-backed
//! implementation for production, and an in-memory one for tests.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           stockbook-engine              │
//! │        (talks to the trait only)        │
//! └────────────────────┬────────────────────┘
//!                      │ StoreGateway
//!         ┌────────────┴────────────┐
//!         ▼                         ▼
//! ┌───────────────┐        ┌───────────────┐
//! │  SqliteStore  │        │  MemoryStore  │
//! │ (sqlx, WAL)   │        │ (tests, fault │
//! │               │        │  injection)   │
//! └───────────────┘        └───────────────┘
//! ```
//!
//! Every gateway call takes a [`UserContext`]; rows are scoped to that user
//! and a write against another user's row reports `NotFound`.

pub mod error;
pub mod gateway;
pub mod memory;
pub mod sqlite;

pub use error::{StoreError, StoreResult};
pub use gateway::{ProductOrder, SaleFilter, SaleOrder, StoreGateway, UserContext};
pub use memory::MemoryStore;
pub use sqlite::{SqliteConfig, SqliteStore};
