//! Entity, validation and persistence layer for dnscontroller.
//!
//! This crate owns the three stored entities and everything needed to move
//! them between their API shape and their persisted shape:
//!
//! - **Type registry** ([`RecordType`]): the closed set of supported
//!   record types, shared by record and answer validation.
//!
//! - **Entities** ([`Record`], [`Answer`], [`Detail`]): API-facing values
//!   with `validate()`, `to_persisted()` / `from_persisted()` and async
//!   lifecycle operations (`find`, `create`, `create_or_find` /
//!   `find_or_create`, `delete`).
//!
//! - **Store** ([`store::Store`], [`store::Database`]): row-level
//!   primitives over the `records`, `answers` and `answer_details` tables,
//!   with a SQLite implementation and scoped transactions.
//!
//! - **[`OpContext`]**: the store handle and tracing span every operation
//!   runs with.

pub mod context;
pub mod convert;
pub mod error;
pub mod model;
mod ops;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use context::OpContext;
pub use error::{CoreError, StoreError, ValidationError};
pub use model::{Answer, Detail, Record, RecordType, parse_answers};
pub use store::{Database, SqliteStore, Store, Transaction};
