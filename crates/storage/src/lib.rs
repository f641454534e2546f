#![forbid(unsafe_code)]

//! Durable storage for accounts: repository traits, an in-memory
//! implementation for tests, and the SQLite backend.
//!
//! The durable layout is two tables: `accounts` (the full directory keyed by
//! username) and `active_account` (the single mirrored record for the
//! session that survives restarts).

pub mod repository;
pub mod sqlite;

pub use repository::{
    AccountRecord, AccountRepository, ActiveAccountRepository, InMemoryRepository, Storage,
    StorageError,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
