//! Database layer for the Stand With Crypto backend.
//!
//! Provides SQLite storage for users, addresses, user actions, NFT mints and
//! candidate matches, with embedded migrations.

pub mod error;
pub mod models;
pub mod pool;
pub mod queries;

pub use error::{DbError, DbResult};
pub use pool::DbPool;
