//! SQLite backend for the Duet answer log.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod log;
mod schema;

pub mod error;

pub use error::{Error, Result};
pub use log::SqliteLog;

#[cfg(test)]
mod tests;
