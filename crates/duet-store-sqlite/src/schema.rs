//! SQL schema for the Duet SQLite log.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per log line, header included. Rows carry no key of their own;
-- `seq` only preserves append order.
-- The only DELETE ever issued is the full reset in `clear_and_reset`.
CREATE TABLE IF NOT EXISTS log_rows (
    seq          INTEGER PRIMARY KEY AUTOINCREMENT,
    cells_json   TEXT NOT NULL,   -- JSON array of strings
    appended_at  TEXT NOT NULL    -- ISO 8601 UTC; assigned on append
);

PRAGMA user_version = 1;
";
