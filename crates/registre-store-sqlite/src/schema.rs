//! SQL schema for the Registre SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout version.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- AUTOINCREMENT keeps ids from ever being reused after a delete.
CREATE TABLE IF NOT EXISTS users (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    username   TEXT    NOT NULL UNIQUE,  -- always lower-cased by the service
    birthdate  TEXT    NOT NULL,         -- ISO 8601 calendar date
    country    TEXT    NOT NULL,
    phone      TEXT,
    gender     TEXT,
    email      TEXT
);

PRAGMA user_version = 1;
";
