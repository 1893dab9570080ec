//! SQL schema for the Campus SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    email       TEXT NOT NULL UNIQUE,
    token_hash  TEXT NOT NULL UNIQUE,   -- hex SHA-256 of the bearer token
    created_at  TEXT NOT NULL
);

-- One row per record in every collection. The record body is stored as JSON;
-- references between records are checked by the store before each write.
CREATE TABLE IF NOT EXISTS documents (
    id          TEXT PRIMARY KEY,
    collection  TEXT NOT NULL,          -- 'houses' | 'schools' | 'surveys' | 'responses'
    owner       TEXT NOT NULL REFERENCES users(user_id),
    body_json   TEXT NOT NULL,
    created_at  TEXT NOT NULL,          -- RFC 3339 UTC; server-assigned
    updated_at  TEXT NOT NULL           -- RFC 3339 UTC; bumped on every write
);

CREATE INDEX IF NOT EXISTS documents_collection_idx ON documents(collection);
CREATE INDEX IF NOT EXISTS documents_owner_idx      ON documents(owner);

PRAGMA user_version = 1;
";
