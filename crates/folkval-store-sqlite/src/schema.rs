//! SQL schema for the Folkval SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// No CHECK constraint guards the counters: the historical vote-recording
/// behavior (see `SqliteStore::record_vote_legacy`) can drive a counter
/// below zero, and the schema must admit that state.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS propositions (
    id        INTEGER PRIMARY KEY,
    updated   INTEGER NOT NULL,    -- Unix seconds of last database update
    upvotes   INTEGER NOT NULL DEFAULT 0,
    downvotes INTEGER NOT NULL DEFAULT 0,
    title     TEXT NOT NULL,
    url       TEXT NOT NULL,
    pub_date  TEXT NOT NULL        -- ISO 8601 date (YYYY-MM-DD)
);

-- The vote ledger: at most one row per (proposition, user) pair. Duplicate
-- voting is detected through this constraint, not through a pre-check.
CREATE TABLE IF NOT EXISTS votes (
    proposition_id INTEGER NOT NULL REFERENCES propositions(id),
    user_id        INTEGER NOT NULL,
    vote           INTEGER NOT NULL,   -- +1 or -1
    timestamp      INTEGER NOT NULL,   -- Unix seconds of last change
    UNIQUE (proposition_id, user_id)
);

CREATE INDEX IF NOT EXISTS votes_proposition_idx ON votes(proposition_id);

PRAGMA user_version = 1;
";
