//! SQL schema for the sift SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Rows are never deleted; `deleted` is the soft-delete flag.
-- AUTOINCREMENT keeps identifiers strictly increasing.
CREATE TABLE IF NOT EXISTS candidates (
    candidate_id INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id  TEXT,
    text         TEXT NOT NULL,
    search_term  TEXT,
    deleted      INTEGER NOT NULL DEFAULT 0,
    ingested_at  TEXT NOT NULL
);

-- Judgments are strictly append-only.
CREATE TABLE IF NOT EXISTS judgments (
    judgment_id    TEXT PRIMARY KEY,
    candidate_id   INTEGER NOT NULL REFERENCES candidates(candidate_id),
    annotator_id   INTEGER NOT NULL,
    is_hate_speech INTEGER NOT NULL,
    main_category  TEXT NOT NULL,
    sub_category   TEXT,
    sentiment      TEXT,
    status         TEXT NOT NULL,   -- 'classified' | 'not_classifiable' | 'deleted'
    recorded_at    TEXT NOT NULL,   -- RFC 3339 UTC; server-assigned
    CHECK (sub_category IS NULL OR sentiment IS NULL)
);

CREATE TABLE IF NOT EXISTS annotators (
    annotator_id  INTEGER PRIMARY KEY,
    password_hash TEXT NOT NULL,    -- argon2 PHC string
    created_at    TEXT NOT NULL
);

-- One live judgment per (candidate, annotator).
CREATE UNIQUE INDEX IF NOT EXISTS judgments_live_pair_idx
    ON judgments(candidate_id, annotator_id) WHERE status != 'deleted';
CREATE INDEX IF NOT EXISTS judgments_annotator_idx
    ON judgments(annotator_id, candidate_id);
CREATE INDEX IF NOT EXISTS candidates_live_idx
    ON candidates(deleted, candidate_id);

PRAGMA user_version = 1;
";
