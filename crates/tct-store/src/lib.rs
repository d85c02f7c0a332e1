//! History store for completed three-chamber sessions.
//!
//! Persists one [`SessionRecord`] per scored session using `rusqlite`. The
//! core never touches storage; the CLI hands completed records in and reads
//! them back out.
//!
//! # Thread Safety
//!
//! [`HistoryStore`] wraps a `rusqlite::Connection`, which is `Send` but not
//! `Sync`: an instance can move between threads but concurrent access needs
//! external synchronization.
//!
//! # Schema
//!
//! Timestamps are stored as TEXT in RFC 3339 form (e.g.
//! `2025-06-01T12:00:00.000Z`) so lexicographic ordering matches
//! chronological ordering. The per-subject map is stored as a JSON TEXT
//! column in exactly the record's wire shape; session-level fields are
//! denormalized into typed columns for listing without JSON decoding.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, params};
use thiserror::Error;
use uuid::Uuid;

use tct_core::SessionRecord;

/// History store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored timestamp failed to parse.
    #[error("invalid timestamp for session {session_id}: {timestamp}")]
    TimestampParse {
        session_id: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored protocol name is unknown.
    #[error("invalid protocol for session {session_id}: {protocol}")]
    ProtocolParse {
        session_id: String,
        protocol: String,
    },
    /// The per-subject JSON column failed to encode or decode.
    #[error("invalid subject map for session {session_id}")]
    SubjectsJson {
        session_id: String,
        #[source]
        source: serde_json::Error,
    },
    /// No session row with the given ID.
    #[error("session not found: {0}")]
    NotFound(String),
}

/// A persisted session together with its storage identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    /// Row ID, a UUID assigned on insert.
    pub id: String,
    /// When the record was saved.
    pub saved_at: DateTime<Utc>,
    /// The session record itself.
    pub record: SessionRecord,
}

/// History database wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct HistoryStore {
    conn: Connection,
}

/// Row image before timestamp/JSON hydration.
struct RawSession {
    id: String,
    saved_at: String,
    protocol: String,
    started_at: String,
    ended_at: String,
    duration_ms: i64,
    subject_count: usize,
    subjects: String,
}

const SESSION_COLUMNS: &str =
    "id, saved_at, protocol, started_at, ended_at, duration_ms, subject_count, subjects";

impl HistoryStore {
    /// Opens a store at the given path, creating it if necessary.
    ///
    /// The schema is initialized on first open.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Opens an in-memory store.
    ///
    /// Useful for testing. The store is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Initializes the schema.
    ///
    /// This is idempotent - safe to call on an already-initialized store.
    fn init(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            -- Sessions table: one row per completed, scored session
            -- saved_at/started_at/ended_at: RFC 3339 text
            -- subjects: JSON map of subject ID -> {empty, middle, stranger, switches}
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                saved_at TEXT NOT NULL,
                protocol TEXT NOT NULL,
                started_at TEXT NOT NULL,
                ended_at TEXT NOT NULL,
                duration_ms INTEGER NOT NULL,
                subject_count INTEGER NOT NULL,
                subjects TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_started ON sessions(started_at);
            ",
        )?;
        Ok(())
    }

    /// Inserts a completed session and returns its new row ID.
    pub fn insert(&mut self, record: &SessionRecord) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let saved_at = Utc::now();
        let subjects =
            serde_json::to_string(&record.subjects).map_err(|source| StoreError::SubjectsJson {
                session_id: id.clone(),
                source,
            })?;

        self.conn.execute(
            "
            INSERT INTO sessions
            (id, saved_at, protocol, started_at, ended_at, duration_ms, subject_count, subjects)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                id,
                format_timestamp(saved_at),
                record.protocol.as_str(),
                format_timestamp(record.started_at),
                format_timestamp(record.ended_at),
                record.duration_ms,
                record.subject_count,
                subjects,
            ],
        )?;

        tracing::debug!(session_id = %id, subjects = record.subject_count, "session saved");
        Ok(id)
    }

    /// Lists all sessions, most recent session start first.
    pub fn list(&self) -> Result<Vec<StoredSession>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "
            SELECT {SESSION_COLUMNS}
            FROM sessions
            ORDER BY started_at DESC, id ASC
            "
        ))?;
        let rows = stmt.query_map([], raw_session)?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(hydrate(row?)?);
        }
        Ok(sessions)
    }

    /// Fetches one session by row ID.
    pub fn get(&self, id: &str) -> Result<StoredSession, StoreError> {
        let result = self.conn.query_row(
            &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?"),
            params![id],
            raw_session,
        );
        match result {
            Ok(raw) => hydrate(raw),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StoreError::NotFound(id.to_string())),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes one session. Returns whether a row was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let removed = self.conn.execute("DELETE FROM sessions WHERE id = ?", params![id])?;
        tracing::debug!(session_id = %id, removed, "session delete");
        Ok(removed > 0)
    }

    /// Deletes every session. Returns how many rows were removed.
    pub fn clear(&mut self) -> Result<usize, StoreError> {
        let removed = self.conn.execute("DELETE FROM sessions", [])?;
        tracing::debug!(removed, "history cleared");
        Ok(removed)
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn raw_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSession> {
    Ok(RawSession {
        id: row.get(0)?,
        saved_at: row.get(1)?,
        protocol: row.get(2)?,
        started_at: row.get(3)?,
        ended_at: row.get(4)?,
        duration_ms: row.get(5)?,
        subject_count: row.get(6)?,
        subjects: row.get(7)?,
    })
}

fn hydrate(raw: RawSession) -> Result<StoredSession, StoreError> {
    let saved_at = parse_timestamp(&raw.id, &raw.saved_at)?;
    let started_at = parse_timestamp(&raw.id, &raw.started_at)?;
    let ended_at = parse_timestamp(&raw.id, &raw.ended_at)?;
    let protocol = raw
        .protocol
        .parse()
        .map_err(|_| StoreError::ProtocolParse {
            session_id: raw.id.clone(),
            protocol: raw.protocol.clone(),
        })?;
    let subjects =
        serde_json::from_str(&raw.subjects).map_err(|source| StoreError::SubjectsJson {
            session_id: raw.id.clone(),
            source,
        })?;

    Ok(StoredSession {
        id: raw.id,
        saved_at,
        record: SessionRecord {
            protocol,
            started_at,
            ended_at,
            duration_ms: raw.duration_ms,
            subject_count: raw.subject_count,
            subjects,
        },
    })
}

fn parse_timestamp(session_id: &str, value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| StoreError::TimestampParse {
            session_id: session_id.to_string(),
            timestamp: value.to_string(),
            source,
        })
}
