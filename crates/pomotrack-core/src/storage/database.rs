//! SQLite-based state storage and session history.
//!
//! Provides persistent storage for:
//! - Finished and abandoned phases (history log)
//! - Key-value store for application state (engine, analytics, tasks)

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::Path;

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::events::Event;
use crate::timer::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOutcome {
    Completed,
    Incomplete,
}

impl SessionOutcome {
    fn as_str(self) -> &'static str {
        match self {
            SessionOutcome::Completed => "completed",
            SessionOutcome::Incomplete => "incomplete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub phase: Phase,
    pub outcome: SessionOutcome,
    pub elapsed_secs: u64,
    pub task_id: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// SQLite database for application state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data dir>/pomotrack.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("pomotrack.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                phase        TEXT NOT NULL,
                outcome      TEXT NOT NULL,
                elapsed_secs INTEGER NOT NULL,
                task_id      TEXT,
                recorded_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_recorded_at ON sessions(recorded_at);",
        )?;
        Ok(())
    }

    /// Append a history row.
    pub fn record_session(
        &self,
        phase: Phase,
        outcome: SessionOutcome,
        elapsed_secs: u64,
        task_id: Option<&str>,
        recorded_at: DateTime<Utc>,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO sessions (phase, outcome, elapsed_secs, task_id, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                phase.as_str(),
                outcome.as_str(),
                elapsed_secs,
                task_id,
                recorded_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Log the events that end a phase. Other events are ignored.
    /// Returns how many rows were written.
    pub fn record_events(&self, events: &[Event]) -> Result<usize> {
        let mut written = 0;
        for event in events {
            let row = match event {
                Event::PhaseCompleted {
                    completed,
                    duration_secs,
                    task_id,
                    at,
                    ..
                } => Some((*completed, SessionOutcome::Completed, *duration_secs, task_id.as_deref(), *at)),
                Event::TimerReset {
                    phase,
                    abandoned: true,
                    elapsed_secs,
                    at,
                }
                | Event::TimerStopped {
                    phase,
                    abandoned: true,
                    elapsed_secs,
                    at,
                } => Some((*phase, SessionOutcome::Incomplete, *elapsed_secs, None, *at)),
                _ => None,
            };
            if let Some((phase, outcome, elapsed, task_id, at)) = row {
                self.record_session(phase, outcome, elapsed, task_id, at)?;
                written += 1;
            }
        }
        Ok(written)
    }

    /// Most recent history rows, newest first.
    pub fn history(&self, limit: usize) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, phase, outcome, elapsed_secs, task_id, recorded_at
             FROM sessions
             ORDER BY id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u64>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, phase, outcome, elapsed_secs, task_id, recorded_at) = row?;
            let corrupt = |message: String| DatabaseError::CorruptValue {
                key: format!("sessions/{id}"),
                message,
            };
            records.push(SessionRecord {
                id,
                phase: phase.parse().map_err(corrupt)?,
                outcome: match outcome.as_str() {
                    "completed" => SessionOutcome::Completed,
                    "incomplete" => SessionOutcome::Incomplete,
                    other => return Err(corrupt(format!("unknown outcome '{other}'")).into()),
                },
                elapsed_secs,
                task_id,
                recorded_at: DateTime::parse_from_rfc3339(&recorded_at)
                    .map_err(|e| corrupt(e.to_string()))?
                    .with_timezone(&Utc),
            });
        }
        Ok(records)
    }

    /// Delete the history log.
    pub fn clear_history(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM sessions", [])?)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Decode a JSON value stored under `key`.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.kv_get(key)? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw).map_err(|e| DatabaseError::CorruptValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(value))
    }

    pub fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.kv_set(key, &json)?;
        Ok(())
    }
}
