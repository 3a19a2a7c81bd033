use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

/// Characters kept in list previews.
pub const PREVIEW_CHARS: i64 = 100;

const PROMPT_KEY_PREFIX: &str = "prompt.";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("cannot create database directory: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// A completed action to record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHistoryEntry {
    pub action: String,
    pub input_text: String,
    pub output_text: String,
    pub tokens_used: u64,
    pub model: Option<String>,
}

/// A full history row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: i64,
    pub action: String,
    pub input_text: String,
    pub output_text: String,
    pub tokens_used: u64,
    pub model: Option<String>,
    /// Milliseconds since epoch.
    pub timestamp: i64,
    pub input_length: i64,
    pub output_length: i64,
}

/// A history row with input and output cut to [`PREVIEW_CHARS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub id: i64,
    pub action: String,
    pub input_preview: String,
    pub output_preview: String,
    pub tokens_used: u64,
    pub model: Option<String>,
    pub timestamp: i64,
    pub input_length: i64,
    pub output_length: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub total_count: u64,
    pub total_tokens: u64,
    pub actions_by_type: BTreeMap<String, u64>,
    /// Rounded to two decimals.
    pub avg_tokens_per_action: f64,
}

/// Repository for processed-action history.
pub trait HistoryRepository {
    type Error;
    fn add_history(&self, entry: &NewHistoryEntry) -> std::result::Result<i64, Self::Error>;
    fn get_history(
        &self,
        limit: usize,
        action_filter: Option<&str>,
    ) -> std::result::Result<Vec<HistorySummary>, Self::Error>;
    fn get_history_item(&self, id: i64) -> std::result::Result<HistoryItem, Self::Error>;
    fn delete_history_item(&self, id: i64) -> std::result::Result<(), Self::Error>;
    fn clear_history(&self) -> std::result::Result<usize, Self::Error>;
    fn get_stats(&self) -> std::result::Result<HistoryStats, Self::Error>;
}

/// Repository for key/value settings.
pub trait SettingsRepository {
    type Error;
    fn get_setting(&self, key: &str) -> std::result::Result<Option<String>, Self::Error>;
    fn set_setting(&self, key: &str, value: &str) -> std::result::Result<(), Self::Error>;
    fn delete_setting(&self, key: &str) -> std::result::Result<(), Self::Error>;
}

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        tracing::debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    /// Like [`open`](Self::open), creating missing parent directories first.
    pub fn open_creating_dirs(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::open(path)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                action TEXT NOT NULL,
                input_text TEXT NOT NULL,
                output_text TEXT NOT NULL,
                tokens_used INTEGER NOT NULL DEFAULT 0,
                model TEXT,
                timestamp INTEGER NOT NULL,
                input_length INTEGER NOT NULL,
                output_length INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_history_action ON history(action);
            CREATE INDEX IF NOT EXISTS idx_history_timestamp ON history(timestamp DESC);
            "#,
        )?;
        Ok(())
    }

    /// Persist a custom system prompt for `action`.
    pub fn save_prompt_override(&self, action: &str, prompt: &str) -> Result<()> {
        self.set_setting(&format!("{PROMPT_KEY_PREFIX}{action}"), prompt)
    }

    /// All saved prompt overrides as `(action, prompt)`, sorted by action.
    pub fn load_prompt_overrides(&self) -> Result<Vec<(String, String)>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let mut stmt =
            conn.prepare("SELECT key, value FROM settings WHERE key LIKE 'prompt.%' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            let key: String = row.get(0)?;
            let value: String = row.get(1)?;
            Ok((key, value))
        })?;

        let mut overrides = Vec::new();
        for row in rows {
            let (key, value) = row?;
            if let Some(action) = key.strip_prefix(PROMPT_KEY_PREFIX) {
                overrides.push((action.to_string(), value));
            }
        }
        Ok(overrides)
    }

    pub fn delete_prompt_override(&self, action: &str) -> Result<()> {
        self.delete_setting(&format!("{PROMPT_KEY_PREFIX}{action}"))
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl HistoryRepository for Database {
    type Error = StorageError;

    fn add_history(&self, entry: &NewHistoryEntry) -> Result<i64> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.execute(
            "INSERT INTO history (action, input_text, output_text, tokens_used, model, timestamp, input_length, output_length) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            (
                &entry.action,
                &entry.input_text,
                &entry.output_text,
                entry.tokens_used as i64,
                &entry.model,
                now_ms(),
                entry.input_text.chars().count() as i64,
                entry.output_text.chars().count() as i64,
            ),
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(id, action = %entry.action, "history entry added");
        Ok(id)
    }

    fn get_history(&self, limit: usize, action_filter: Option<&str>) -> Result<Vec<HistorySummary>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, action, substr(input_text, 1, ?1), substr(output_text, 1, ?1), tokens_used, model, timestamp, input_length, output_length
             FROM history
             WHERE (?2 IS NULL OR action = ?2)
             ORDER BY timestamp DESC, id DESC
             LIMIT ?3",
        )?;

        let rows = stmt.query_map((PREVIEW_CHARS, action_filter, limit as i64), |row| {
            Ok(HistorySummary {
                id: row.get(0)?,
                action: row.get(1)?,
                input_preview: row.get(2)?,
                output_preview: row.get(3)?,
                tokens_used: row.get::<_, i64>(4)? as u64,
                model: row.get(5)?,
                timestamp: row.get(6)?,
                input_length: row.get(7)?,
                output_length: row.get(8)?,
            })
        })?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    fn get_history_item(&self, id: i64) -> Result<HistoryItem> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.query_row(
            "SELECT id, action, input_text, output_text, tokens_used, model, timestamp, input_length, output_length FROM history WHERE id = ?1",
            [id],
            |row| {
                Ok(HistoryItem {
                    id: row.get(0)?,
                    action: row.get(1)?,
                    input_text: row.get(2)?,
                    output_text: row.get(3)?,
                    tokens_used: row.get::<_, i64>(4)? as u64,
                    model: row.get(5)?,
                    timestamp: row.get(6)?,
                    input_length: row.get(7)?,
                    output_length: row.get(8)?,
                })
            },
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => StorageError::NotFound(format!("history {id}")),
            other => StorageError::DatabaseError(other),
        })
    }

    fn delete_history_item(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let affected = conn.execute("DELETE FROM history WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(StorageError::NotFound(format!("history {id}")));
        }
        Ok(())
    }

    fn clear_history(&self) -> Result<usize> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let removed = conn.execute("DELETE FROM history", [])?;
        tracing::info!(removed, "history cleared");
        Ok(removed)
    }

    fn get_stats(&self) -> Result<HistoryStats> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let (total_count, total_tokens, avg): (i64, i64, Option<f64>) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(tokens_used), 0), AVG(tokens_used) FROM history",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        let mut stmt = conn.prepare("SELECT action, COUNT(*) FROM history GROUP BY action")?;
        let rows = stmt.query_map([], |row| {
            let action: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((action, count as u64))
        })?;
        let mut actions_by_type = BTreeMap::new();
        for row in rows {
            let (action, count) = row?;
            actions_by_type.insert(action, count);
        }

        Ok(HistoryStats {
            total_count: total_count as u64,
            total_tokens: total_tokens as u64,
            actions_by_type,
            avg_tokens_per_action: (avg.unwrap_or(0.0) * 100.0).round() / 100.0,
        })
    }
}

impl SettingsRepository for Database {
    type Error = StorageError;

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let value = conn
            .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.execute(
            "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
            (key, value, now_ms()),
        )?;
        Ok(())
    }

    fn delete_setting(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let affected = conn.execute("DELETE FROM settings WHERE key = ?1", [key])?;
        if affected == 0 {
            return Err(StorageError::NotFound(format!("setting {key}")));
        }
        Ok(())
    }
}
