use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::store::PersistedState;

pub const THEME_KEY: &str = "theme";
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Spellings some older builds wrote the access token under. Read only to warn.
const LEGACY_ACCESS_TOKEN_KEYS: &[&str] = &["accesstoken", "access_token", "token"];

const STATE_ROOT: &str = "root";

/// Durable client storage: the persisted store snapshot plus plain key/value entries.
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    pub fn open(data_dir: Option<&Path>) -> Result<Self> {
        let path = match data_dir {
            Some(dir) => dir.join("jobboard.db"),
            None => Self::default_path(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
        }
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        let db = Self { conn, path };
        db.init()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
            path: PathBuf::from(":memory:"),
        };
        db.init()?;
        Ok(db)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn default_path() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobboard") {
            proj_dirs.data_dir().join("jobboard.db")
        } else {
            PathBuf::from("jobboard.db")
        }
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS persisted_state (
                root TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    // --- Key/value entries ---

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()
            .with_context(|| format!("Failed to read '{}'", key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }

    #[cfg(test)]
    pub fn drop_table(&self, table: &str) -> Result<()> {
        self.conn.execute_batch(&format!("DROP TABLE {}", table))?;
        Ok(())
    }

    // --- Tokens ---

    pub fn store_tokens(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        self.set(ACCESS_TOKEN_KEY, access_token)?;
        self.set(REFRESH_TOKEN_KEY, refresh_token)?;
        Ok(())
    }

    pub fn clear_tokens(&self) -> Result<()> {
        self.remove(ACCESS_TOKEN_KEY)?;
        self.remove(REFRESH_TOKEN_KEY)?;
        Ok(())
    }

    /// Reads the access token under its canonical key only.
    ///
    /// A token found under a legacy spelling is reported, not used: requests
    /// then go out unauthenticated and the backend answers 401.
    pub fn access_token(&self) -> Result<Option<String>> {
        let token = self.get(ACCESS_TOKEN_KEY)?;
        if token.is_none() {
            for legacy in LEGACY_ACCESS_TOKEN_KEYS {
                if self.get(legacy)?.is_some() {
                    tracing::warn!(
                        key = legacy,
                        expected = ACCESS_TOKEN_KEY,
                        "access token stored under a non-canonical key; ignoring it"
                    );
                }
            }
        }
        Ok(token)
    }

    // --- Persisted store ---

    pub fn save_state(&self, state: &PersistedState) -> Result<()> {
        let payload = serde_json::to_string(state).context("Failed to serialize store")?;
        self.conn.execute(
            "INSERT INTO persisted_state (root, payload) VALUES (?1, ?2)
             ON CONFLICT(root) DO UPDATE SET payload = excluded.payload, updated_at = datetime('now')",
            params![STATE_ROOT, payload],
        )?;
        Ok(())
    }

    /// Loads the last persisted snapshot. A snapshot that no longer parses is
    /// dropped with a warning so a schema change never locks the user out.
    pub fn load_state(&self) -> Result<PersistedState> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM persisted_state WHERE root = ?1",
                [STATE_ROOT],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            None => Ok(PersistedState::default()),
            Some(payload) => match serde_json::from_str(&payload) {
                Ok(state) => Ok(state),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding unreadable persisted state");
                    Ok(PersistedState::default())
                }
            },
        }
    }
}
