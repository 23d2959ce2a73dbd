//! Persisted NAS settings (URL, token, category)
//!
//! A three-key store with last-write-wins semantics, kept in SQLite so the
//! values survive restarts. Unset keys fall back to fixed defaults.

use crate::models::NasSettings;
use crate::payload::DEFAULT_CATEGORY;
use rusqlite::{params, Connection, OptionalExtension, Result};

const KEY_NAS_URL: &str = "nasUrl";
const KEY_NAS_TOKEN: &str = "nasToken";
const KEY_CATEGORY: &str = "category";

pub struct SettingsStore {
    conn: Connection,
}

impl SettingsStore {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Throwaway store for tests
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )?;
        Ok(Self { conn })
    }

    fn get(&self, key: &str, default: &str) -> String {
        let value: Option<String> = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .unwrap_or_else(|e| {
                log::error!("Settings read for {} failed: {}", key, e);
                None
            });
        match value {
            Some(v) if !v.is_empty() => v,
            _ => default.to_string(),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn nas_url(&self) -> String {
        self.get(KEY_NAS_URL, "")
    }

    pub fn set_nas_url(&self, url: &str) -> Result<()> {
        self.set(KEY_NAS_URL, url)
    }

    pub fn nas_token(&self) -> String {
        self.get(KEY_NAS_TOKEN, "")
    }

    pub fn set_nas_token(&self, token: &str) -> Result<()> {
        self.set(KEY_NAS_TOKEN, token)
    }

    pub fn category(&self) -> String {
        self.get(KEY_CATEGORY, DEFAULT_CATEGORY)
    }

    pub fn set_category(&self, category: &str) -> Result<()> {
        let value = if category.is_empty() {
            DEFAULT_CATEGORY
        } else {
            category
        };
        self.set(KEY_CATEGORY, value)
    }

    /// Consistent read of all three values for one payload build
    pub fn snapshot(&self) -> NasSettings {
        NasSettings {
            nas_url: self.nas_url(),
            nas_token: self.nas_token(),
            category: self.category(),
        }
    }
}
