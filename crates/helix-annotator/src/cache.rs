use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CacheError;

/// Memoises expensive calls by method name and arguments in SQLite.
///
/// Entries never expire; call [`AnnotationCache::reset`] to drop them.
#[derive(Debug)]
pub struct AnnotationCache {
    conn: Connection,
}

impl AnnotationCache {
    /// Open (or create) a cache database on disk.
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory()?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    /// Cache key: the method name followed by `key=value` for each argument.
    pub fn key(method: &str, args: &[(&str, String)]) -> String {
        let mut key = method.to_string();
        for (name, value) in args {
            key.push('|');
            key.push_str(name);
            key.push('=');
            key.push_str(value);
        }
        key
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM cache_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn put<T: Serialize>(&self, method: &str, key: &str, value: &T) -> Result<(), CacheError> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO cache_entries (key, method, value) VALUES (?1, ?2, ?3)",
            params![key, method, json],
        )?;
        Ok(())
    }

    /// Return the cached value for `method(args)`, or compute, store and return it.
    ///
    /// Failed computations are not cached.
    pub fn get_or_compute<T, E, F>(
        &self,
        method: &str,
        args: &[(&str, String)],
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Result<T, E>,
    {
        let key = Self::key(method, args);
        if let Some(hit) = self.get(&key)? {
            tracing::debug!(method, "cache hit");
            return Ok(hit);
        }
        tracing::debug!(method, "cache miss");

        let value = compute()?;
        self.put(method, &key, &value)?;
        Ok(value)
    }

    /// Drop every entry. Returns the number of entries removed.
    pub fn reset(&self) -> Result<usize, CacheError> {
        let removed = self.conn.execute("DELETE FROM cache_entries", [])?;
        tracing::info!(removed, "cache cleared");
        Ok(removed)
    }

    pub fn len(&self) -> Result<usize, CacheError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cache_entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }
}

/// Create the cache table if it does not exist.
fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS cache_entries (
            key         TEXT PRIMARY KEY,
            method      TEXT NOT NULL,
            value       TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_cache_entries_method ON cache_entries(method);",
    )
}
