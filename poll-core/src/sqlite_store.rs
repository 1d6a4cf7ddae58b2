use crate::error::StoreError;
use crate::store::KeyValueStore;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File-backed store for native shells, one database per viewer profile.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    db_path: Arc<PathBuf>,
}

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let db_path = PathBuf::from(path);
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&db_path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;

        Ok(Self {
            db_path: Arc::new(db_path),
        })
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&*self.db_path)?)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.connect()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_path(name: &str) -> String {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        format!("/tmp/poll-core-tests/{name}-{nanos}.db")
    }

    #[test]
    fn set_get_remove_roundtrip() {
        let store = SqliteStore::open(&db_path("kv")).expect("open");
        assert_eq!(store.get("poll-vote:p1").expect("get"), None);

        store.set("poll-vote:p1", "{\"a\":1}").expect("set");
        assert_eq!(
            store.get("poll-vote:p1").expect("get"),
            Some("{\"a\":1}".to_string())
        );

        store.remove("poll-vote:p1").expect("remove");
        assert_eq!(store.get("poll-vote:p1").expect("get"), None);
    }

    #[test]
    fn set_overwrites_and_survives_reopen() {
        let path = db_path("reopen");
        let store = SqliteStore::open(&path).expect("open");
        store.set("k", "first").expect("set first");
        store.set("k", "second").expect("set second");

        let reopened = SqliteStore::open(&path).expect("reopen");
        assert_eq!(reopened.get("k").expect("get"), Some("second".to_string()));
    }
}
