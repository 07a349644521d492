use super::{Result, STORAGE_KEY, StorageProvider};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Key-value backend in a single SQLite table. The progress document is the
/// only row this crate writes.
pub struct SqliteStorage {
    conn: Connection,
    key: String,
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl SqliteStorage {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        run_migrations(&conn)?;
        Ok(Self {
            conn,
            key: STORAGE_KEY.to_string(),
        })
    }

    /// Uses a different row key, so several isolated documents can share a
    /// database file.
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }
}

fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        )",
        [],
    )?;

    Ok(())
}

impl StorageProvider for SqliteStorage {
    fn load(&self) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?",
                [&self.key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&self, document: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![self.key, document, now()],
        )?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?", [&self.key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MasteryStatus, UserProgress};
    use crate::storage::ProgressStore;

    #[test]
    fn test_migrations_create_table() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::open(&temp_dir.path().join("test.db")).unwrap();

        let tables: Vec<String> = storage
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"kv_store".to_string()));
    }

    #[test]
    fn test_save_load_clear() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::open(&temp_dir.path().join("test.db")).unwrap();

        assert!(storage.load().unwrap().is_none());
        storage.save("first").unwrap();
        storage.save("second").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("second"));

        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_progress_survives_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("progress.db");

        {
            let store = ProgressStore::new(SqliteStorage::open(&db_path).unwrap());
            for _ in 0..3 {
                store.record_quiz_answer("w1", true, 900).unwrap();
            }
        }

        let store = ProgressStore::new(SqliteStorage::open(&db_path).unwrap());
        let progress = store.get_word_progress("w1");
        assert_eq!(progress.status, MasteryStatus::Mastered);
        assert_eq!(progress.quiz_attempts.len(), 3);
    }

    #[test]
    fn test_keys_are_isolated() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let a = ProgressStore::new(SqliteStorage::open(&db_path).unwrap().with_key("a"));
        let b = ProgressStore::new(SqliteStorage::open(&db_path).unwrap().with_key("b"));

        a.start_session().unwrap();
        assert_eq!(a.get().total_sessions, 1);
        assert_eq!(b.get(), UserProgress::default());
    }

    #[test]
    fn test_corrupt_row_falls_back_to_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::open(&temp_dir.path().join("test.db")).unwrap();
        storage.save("[1, 2").unwrap();

        let store = ProgressStore::new(storage);
        assert_eq!(store.get(), UserProgress::default());
    }
}
