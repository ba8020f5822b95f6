// 🗄️ Persisted Store - durable key-value state
//
// Two keys survive restarts: `salary` (JSON number) and `expenses` (JSON array).
// Reads never fail: a missing or malformed value yields the caller's default.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::StoreError;

pub const SALARY_KEY: &str = "salary";
pub const EXPENSES_KEY: &str = "expenses";

/// Raw string-valued storage. Values are JSON text.
pub trait KeyValueStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Read `key`, falling back to `default` when missing, unreadable or malformed
pub fn get<T, S>(store: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get_raw(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored value, using default");
            return default;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "malformed stored value, using default");
            default
        }
    }
}

/// Serialize `value` as JSON and write it under `key`
pub fn set<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set_raw(key, &json)
}

// ============================================================================
// SQLITE BACKEND
// ============================================================================

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        // WAL for crash safety on file-backed databases
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }
}

pub fn setup_database(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;

        Ok(value)
    }

    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;

        Ok(())
    }
}

// ============================================================================
// IN-MEMORY BACKEND
// ============================================================================

/// Non-durable store, for tests and throwaway sessions
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Category, Expense};
    use chrono::NaiveDate;

    #[test]
    fn test_missing_key_returns_default() {
        let store = SqliteStore::open_in_memory().unwrap();

        let salary: f64 = get(&store, SALARY_KEY, 0.0);
        let expenses: Vec<Expense> = get(&store, EXPENSES_KEY, Vec::new());

        assert_eq!(salary, 0.0);
        assert!(expenses.is_empty());
    }

    #[test]
    fn test_set_then_get_same_session() {
        let mut store = SqliteStore::open_in_memory().unwrap();

        set(&mut store, SALARY_KEY, &3000.0).unwrap();
        assert_eq!(get::<f64, _>(&store, SALARY_KEY, 0.0), 3000.0);

        // Overwrite, no history
        set(&mut store, SALARY_KEY, &2500.5).unwrap();
        assert_eq!(get::<f64, _>(&store, SALARY_KEY, 0.0), 2500.5);
        assert_eq!(store.get_raw(SALARY_KEY).unwrap().as_deref(), Some("2500.5"));
    }

    #[test]
    fn test_malformed_value_returns_default() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.set_raw(EXPENSES_KEY, "{not json").unwrap();
        store.set_raw(SALARY_KEY, "\"lots\"").unwrap();

        let expenses: Vec<Expense> = get(&store, EXPENSES_KEY, Vec::new());
        let salary: f64 = get(&store, SALARY_KEY, 0.0);

        assert!(expenses.is_empty());
        assert_eq!(salary, 0.0);
    }

    #[test]
    fn test_expenses_round_trip_through_sqlite() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let expenses = vec![Expense {
            id: 1,
            description: "Groceries".to_string(),
            amount: 82.4,
            category: Category::Food,
            date: NaiveDate::from_ymd_opt(2026, 10, 2).unwrap(),
        }];

        set(&mut store, EXPENSES_KEY, &expenses).unwrap();
        let raw = store.get_raw(EXPENSES_KEY).unwrap().unwrap();
        assert!(raw.contains("\"date\":\"2026-10-02\""));

        let loaded: Vec<Expense> = get(&store, EXPENSES_KEY, Vec::new());
        assert_eq!(loaded, expenses);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let path = std::env::temp_dir().join(format!(
            "monthly-budget-store-{}-{}.db",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));

        {
            let mut store = SqliteStore::open(&path).unwrap();
            set(&mut store, SALARY_KEY, &4200.0).unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(get::<f64, _>(&reopened, SALARY_KEY, 0.0), 4200.0);

        drop(reopened);
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(get::<f64, _>(&store, SALARY_KEY, 7.0), 7.0);
        set(&mut store, SALARY_KEY, &1.5).unwrap();
        assert_eq!(get::<f64, _>(&store, SALARY_KEY, 7.0), 1.5);
    }
}
