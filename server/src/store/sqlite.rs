use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{now, TodoStore};
use crate::error::StoreError;
use crate::Todo;

const SELECT_COLUMNS: &str = "id, text, completed, created_at, updated_at";

/// SQLite-backed store. All calls run on the blocking pool behind one
/// connection mutex.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        tracing::info!(path = %path.display(), "opened sqlite store");
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS todos (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                text TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            ",
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?
    }
}

struct TodoRow {
    id: String,
    text: String,
    completed: bool,
    created_at: i64,
    updated_at: i64,
}

impl TodoRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            text: row.get(1)?,
            completed: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    fn into_todo(self) -> Result<Todo, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Corrupt(format!("bad id `{}`: {e}", self.id)))?;
        Ok(Todo {
            id,
            text: self.text,
            completed: self.completed,
            created_at: from_millis(self.created_at)?,
            updated_at: from_millis(self.updated_at)?,
        })
    }
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>, StoreError> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| StoreError::Corrupt(format!("bad timestamp {ms}")))
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn insert(&self, text: &str) -> Result<Todo, StoreError> {
        let stamp = now();
        let todo = Todo {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed: false,
            created_at: stamp,
            updated_at: stamp,
        };
        let row = todo.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO todos (id, text, completed, created_at, updated_at)
                 VALUES (?1, ?2, 0, ?3, ?4)",
                params![
                    row.id.to_string(),
                    row.text,
                    row.created_at.timestamp_millis(),
                    row.updated_at.timestamp_millis(),
                ],
            )?;
            Ok(())
        })
        .await?;
        Ok(todo)
    }

    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM todos ORDER BY created_at DESC, seq DESC"
            ))?;
            let rows = stmt
                .query_map([], TodoRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows.into_iter().map(TodoRow::into_todo).collect()
        })
        .await
    }

    async fn update_completion(
        &self,
        id: Uuid,
        completed: bool,
    ) -> Result<Option<Todo>, StoreError> {
        let stamp = now().timestamp_millis();
        self.with_conn(move |conn| {
            let row = conn
                .query_row(
                    &format!(
                        "UPDATE todos SET completed = ?1, updated_at = MAX(?2, updated_at + 1)
                         WHERE id = ?3
                         RETURNING {SELECT_COLUMNS}"
                    ),
                    params![completed, stamp, id.to_string()],
                    TodoRow::from_row,
                )
                .optional()?;
            row.map(TodoRow::into_todo).transpose()
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.with_conn(move |conn| {
            let changed = conn.execute("DELETE FROM todos WHERE id = ?1", params![id.to_string()])?;
            Ok(changed > 0)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn crud_round_trip_in_memory() {
        let store = SqliteStore::open_in_memory().unwrap();
        let milk = store.insert("buy milk").await.unwrap();
        let dog = store.insert("walk dog").await.unwrap();
        assert!(!milk.completed);
        assert_ne!(milk.id, dog.id);

        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![dog.clone(), milk.clone()]);

        let on = store.update_completion(milk.id, true).await.unwrap().unwrap();
        let off = store.update_completion(milk.id, false).await.unwrap().unwrap();
        assert!(on.completed && !off.completed);
        assert!(on.updated_at > milk.updated_at);
        assert!(off.updated_at > on.updated_at);

        assert!(store.delete(dog.id).await.unwrap());
        assert!(!store.delete(dog.id).await.unwrap());
        let ids: Vec<Uuid> = store.list().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![milk.id]);
    }

    #[tokio::test]
    async fn update_unknown_id_is_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store
            .update_completion(Uuid::new_v4(), true)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.db");

        let created = {
            let store = SqliteStore::open(&path).unwrap();
            store.insert("persisted").await.unwrap()
        };

        let store = SqliteStore::open(&path).unwrap();
        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn corrupt_row_is_reported() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO todos (id, text, completed, created_at, updated_at)
                     VALUES ('not-a-uuid', 'x', 0, 0, 0)",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();
        let err = store.list().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
