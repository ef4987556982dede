use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{next_updated_at, now, TodoStore};
use crate::error::StoreError;
use crate::Todo;

/// In-process store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    todos: HashMap<Uuid, Entry>,
}

#[derive(Debug)]
struct Entry {
    seq: u64,
    todo: Todo,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn insert(&self, text: &str) -> Result<Todo, StoreError> {
        let stamp = now();
        let todo = Todo {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed: false,
            created_at: stamp,
            updated_at: stamp,
        };
        let mut inner = self.inner.write().await;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.todos.insert(
            todo.id,
            Entry {
                seq,
                todo: todo.clone(),
            },
        );
        Ok(todo)
    }

    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let inner = self.inner.read().await;
        let mut entries: Vec<&Entry> = inner.todos.values().collect();
        entries.sort_by(|a, b| {
            b.todo
                .created_at
                .cmp(&a.todo.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(entries.into_iter().map(|e| e.todo.clone()).collect())
    }

    async fn update_completion(
        &self,
        id: Uuid,
        completed: bool,
    ) -> Result<Option<Todo>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(entry) = inner.todos.get_mut(&id) else {
            return Ok(None);
        };
        entry.todo.completed = completed;
        entry.todo.updated_at = next_updated_at(entry.todo.updated_at);
        Ok(Some(entry.todo.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.todos.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_defaults_to_uncompleted() {
        let store = MemoryStore::new();
        let todo = store.insert("buy milk").await.unwrap();
        assert_eq!(todo.text, "buy milk");
        assert!(!todo.completed);
        assert_eq!(todo.created_at, todo.updated_at);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryStore::new();
        store.insert("buy milk").await.unwrap();
        store.insert("walk dog").await.unwrap();
        let texts: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, vec!["walk dog", "buy milk"]);
    }

    #[tokio::test]
    async fn toggle_twice_strictly_advances_updated_at() {
        let store = MemoryStore::new();
        let todo = store.insert("walk dog").await.unwrap();
        let on = store.update_completion(todo.id, true).await.unwrap().unwrap();
        let off = store.update_completion(todo.id, false).await.unwrap().unwrap();
        assert!(on.completed);
        assert!(!off.completed);
        assert!(on.updated_at > todo.updated_at);
        assert!(off.updated_at > on.updated_at);
        assert_eq!(off.created_at, todo.created_at);
    }

    #[tokio::test]
    async fn update_unknown_id_is_none() {
        let store = MemoryStore::new();
        store.insert("keep").await.unwrap();
        let result = store.update_completion(Uuid::new_v4(), true).await.unwrap();
        assert!(result.is_none());
        assert!(!store.list().await.unwrap()[0].completed);
    }

    #[tokio::test]
    async fn delete_is_permanent_and_repeatable() {
        let store = MemoryStore::new();
        let gone = store.insert("gone").await.unwrap();
        let kept = store.insert("kept").await.unwrap();
        assert!(store.delete(gone.id).await.unwrap());
        assert!(!store.delete(gone.id).await.unwrap());
        let ids: Vec<Uuid> = store.list().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![kept.id]);
    }
}
