//! HTTP service for the todo list.
//!
//! # Overview
//! Maps four REST routes under `/api` 1:1 onto [`TodoStore`] operations.
//! Handlers hold no state of their own; the only shared value is the store
//! handle passed into [`app`] at startup.
//!
//! # Compatibility
//! Unknown ids are not reported as 404: `PUT` answers `200 null` and `DELETE`
//! answers the usual confirmation message. Clients rely on that shape.

pub mod config;
pub mod error;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use uuid::Uuid;

pub use error::{ApiError, StoreError};
pub use store::{MemoryStore, SqliteStore, TodoStore};

pub const DELETED_MESSAGE: &str = "Todo deleted";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

pub type Db = Arc<dyn TodoStore>;

pub fn app(store: Db) -> Router {
    let api = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo));
    Router::new().nest("/api", api).with_state(store)
}

pub async fn run(listener: TcpListener, store: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}

async fn list_todos(State(db): State<Db>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = db.list().await?;
    tracing::debug!(count = todos.len(), "listed todos");
    Ok(Json(todos))
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> Result<Json<Todo>, ApiError> {
    let text = match input.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(ApiError::Validation("text must not be empty".to_string())),
    };
    let todo = db.insert(&text).await?;
    tracing::info!(id = %todo.id, "created todo");
    Ok(Json(todo))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Option<Todo>>, ApiError> {
    let updated = db.update_completion(id, input.completed).await?;
    match &updated {
        Some(_) => tracing::info!(%id, completed = input.completed, "updated todo"),
        None => tracing::debug!(%id, "update targeted unknown todo"),
    }
    Ok(Json(updated))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let existed = db.delete(id).await?;
    tracing::info!(%id, existed, "deleted todo");
    Ok(Json(DeleteResponse {
        message: DELETED_MESSAGE.to_string(),
    }))
}
