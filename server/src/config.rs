//! Command-line and environment configuration for the server binary.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::error::StoreError;
use crate::store::{MemoryStore, SqliteStore};
use crate::Db;

#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", version, about = "REST API for the todo list")]
pub struct Config {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 5001)]
    pub port: u16,

    /// SQLite database file. Created if missing.
    #[arg(long, env = "TODO_DATABASE", default_value = "todos.db")]
    pub database: PathBuf,

    /// Keep todos in memory only; `--database` is ignored.
    #[arg(long)]
    pub in_memory: bool,
}

impl Config {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn open_store(&self) -> Result<Db, StoreError> {
        if self.in_memory {
            tracing::warn!("using in-memory store; todos will not persist");
            return Ok(Arc::new(MemoryStore::new()));
        }
        Ok(Arc::new(SqliteStore::open(&self.database)?))
    }
}
