//! Terminal client for the todo service.
//!
//! # Overview
//! Reads line commands from stdin, turns them into `todo_core::Msg` values,
//! and runs the reducer's effects on worker threads over HTTP. Results come
//! back through the same channel as input, so one loop owns `AppState` and
//! re-renders after every event.

pub mod app;
pub mod config;
pub mod effects;
pub mod input;
pub mod render;
pub mod transport;

pub use app::{run, run_with_input};
pub use config::Config;
pub use effects::Effects;
pub use transport::{Transport, UreqTransport};
