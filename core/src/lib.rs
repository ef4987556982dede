//! Synchronous API client core and client-side state for the todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `TodoClient` is stateless: it holds only `base_url`.
//! - Each CRUD operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `state` is a pure reducer: user intents and server results go in as
//!   `Msg`, requested network work comes out as `Effect`.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod bulk;
pub mod client;
pub mod error;
pub mod http;
pub mod state;
pub mod types;

pub use bulk::{delete_sequentially, BulkDeleteReport};
pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use state::{update, AppState, Confirmation, Counts, Effect, Msg};
pub use types::{CreateTodo, DeleteConfirmation, Todo, UpdateTodo};
