//! Client-side view state and its reducer.
//!
//! # Design
//! `update` is pure: it applies one `Msg` to `AppState` and may ask for one
//! `Effect`. The runtime executes effects and feeds their results back as
//! `Msg` values, so the rendering side never touches the network.
//!
//! Local state changes only on server truth. Toggles are not flipped before
//! the response arrives, and every response is applied by record id, so a late
//! reply cannot clobber an unrelated item.

use uuid::Uuid;

use crate::bulk::BulkDeleteReport;
use crate::error::ApiError;
use crate::types::Todo;

pub const LOAD_FAILED: &str = "Failed to load todos. Make sure the backend is running.";
pub const ADD_FAILED: &str = "Failed to add todo. Please try again.";
pub const UPDATE_FAILED: &str = "Failed to update todo.";
pub const DELETE_FAILED: &str = "Failed to delete todo.";
pub const CLEAR_FAILED: &str = "Failed to clear completed todos.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub todos: Vec<Todo>,
    pub draft_text: String,
    pub is_submitting: bool,
    pub error_message: Option<String>,
    pub pending_confirmation: Option<Confirmation>,
}

/// A destructive action waiting for the user to say yes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Delete(Uuid),
    ClearCompleted(Vec<Uuid>),
}

impl Confirmation {
    pub fn prompt(&self) -> String {
        match self {
            Confirmation::Delete(_) => "Are you sure you want to delete this todo?".to_string(),
            Confirmation::ClearCompleted(ids) => {
                format!("Delete {} completed todo(s)?", ids.len())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

#[derive(Debug)]
pub enum Msg {
    Mounted,
    Refresh,
    DraftChanged(String),
    Submit,
    Toggle(Uuid),
    DeleteRequested(Uuid),
    ClearCompletedRequested,
    Confirm,
    Cancel,
    DismissError,

    Loaded(Result<Vec<Todo>, ApiError>),
    Created(Result<Todo, ApiError>),
    Toggled {
        id: Uuid,
        result: Result<Option<Todo>, ApiError>,
    },
    Deleted {
        id: Uuid,
        result: Result<(), ApiError>,
    },
    ClearedCompleted(BulkDeleteReport),
}

/// Network work requested by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchAll,
    Create { text: String },
    SetCompleted { id: Uuid, completed: bool },
    Delete { id: Uuid },
    DeleteMany(Vec<Uuid>),
}

impl AppState {
    pub fn counts(&self) -> Counts {
        let completed = self.todos.iter().filter(|t| t.completed).count();
        Counts {
            total: self.todos.len(),
            pending: self.todos.len() - completed,
            completed,
        }
    }

    pub fn find(&self, id: Uuid) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// The add control is usable only with non-blank text and no create in flight.
    pub fn can_submit(&self) -> bool {
        !self.is_submitting && !self.draft_text.trim().is_empty()
    }

    fn fail(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }
}

pub fn update(state: &mut AppState, msg: Msg) -> Option<Effect> {
    match msg {
        Msg::Mounted | Msg::Refresh => {
            state.error_message = None;
            Some(Effect::FetchAll)
        }
        Msg::DraftChanged(text) => {
            // The draft being sent stays put until the create settles.
            if !state.is_submitting {
                state.draft_text = text;
            }
            None
        }
        Msg::Submit => {
            if !state.can_submit() {
                return None;
            }
            state.is_submitting = true;
            state.error_message = None;
            Some(Effect::Create {
                text: state.draft_text.clone(),
            })
        }
        Msg::Toggle(id) => {
            let completed = !state.find(id)?.completed;
            state.error_message = None;
            Some(Effect::SetCompleted { id, completed })
        }
        Msg::DeleteRequested(id) => {
            state.find(id)?;
            state.pending_confirmation = Some(Confirmation::Delete(id));
            None
        }
        Msg::ClearCompletedRequested => {
            let ids: Vec<Uuid> = state
                .todos
                .iter()
                .filter(|t| t.completed)
                .map(|t| t.id)
                .collect();
            if !ids.is_empty() {
                state.pending_confirmation = Some(Confirmation::ClearCompleted(ids));
            }
            None
        }
        Msg::Confirm => {
            let effect = match state.pending_confirmation.take()? {
                Confirmation::Delete(id) => Effect::Delete { id },
                Confirmation::ClearCompleted(ids) => Effect::DeleteMany(ids),
            };
            state.error_message = None;
            Some(effect)
        }
        Msg::Cancel => {
            state.pending_confirmation = None;
            None
        }
        Msg::DismissError => {
            state.error_message = None;
            None
        }

        Msg::Loaded(Ok(todos)) => {
            state.todos = todos;
            None
        }
        Msg::Loaded(Err(_)) => {
            state.fail(LOAD_FAILED);
            None
        }
        Msg::Created(result) => {
            state.is_submitting = false;
            match result {
                Ok(todo) => {
                    state.todos.insert(0, todo);
                    state.draft_text.clear();
                }
                Err(_) => state.fail(ADD_FAILED),
            }
            None
        }
        Msg::Toggled { id, result } => {
            match result {
                Ok(Some(todo)) => {
                    if let Some(slot) = state.todos.iter_mut().find(|t| t.id == id) {
                        *slot = todo;
                    }
                }
                // Unknown id: the server answered null. Keep the stale row.
                Ok(None) | Err(_) => state.fail(UPDATE_FAILED),
            }
            None
        }
        Msg::Deleted { id, result } => {
            match result {
                Ok(()) => state.todos.retain(|t| t.id != id),
                Err(_) => state.fail(DELETE_FAILED),
            }
            None
        }
        Msg::ClearedCompleted(report) => {
            state.todos.retain(|t| !report.deleted.contains(&t.id));
            if !report.is_complete() {
                if report.deleted.is_empty() {
                    state.fail(CLEAR_FAILED);
                } else {
                    state.fail(format!(
                        "{CLEAR_FAILED} ({} deleted before the error)",
                        report.deleted.len()
                    ));
                }
            }
            None
        }
    }
}
