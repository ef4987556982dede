//! Plain-text screen for the current state.

use std::fmt::Write;

use todo_core::AppState;

/// Render the whole screen. `notice` is a transient line for local input
/// errors; it is not part of `AppState`.
pub fn render(state: &AppState, base_url: &str, notice: Option<&str>) -> String {
    let mut out = String::new();
    let counts = state.counts();

    let _ = writeln!(out, "== Todo List ==");
    if let Some(error) = &state.error_message {
        let _ = writeln!(out, "! {error}  (type `dismiss` to hide)");
    }
    if let Some(notice) = notice {
        let _ = writeln!(out, "  {notice}");
    }
    let _ = writeln!(
        out,
        "Total: {}  Pending: {}  Completed: {}",
        counts.total, counts.pending, counts.completed
    );
    if state.is_submitting {
        let _ = writeln!(out, "Adding...");
    }

    if state.todos.is_empty() {
        let _ = writeln!(out, "No todos yet! Add your first one with `add <text>`.");
    } else {
        for (row, todo) in state.todos.iter().enumerate() {
            let mark = if todo.completed { 'x' } else { ' ' };
            let _ = writeln!(out, "{:>3}. [{mark}] {}", row + 1, todo.text);
        }
        let _ = writeln!(out, "(clear: {} completed, refresh: reload)", counts.completed);
    }

    let _ = writeln!(out, "Backend: {base_url}");
    if let Some(pending) = &state.pending_confirmation {
        let _ = write!(out, "{} [y/n] ", pending.prompt());
    } else {
        let _ = write!(out, "> ");
    }
    out
}
