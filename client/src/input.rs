//! Line commands typed at the prompt.

use std::str::FromStr;

use thiserror::Error;
use todo_core::{AppState, Msg};

pub const HELP: &str = "\
commands:
  add <text>     add a todo
  toggle <n>     mark row n done / not done
  delete <n>     delete row n (asks first)
  clear          delete all completed todos (asks first)
  refresh        reload the list from the server
  y | n          answer a pending question
  dismiss        hide the error banner
  help           show this text
  quit           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Toggle(usize),
    Delete(usize),
    Clear,
    Refresh,
    Yes,
    No,
    Dismiss,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`; type `help`")]
    Unknown(String),

    #[error("`{0}` needs a row number")]
    MissingRow(&'static str),

    #[error("invalid row number `{0}`")]
    BadRow(String),

    #[error("no row {0}")]
    NoSuchRow(usize),

    #[error("still adding the previous todo; try again when it finishes")]
    StillAdding,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest),
            None => (line.trim_end(), ""),
        };
        match word.to_ascii_lowercase().as_str() {
            "add" | "a" => Ok(Command::Add(rest.trim_end_matches('\r').to_string())),
            "toggle" | "t" => row(rest, "toggle").map(Command::Toggle),
            "delete" | "del" | "d" => row(rest, "delete").map(Command::Delete),
            "clear" => Ok(Command::Clear),
            "refresh" | "r" => Ok(Command::Refresh),
            "y" | "yes" => Ok(Command::Yes),
            "n" | "no" => Ok(Command::No),
            "dismiss" => Ok(Command::Dismiss),
            "help" | "?" | "" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn row(arg: &str, command: &'static str) -> Result<usize, CommandError> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(CommandError::MissingRow(command));
    }
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::BadRow(arg.to_string())),
    }
}

impl Command {
    /// Translate into reducer messages. Row numbers are 1-based positions in
    /// the list as currently shown.
    pub fn into_msgs(self, state: &AppState) -> Result<Vec<Msg>, CommandError> {
        let msgs = match self {
            Command::Add(_) if state.is_submitting => return Err(CommandError::StillAdding),
            Command::Add(text) => vec![Msg::DraftChanged(text), Msg::Submit],
            Command::Toggle(n) => vec![Msg::Toggle(row_id(state, n)?)],
            Command::Delete(n) => vec![Msg::DeleteRequested(row_id(state, n)?)],
            Command::Clear => vec![Msg::ClearCompletedRequested],
            Command::Refresh => vec![Msg::Refresh],
            Command::Yes => vec![Msg::Confirm],
            Command::No => vec![Msg::Cancel],
            Command::Dismiss => vec![Msg::DismissError],
            Command::Help | Command::Quit => Vec::new(),
        };
        Ok(msgs)
    }
}

fn row_id(state: &AppState, n: usize) -> Result<uuid::Uuid, CommandError> {
    state
        .todos
        .get(n - 1)
        .map(|t| t.id)
        .ok_or(CommandError::NoSuchRow(n))
}
