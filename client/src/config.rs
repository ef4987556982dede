use clap::Parser;

pub const DEV_API_BASE: &str = "http://localhost:5001/api";

#[derive(Debug, Clone, Parser)]
#[command(name = "todo-client", version, about = "Terminal client for the todo list")]
pub struct Config {
    /// Base URL of the API, including the `/api` prefix.
    #[arg(long, env = "TODO_API_BASE", default_value = DEV_API_BASE)]
    pub api_base: String,
}
