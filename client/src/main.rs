use clap::Parser;
use todo_client::{Config, UreqTransport};
use todo_core::TodoClient;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Opt-in via RUST_LOG; stderr keeps log lines out of the rendered screen.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = Config::parse();
    let client = TodoClient::new(&config.api_base);
    todo_client::run(client, UreqTransport::new(), std::io::stdout())
}
