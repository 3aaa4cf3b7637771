//! Runs the utility-bill analysis once against the live service.
//!
//! Requires `OPENAI_API_KEY` (a `.env` file is honoured) and the input CSV at
//! `data/optima_sonoran.csv`. Set `RUST_LOG=bill_analyst=debug` for request logs.
//!
//! Usage:
//! `cargo run`

use bill_analyst::assistant::TerminalInput;
use bill_analyst::{run_analysis, AnalystConfig, OpenAiClient};
use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file if it exists.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let client = OpenAiClient::new(None)?;
    let config = AnalystConfig::default();

    let mut out = io::stdout();

    // Piped answers are read line by line so end of input stops the menu.
    let stdin = io::stdin();
    if stdin.is_terminal() {
        run_analysis(&client, &config, &mut TerminalInput, &mut out).await?;
    } else {
        run_analysis(&client, &config, &mut stdin.lock(), &mut out).await?;
    }
    Ok(())
}
