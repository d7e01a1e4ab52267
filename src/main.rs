use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use omni_cli::cli::Args;
use omni_cli::cli::commands::chat;

fn init_logging() {
    let default_level = "warn";
    let _ = tracing_subscriber::fmt()
        // Fall back to `default_level` if OMNI_LOG is unset or invalid
        .with_env_filter(
            EnvFilter::try_from_env("OMNI_LOG")
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // A local .env may carry the API key; a missing file is fine.
    dotenvy::dotenv().ok();
    init_logging();

    let args = Args::parse();

    let options = chat::ChatOptions {
        model: args.model,
        endpoint: args.endpoint,
        search_endpoint: args.search_endpoint,
    };
    chat::run_chat(options).await
}
