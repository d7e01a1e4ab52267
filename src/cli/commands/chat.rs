use anyhow::Result;

use crate::chat::ChatSession;
use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};

pub struct ChatOptions {
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub search_endpoint: Option<String>,
}

pub async fn run_chat(options: ChatOptions) -> Result<()> {
    let config = load_session_config(options)?;
    let mut session = ChatSession::new(config);
    session.run().await
}

fn load_session_config(options: ChatOptions) -> Result<ResolvedConfig> {
    let manager = ConfigManager::new()?;
    let file_config = manager.load_or_default();
    tracing::debug!(path = %manager.config_path().display(), "loaded configuration");

    let resolve_options = ResolveOptions {
        model: options.model,
        endpoint: options.endpoint,
        search_endpoint: options.search_endpoint,
    };
    Ok(resolve_config(&resolve_options, &file_config))
}
