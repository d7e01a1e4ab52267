mod manager;

pub use manager::{
    ConfigFile, ConfigManager, DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MODEL,
    DEFAULT_SEARCH_ENDPOINT, OmniConfig, ResolveOptions, ResolvedConfig, resolve_config,
};
