use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::completion::SYSTEM_PROMPT;
use crate::paths;

pub const DEFAULT_MODEL: &str = "anthropic/claude-3.7-sonnet:thinking";
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.duckduckgo.com/";
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Settings in the `[omni]` section of config.toml.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OmniConfig {
    /// Model identifier sent with every completion request.
    pub model: Option<String>,
    /// Chat completions URL (OpenAI-compatible, streaming).
    pub endpoint: Option<String>,
    /// Instant-answer search URL.
    pub search_endpoint: Option<String>,
    /// Environment variable holding the bearer credential.
    pub api_key_env: Option<String>,
    /// System prompt seeded as the first transcript message.
    pub system_prompt: Option<String>,
    /// Initial state of the diff display toggle.
    pub diff: Option<bool>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/omni/config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub omni: OmniConfig,
}

/// Resolved configuration after merging CLI arguments, config file and defaults.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub model: String,
    pub endpoint: String,
    pub search_endpoint: String,
    /// The bearer credential, if the environment provided one.
    pub api_key: Option<String>,
    pub system_prompt: String,
    pub diff_enabled: bool,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub search_endpoint: Option<String>,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// Nothing here is mandatory: every key falls back to a built-in default, and a
/// missing credential is left for the remote service to reject.
pub fn resolve_config(options: &ResolveOptions, config_file: &ConfigFile) -> ResolvedConfig {
    let file = &config_file.omni;

    let model = options
        .model
        .clone()
        .or_else(|| file.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let endpoint = options
        .endpoint
        .clone()
        .or_else(|| file.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let search_endpoint = options
        .search_endpoint
        .clone()
        .or_else(|| file.search_endpoint.clone())
        .unwrap_or_else(|| DEFAULT_SEARCH_ENDPOINT.to_string());

    let api_key_env = file.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV);
    let api_key = std::env::var(api_key_env).ok().filter(|key| !key.is_empty());
    if api_key.is_none() {
        tracing::debug!(api_key_env, "no API key in environment");
    }

    ResolvedConfig {
        model,
        endpoint,
        search_endpoint,
        api_key,
        system_prompt: file
            .system_prompt
            .clone()
            .unwrap_or_else(|| SYSTEM_PROMPT.to_string()),
        diff_enabled: file.diff.unwrap_or(true),
    }
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/omni/config.toml`
    /// or `~/.config/omni/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    /// Loads the config file, falling back to defaults.
    ///
    /// A missing file is silent; an unreadable or malformed one is logged.
    pub fn load_or_default(&self) -> ConfigFile {
        if !self.config_path.exists() {
            return ConfigFile::default();
        }
        self.load().unwrap_or_else(|e| {
            tracing::warn!("{e:#}; using defaults");
            ConfigFile::default()
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager {
            config_path: temp_dir.path().join("config.toml"),
        }
    }

    #[test]
    fn test_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(
            manager.config_path(),
            r#"[omni]
model = "openai/gpt-4o"
endpoint = "http://localhost:11434/v1/chat/completions"
diff = false
"#,
        )
        .unwrap();

        let loaded = manager.load().unwrap();

        assert_eq!(loaded.omni.model.as_deref(), Some("openai/gpt-4o"));
        assert_eq!(
            loaded.omni.endpoint.as_deref(),
            Some("http://localhost:11434/v1/chat/completions")
        );
        assert_eq!(loaded.omni.diff, Some(false));
        assert!(loaded.omni.system_prompt.is_none());
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.load().is_err());
        assert!(manager.load_or_default().omni.model.is_none());
    }

    #[test]
    fn test_load_or_default_malformed_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), "[omni\nmodel = ").unwrap();

        assert!(manager.load().is_err());
        assert!(manager.load_or_default().omni.model.is_none());
    }

    #[test]
    #[serial]
    fn test_resolve_config_defaults() {
        unsafe { std::env::remove_var(DEFAULT_API_KEY_ENV) };

        let resolved = resolve_config(&ResolveOptions::default(), &ConfigFile::default());

        assert_eq!(resolved.model, DEFAULT_MODEL);
        assert_eq!(resolved.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(resolved.search_endpoint, DEFAULT_SEARCH_ENDPOINT);
        assert_eq!(resolved.system_prompt, SYSTEM_PROMPT);
        assert!(resolved.diff_enabled);
        assert!(resolved.api_key.is_none());
    }

    #[test]
    #[serial]
    fn test_resolve_config_cli_overrides_file() {
        let options = ResolveOptions {
            model: Some("cli-model".to_string()),
            endpoint: None,
            search_endpoint: None,
        };
        let config = ConfigFile {
            omni: OmniConfig {
                model: Some("file-model".to_string()),
                endpoint: Some("http://file".to_string()),
                ..OmniConfig::default()
            },
        };

        let resolved = resolve_config(&options, &config);

        assert_eq!(resolved.model, "cli-model");
        assert_eq!(resolved.endpoint, "http://file");
    }

    #[test]
    #[serial]
    fn test_resolve_config_api_key_from_custom_env() {
        unsafe { std::env::set_var("OMNI_TEST_API_KEY", "test-key-value") };

        let config = ConfigFile {
            omni: OmniConfig {
                api_key_env: Some("OMNI_TEST_API_KEY".to_string()),
                ..OmniConfig::default()
            },
        };
        let resolved = resolve_config(&ResolveOptions::default(), &config);
        assert_eq!(resolved.api_key.as_deref(), Some("test-key-value"));

        unsafe { std::env::remove_var("OMNI_TEST_API_KEY") };
    }

    #[test]
    #[serial]
    fn test_resolve_config_empty_api_key_is_absent() {
        unsafe { std::env::set_var("OMNI_TEST_EMPTY_KEY", "") };

        let config = ConfigFile {
            omni: OmniConfig {
                api_key_env: Some("OMNI_TEST_EMPTY_KEY".to_string()),
                ..OmniConfig::default()
            },
        };
        assert!(
            resolve_config(&ResolveOptions::default(), &config)
                .api_key
                .is_none()
        );

        unsafe { std::env::remove_var("OMNI_TEST_EMPTY_KEY") };
    }
}
