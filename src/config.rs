//! Layered configuration for the dealflow core.
//!
//! Sources, lowest to highest precedence: embedded defaults, the project
//! file `dealflow.toml`, the user file `~/.config/dealflow/config.toml`,
//! an explicit config path, and `DEALFLOW_`-prefixed environment variables
//! (`__` separates nesting, e.g. `DEALFLOW_STORE__URL`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::store::{ENV_SUPABASE_ACCESS_TOKEN, ENV_SUPABASE_ANON_KEY};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub bindings: BindingsConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Remote store connection settings.
///
/// Config files carry the names of the env vars holding keys, never the
/// keys themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project root URL, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: String,

    /// Env var holding the publishable (anon) API key
    #[serde(default = "default_anon_key_env")]
    pub anon_key_env: String,

    /// Env var holding a user JWT for authenticated access; requests fall
    /// back to the anon key when it is unset
    #[serde(default = "default_access_token_env")]
    pub access_token_env: String,

    /// Postgres schema exposed through the REST endpoint
    #[serde(default = "default_schema")]
    pub schema: String,
}

fn default_anon_key_env() -> String {
    ENV_SUPABASE_ANON_KEY.to_string()
}

fn default_access_token_env() -> String {
    ENV_SUPABASE_ACCESS_TOKEN.to_string()
}

fn default_schema() -> String {
    "public".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key_env: default_anon_key_env(),
            access_token_env: default_access_token_env(),
            schema: default_schema(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to a file under the state directory (false = stderr)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

/// Output settings for the `generate_types` binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingsConfig {
    /// Directory the TypeScript bindings are written to
    #[serde(default = "default_bindings_out_dir")]
    pub out_dir: String,
}

fn default_bindings_out_dir() -> String {
    "bindings".to_string()
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            out_dir: default_bindings_out_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// State directory; logs live under it
    #[serde(default = "default_state_path")]
    pub state: String,
}

fn default_state_path() -> String {
    ".dealflow".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state: default_state_path(),
        }
    }
}

impl Config {
    /// Path to the project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from("dealflow.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so the core works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        // Project config next to the dashboard checkout
        let project_config = Self::project_config_path();
        if project_config.exists() {
            builder = builder.add_source(config::File::from(project_config));
        }

        // User config in ~/.config/dealflow/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("dealflow").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with DEALFLOW_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("DEALFLOW")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config to the project file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::project_config_path();

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(&config_path, toml_str).context("Failed to write config file")?;

        Ok(())
    }

    /// Get absolute path to the state directory
    pub fn state_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.paths.state);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    /// Get absolute path to the logs directory
    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }

    /// Get absolute path to the bindings output directory
    pub fn bindings_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.bindings.out_dir);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }
}
