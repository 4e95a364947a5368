use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "IDEAS_ENV";
const CONFIG_DIR_ENV: &str = "IDEAS_CONFIG_DIR";
const ENV_PREFIX: &str = "IDEAS";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub ideas: IdeasSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and environment overlay.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            // Default to repo root `config` directory.
            Err(_) => std::env::current_dir()
                .with_context(|| "unable to resolve current directory")?
                .join("config"),
        };

        Self::load_from(config_dir, &environment)
    }

    /// Load `base.toml` and `{environment}.toml` from `config_dir`, then
    /// apply `IDEAS_*` environment variables (`__` separates nested keys).
    pub fn load_from(config_dir: impl Into<PathBuf>, environment: &str) -> anyhow::Result<Self> {
        let config_dir = config_dir.into();
        let parsed_environment = Environment::parse(environment)?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // The environment name wins over any `environment` key in files.
        settings.environment = parsed_environment;

        tracing::debug!(
            dir = %config_dir.display(),
            env = ?settings.environment,
            "settings loaded"
        );

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// Filter directive used when `RUST_LOG` is not set
    #[serde(default = "TelemetrySettings::default_log_level")]
    pub log_level: String,
}

impl TelemetrySettings {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            log_level: Self::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// Seed bootstrap records into an empty store on startup
    #[serde(default = "StoreSettings::default_seed_fixtures")]
    pub seed_fixtures: bool,
    #[serde(default = "StoreSettings::default_event_capacity")]
    pub event_capacity: usize,
}

impl StoreSettings {
    fn default_seed_fixtures() -> bool {
        true
    }

    fn default_event_capacity() -> usize {
        64
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            seed_fixtures: Self::default_seed_fixtures(),
            event_capacity: Self::default_event_capacity(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct IdeasSettings {
    /// Reset the controller's title/body inputs after a successful add
    #[serde(default)]
    pub clear_inputs_after_add: bool,
}
