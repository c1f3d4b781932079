//! Application configuration.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables. `WIREBOX_MAIL__FROM_ADDRESS=ops@example.org`
//! overrides `mail.from_address`.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

pub const DEFAULT_ENV_PREFIX: &str = "WIREBOX_";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub mail: MailerSettings,
    pub session: SessionSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub url: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: String::from("Darkheim"),
            url: String::from("http://localhost"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub dsn: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            dsn: String::from("memory://default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailerSettings {
    pub from_address: String,
    pub from_name: String,
}

impl Default for MailerSettings {
    fn default() -> Self {
        Self {
            from_address: String::from("noreply@localhost"),
            from_name: String::from("Darkheim"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub lifetime_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            lifetime_secs: 7200,
        }
    }
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ConfigError {
    #[snafu(display("could not extract the configuration"))]
    #[non_exhaustive]
    Extract { source: Box<figment::Error> },
    #[snafu(display("invalid configuration: {message}"))]
    #[non_exhaustive]
    Validation { message: String },
}

/// Loads an [`AppConfig`] from its layered sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: String::from(DEFAULT_ENV_PREFIX),
        }
    }

    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// The merged configuration sources, later ones overriding earlier ones.
    pub fn figment(&self) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(path) = &self.config_path {
            if path.exists() {
                tracing::debug!(path = %path.display(), "configuration file loaded");
                figment = figment.merge(Toml::file(path));
            } else {
                tracing::warn!(path = %path.display(), "configuration file not found, skipped");
            }
        }

        figment.merge(Env::prefixed(&self.env_prefix).split("__"))
    }

    /// # Errors
    ///
    /// Returns an error if a source is malformed or the result is invalid.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let config: AppConfig = self
            .figment()
            .extract()
            .map_err(Box::new)
            .context(ExtractSnafu)?;
        validate(&config)?;
        Ok(config)
    }
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    ensure!(
        !config.app.name.trim().is_empty(),
        ValidationSnafu {
            message: "app.name must not be empty"
        }
    );
    ensure!(
        config.mail.from_address.contains('@'),
        ValidationSnafu {
            message: format!("mail.from_address `{}` is not an address", config.mail.from_address)
        }
    );
    ensure!(
        config.session.lifetime_secs > 0,
        ValidationSnafu {
            message: "session.lifetime_secs must be positive"
        }
    );
    Ok(())
}
