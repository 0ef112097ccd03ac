use config::{Config as ConfigLoader, ConfigError, Environment, File};
use quorum_client::ClientConfig;
use quorum_search::SearchConfig;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ClientConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(skip)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. QUORUM_<SECTION>__<KEY> environment variables, e.g. QUORUM_API__BASE_URL
    ///
    /// QUORUM_TOKEN and QUORUM_PASSWORD are read separately and never come from files.
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("QUORUM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;
        cfg.apply_secrets(
            std::env::var("QUORUM_TOKEN").ok(),
            std::env::var("QUORUM_PASSWORD").ok(),
        );
        Ok(cfg)
    }

    /// Load config from a single file, without env overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    pub fn apply_secrets(&mut self, token: Option<String>, password: Option<String>) {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.api.token = Some(token);
        }
        self.password = password.filter(|p| !p.is_empty());
    }

    /// Email and password when both are present
    pub fn credentials(&self) -> Option<quorum_types::Credentials> {
        match (&self.auth.email, &self.password) {
            (Some(email), Some(password)) => {
                Some(quorum_types::Credentials::new(email.clone(), password.clone()))
            }
            _ => None,
        }
    }
}
