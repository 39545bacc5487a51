//! Configuration types for the sentinel panel

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable consulted when the config file carries no password
pub const PASSWORD_ENV_VAR: &str = "SENTINEL_PASSWORD";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

/// Where the Sentinel API lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            login_path: default_login_path(),
            api_prefix: default_api_prefix(),
            timeout: default_timeout(),
        }
    }
}

impl ApiConfig {
    /// Absolute URL of the login endpoint
    pub fn login_url(&self) -> String {
        join_url(&self.base_url, &self.login_path)
    }

    /// Absolute URL of a resource below the API prefix, e.g. `user/42`
    pub fn resource_url(&self, path: &str) -> String {
        let prefix = join_url(&self.base_url, &self.api_prefix);
        join_url(&prefix, path)
    }
}

/// Login credentials used by the command-line front end
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Config {
    /// Fill a missing password from `SENTINEL_PASSWORD`
    pub fn resolve_secrets(&mut self) -> crate::Result<()> {
        self.resolve_secrets_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_secrets_with<F>(&mut self, lookup: F) -> crate::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.credentials.password.is_some() {
            return Ok(());
        }
        if let Some(password) = lookup(PASSWORD_ENV_VAR) {
            if password.is_empty() {
                return Err(crate::PanelError::Config(format!(
                    "{} is set but empty",
                    PASSWORD_ENV_VAR
                )));
            }
            tracing::debug!("Using password from {}", PASSWORD_ENV_VAR);
            self.credentials.password = Some(password);
        }
        Ok(())
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

fn default_base_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::PanelError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
