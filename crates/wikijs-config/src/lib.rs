//! Connection settings for Wiki.js tools.
//!
//! A TOML file plus `WIKIJS_*` environment fallbacks, validated and turned
//! into a `wikijs_api::ClientConfig`. Values from the file win over the
//! environment; the CLI applies its own flags on top of both.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wikijs_api::{ClientConfig, RetryPolicy, TransportConfig};

/// Prefix of every environment variable this crate reads.
pub const ENV_PREFIX: &str = "WIKIJS_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("no {field} configured: set `{field}` in the config file or {env}")]
    Missing {
        field: &'static str,
        env: &'static str,
    },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Connection settings as loaded, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the instance (`WIKIJS_HOST`).
    pub host: Option<String>,

    /// Admin email (`WIKIJS_USERNAME`).
    pub username: Option<String>,

    /// Admin password (`WIKIJS_PASSWORD`). Prefer the environment over the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Run the first-start setup when the instance still needs it.
    pub initial_setup: bool,

    /// Per-request timeout in seconds.
    pub client_timeout: u64,

    /// Inline PEM bundle to trust instead of the system roots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<String>,

    /// Path to a PEM bundle; mutually exclusive with `ca_cert`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert_file: Option<PathBuf>,

    /// Attempts per request before giving up.
    pub retry_attempts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: None,
            username: None,
            password: None,
            initial_setup: false,
            client_timeout: 30,
            ca_cert: None,
            ca_cert_file: None,
            retry_attempts: RetryPolicy::default().max_attempts,
        }
    }
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "wikijs", "wikijs-admin").map_or_else(
        || PathBuf::from(".wikijs-admin").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

impl Settings {
    /// Load from the default config path and the environment.
    ///
    /// A missing file is not an error; the environment alone may be enough.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_path())
    }

    /// Load from `path` and the environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::figment(path).extract()?)
    }

    /// Defaults, then `WIKIJS_*` variables, then the file.
    pub fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Toml::file(path))
    }

    /// The validated host URL, without resolving credentials.
    pub fn host(&self) -> Result<&str, ConfigError> {
        let host = required(self.host.as_deref(), "host", "WIKIJS_HOST")?;
        let url = url::Url::parse(host).map_err(|e| ConfigError::Validation {
            field: "host",
            reason: format!("'{host}' is not a URL: {e}"),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "host",
                reason: format!("unsupported scheme '{}', expected http or https", url.scheme()),
            });
        }
        Ok(host)
    }

    /// Timeout, retry and trust settings; enough for an unauthenticated probe.
    pub fn transport(&self) -> Result<TransportConfig, ConfigError> {
        if self.client_timeout == 0 {
            return Err(ConfigError::Validation {
                field: "client_timeout",
                reason: "must be at least 1 second".into(),
            });
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::Validation {
                field: "retry_attempts",
                reason: "must be at least 1".into(),
            });
        }

        Ok(TransportConfig {
            timeout: Duration::from_secs(self.client_timeout),
            ca_cert_pem: self.ca_cert_pem()?,
            retry: RetryPolicy {
                max_attempts: self.retry_attempts,
                ..RetryPolicy::default()
            },
        })
    }

    /// Validate and build the client configuration.
    pub fn resolve(&self) -> Result<ClientConfig, ConfigError> {
        let host = self.host()?;
        let username = required(self.username.as_deref(), "username", "WIKIJS_USERNAME")?;
        let password = required(self.password.as_deref(), "password", "WIKIJS_PASSWORD")?;
        let transport = self.transport()?;

        Ok(ClientConfig {
            initial_setup: self.initial_setup,
            timeout: transport.timeout,
            ca_cert_pem: transport.ca_cert_pem,
            retry: transport.retry,
            ..ClientConfig::new(host, username, SecretString::from(password.to_owned()))
        })
    }

    /// The settings as TOML, with the password masked.
    pub fn to_redacted_toml(&self) -> Result<String, ConfigError> {
        let mut shown = self.clone();
        if shown.password.is_some() {
            shown.password = Some("********".into());
        }
        if shown.ca_cert.is_some() {
            shown.ca_cert = Some("<inline PEM>".into());
        }
        Ok(toml::to_string_pretty(&shown)?)
    }

    fn ca_cert_pem(&self) -> Result<Option<String>, ConfigError> {
        match (&self.ca_cert, &self.ca_cert_file) {
            (Some(_), Some(_)) => Err(ConfigError::Validation {
                field: "ca_cert",
                reason: "set either ca_cert or ca_cert_file, not both".into(),
            }),
            (Some(pem), None) => Ok(Some(pem.clone()).filter(|p| !p.trim().is_empty())),
            (None, Some(path)) => std::fs::read_to_string(path)
                .map(Some)
                .map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                }),
            (None, None) => Ok(None),
        }
    }
}

fn required<'a>(
    value: Option<&'a str>,
    field: &'static str,
    env: &'static str,
) -> Result<&'a str, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing { field, env })
}
