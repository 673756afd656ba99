//! CLI error types with miette diagnostics.
//!
//! Maps `wikijs_api::Error` and `wikijs_config::ConfigError` into
//! user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use wikijs_api::Error as ApiError;
use wikijs_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to Wiki.js at {url}")]
    #[diagnostic(
        code(wikijs::connection_failed),
        help(
            "Check that Wiki.js is running and reachable.\n\
             URL: {url}\n\
             Try: wikijs status --host {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: ApiError,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(wikijs::tls_error),
        help("Check that ca_cert / --ca-cert-file holds a valid PEM bundle.")
    )]
    Tls { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(wikijs::auth_failed),
        help(
            "Verify the admin email and password.\n\
             Set them with --username/--password, in the config file, or via\n\
             WIKIJS_USERNAME / WIKIJS_PASSWORD."
        )
    )]
    AuthFailed {
        #[source]
        source: ApiError,
    },

    #[error("No {field} configured")]
    #[diagnostic(
        code(wikijs::no_credentials),
        help("Pass --{field}, set `{field}` in {path}, or export {env}.")
    )]
    NoCredentials {
        field: &'static str,
        env: &'static str,
        path: String,
    },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(wikijs::not_found),
        help("Run: wikijs {list_command} to see available keys")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(wikijs::api_error))]
    Api(ApiError),

    // ── Configuration ────────────────────────────────────────────────
    #[error("No Wiki.js host configured")]
    #[diagnostic(
        code(wikijs::no_config),
        help(
            "Pass --host, export WIKIJS_HOST, or create a config file.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wikijs::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(wikijs::config))]
    Config(ConfigError),

    // ── Output ───────────────────────────────────────────────────────
    #[error("failed to render output: {0}")]
    #[diagnostic(code(wikijs::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Tls { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Missing { field: "host", .. } => CliError::NoConfig {
                path: wikijs_config::config_path().display().to_string(),
            },
            ConfigError::Missing { field, env } => CliError::NoCredentials {
                field,
                env,
                path: wikijs_config::config_path().display().to_string(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation {
                field: field.into(),
                reason,
            },
            other => CliError::Config(other),
        }
    }
}

// ── ApiError → CliError mapping ──────────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err.root() {
            ApiError::Connection { url, .. } => CliError::ConnectionFailed {
                url: url.clone(),
                source: err,
            },
            ApiError::Tls(message) => CliError::Tls {
                message: message.clone(),
            },
            ApiError::InvalidUrl(e) => CliError::Validation {
                field: "host".into(),
                reason: e.to_string(),
            },
            ApiError::NotFound { kind, name } => CliError::NotFound {
                resource_type: (*kind).to_owned(),
                identifier: name.clone(),
                list_command: "strategies".into(),
            },
            _ if err.is_auth_failure() => CliError::AuthFailed { source: err },
            _ => CliError::Api(err),
        }
    }
}
