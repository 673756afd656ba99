use thiserror::Error;

/// Top-level error type for the `wikijs-api` crate.
///
/// Covers every failure mode of the client lifecycle: connecting,
/// initial setup, login, authenticated GraphQL calls, and decoding.
#[derive(Debug, Error)]
pub enum Error {
    // ── Lifecycle ───────────────────────────────────────────────────
    /// Host unreachable, or the root page did not answer 200.
    #[error("failed to connect to wikijs at {url}: {reason}")]
    Connection { url: String, reason: String },

    /// The one-time finalize call failed.
    #[error("setup failed: {message}")]
    Setup { message: String },

    /// Credentials rejected, or rate-limited twice in a row.
    #[error("Error logging in: {message}")]
    Login { message: String },

    // ── HTTP ────────────────────────────────────────────────────────
    /// The server answered with HTTP 4xx/5xx.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("error sending request: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// CA bundle could not be loaded or the HTTP client could not be built.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── GraphQL ─────────────────────────────────────────────────────
    /// A mutation came back with `responseResult.succeeded == false`.
    #[error("{operation} was rejected: {message}")]
    Remote {
        operation: &'static str,
        message: String,
    },

    /// A named remote entity (API key, strategy) does not exist.
    #[error("Did not find {kind} with name: {name}")]
    NotFound { kind: &'static str, name: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Decode { message: String, body: String },

    /// A request payload could not be serialized.
    #[error("Serialization error: {0}")]
    Encode(#[source] serde_json::Error),

    // ── Wrapping ────────────────────────────────────────────────────
    /// An inner error prefixed with the step that produced it.
    #[error("{context}: {source}")]
    Context {
        context: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Prefix this error with the step that produced it.
    pub fn context(self, context: &'static str) -> Self {
        Self::Context {
            context,
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through any [`Error::Context`] layers.
    pub fn root(&self) -> &Self {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// HTTP status code, if this error came from an HTTP response.
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self.root() {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.root(),
            Self::NotFound { .. } | Self::Api { status: 404, .. }
        )
    }

    /// Returns `true` if authentication was refused.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.root(),
            Self::Login { .. } | Self::Api { status: 401 | 403, .. }
        )
    }
}
