use secrecy::SecretString;

/// Secret material a [`WikijsClient`](crate::WikijsClient) accumulates while
/// it bootstraps. Owned by exactly one client and never serialized.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Admin account used for setup and login.
    pub admin_email: String,
    pub admin_password: Option<SecretString>,
    /// JWT returned by the last successful login.
    pub session_token: Option<SecretString>,
    /// API key issued after login; sent as `Authorization: Bearer`.
    pub api_token: Option<SecretString>,
    /// Name of the issued key, needed to revoke it.
    pub api_key_name: Option<String>,
}

/// Where a client is in its bootstrap sequence.
///
/// `Disconnected -> Connected -> SetupChecked -> (SetupPending ->) SetupComplete
/// -> LoggedIn -> Ready`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
    Disconnected,
    /// Root page answered 200.
    Connected,
    /// Setup state has been probed.
    SetupChecked,
    /// Finalize was posted and the server has not confirmed it yet.
    SetupPending,
    SetupComplete,
    /// A session JWT is installed in the cookie jar.
    LoggedIn,
    /// API enabled and an API key issued.
    Ready,
}

/// Name prefix of keys issued by [`WikijsClient::new`](crate::WikijsClient::new).
pub const API_KEY_PREFIX: &str = "terraform_";

/// Lifetime requested for issued keys.
pub const API_KEY_EXPIRATION: &str = "1y";

/// A fresh key name: the prefix plus 16 random alphanumerics, so that
/// concurrent clients never collide.
pub fn random_api_key_name() -> String {
    use rand::Rng;
    use rand::distr::Alphanumeric;

    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    format!("{API_KEY_PREFIX}{suffix}")
}
