// Wiki.js client: construction pipeline, teardown, and request helpers.
//
// Endpoint groups (session, API keys, strategies) are inherent methods
// implemented in their own modules; this one holds the shared plumbing.

use std::time::Duration;

use bytes::Bytes;
use reqwest::Method;
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use crate::auth::{API_KEY_EXPIRATION, Credentials, SessionState, random_api_key_name};
use crate::codec;
use crate::error::Error;
use crate::graphql::{AuthResponse, GraphQl, ResponseResult};
use crate::retry::RetryPolicy;
use crate::transport::{Response, Transport, TransportConfig};

/// Everything needed to bring a Wiki.js instance to a usable state.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the instance, e.g. `http://localhost:3000`.
    pub host: String,
    /// Admin email used for setup and login.
    pub username: String,
    pub password: SecretString,
    /// Run the first-start setup if the instance still needs it.
    pub initial_setup: bool,
    pub timeout: Duration,
    /// PEM bundle to trust instead of the system roots.
    pub ca_cert_pem: Option<String>,
    pub retry: RetryPolicy,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password,
            initial_setup: false,
            timeout: Duration::from_secs(30),
            ca_cert_pem: None,
            retry: RetryPolicy::default(),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            ca_cert_pem: self.ca_cert_pem.clone(),
            retry: self.retry,
        }
    }
}

/// Client for one Wiki.js instance.
///
/// [`WikijsClient::new`] runs the whole bootstrap (connect, optional setup,
/// login, enable the API, issue an API key) and only returns a client once
/// every step succeeded. [`WikijsClient::connect`] stops after the
/// connectivity check and leaves the remaining steps to the caller.
///
/// Operations that change the client's own credentials take `&mut self`;
/// share a client across tasks only behind a lock.
#[derive(Debug)]
pub struct WikijsClient {
    host: String,
    base_url: Url,
    pub(crate) transport: Transport,
    pub(crate) credentials: Credentials,
    pub(crate) state: SessionState,
}

impl WikijsClient {
    // ── Construction ─────────────────────────────────────────────────

    /// Connect and fully configure a client.
    pub async fn new(config: ClientConfig) -> Result<Self, Error> {
        let mut client = Self::connect(&config.host, &config.transport()).await?;

        if config.initial_setup {
            client
                .setup(&config.username, &config.password)
                .await
                .map_err(|e| e.context("failed to perform initial setup of wikijs"))?;
        }

        client
            .login(&config.username, &config.password)
            .await
            .map_err(|e| e.context("failed to login to wikijs"))?;

        client
            .set_api_feature(true)
            .await
            .map_err(|e| e.context("failed to enable API on wikijs"))?;

        let key_name = random_api_key_name();
        let key = client
            .create_api_key(&key_name, API_KEY_EXPIRATION, true)
            .await
            .map_err(|e| e.context("failed to create API key"))?;

        client.credentials.api_token = Some(key);
        client.credentials.api_key_name = Some(key_name);
        client.state = SessionState::Ready;

        info!(host = %client.host, key = ?client.credentials.api_key_name, "wikijs client configured");
        Ok(client)
    }

    /// Build the transport and check that `host` answers `GET /` with 200.
    pub async fn connect(host: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let host = host.trim_end_matches('/').to_owned();
        let base_url = Url::parse(&host)?;
        let transport = Transport::new(transport)?;

        let mut client = Self {
            host,
            base_url,
            transport,
            credentials: Credentials::default(),
            state: SessionState::Disconnected,
        };
        client.check_connection().await?;
        client.state = SessionState::Connected;
        Ok(client)
    }

    /// Revoke the API key issued during construction.
    ///
    /// A no-op when no key is tracked. On failure the key stays tracked.
    pub async fn cleanup(&mut self) -> Result<(), Error> {
        let Some(name) = self.credentials.api_key_name.clone() else {
            debug!("no API key to revoke");
            return Ok(());
        };

        self.revoke_api_key(&name).await?;
        info!(key = %name, "revoked API key");

        self.credentials.api_key_name = None;
        self.credentials.api_token = None;
        if self.state == SessionState::Ready {
            self.state = SessionState::LoggedIn;
        }
        Ok(())
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The host as configured, without a trailing slash.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// `true` once the API is enabled and a key has been issued.
    pub fn is_configured(&self) -> bool {
        self.state == SessionState::Ready
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Name of the API key this client issued and will revoke on cleanup.
    pub fn api_key_name(&self) -> Option<&str> {
        self.credentials.api_key_name.as_deref()
    }

    /// The `Cookie` header sent to the host, e.g. `jwt=...` after login.
    pub fn cookie_header(&self) -> Option<String> {
        self.transport.cookie_header(&self.base_url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// `{host}{path}`; `path` must start with `/`.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(Url::parse(&format!("{}{path}", self.host))?)
    }

    /// `GET {host}/` without credentials.
    pub(crate) async fn fetch_root(&self) -> Result<Response, Error> {
        let url = self.endpoint("/")?;
        self.transport.send(Method::GET, url, None, None).await
    }

    /// POST a JSON payload; the API token is attached when one is held.
    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &B,
    ) -> Result<Response, Error> {
        let url = self.endpoint(path)?;
        let body: Bytes = codec::encode(payload)?;
        self.transport
            .send(Method::POST, url, Some(body), self.credentials.api_token.as_ref())
            .await
    }

    /// POST a GraphQL document to `/graphql` and decode the answer.
    pub(crate) async fn graphql<V, T>(&self, request: &GraphQl<V>) -> Result<AuthResponse<T>, Error>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let resp = self.post("/graphql", request).await?;
        codec::decode(&resp.body)
    }

    /// Like [`graphql`](Self::graphql) but insists on a `data.authentication` payload.
    pub(crate) async fn graphql_payload<V, T>(
        &self,
        operation: &'static str,
        request: &GraphQl<V>,
    ) -> Result<T, Error>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let resp = self.graphql::<V, T>(request).await?;
        let message = resp.first_error().map(String::from);
        resp.authentication().ok_or_else(|| Error::Remote {
            operation,
            message: message.unwrap_or_else(|| "empty response".into()),
        })
    }
}

/// Turn a mutation's `responseResult` into a `Result`.
///
/// A missing block counts as success; the server only omits it when the
/// mutation itself was not reached, which surfaces as a GraphQL error earlier.
pub(crate) fn check_result(
    operation: &'static str,
    result: Option<ResponseResult>,
) -> Result<(), Error> {
    match result {
        Some(r) if !r.succeeded => Err(Error::Remote {
            operation,
            message: r
                .message
                .filter(|m| !m.is_empty())
                .or(r.slug)
                .unwrap_or_else(|| format!("error code {}", r.error_code)),
        }),
        _ => Ok(()),
    }
}
