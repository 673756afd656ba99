// HTTP transport shared by every Wiki.js call.
//
// Owns the reqwest client, the cookie jar the session cookie lives in,
// header injection, and the bounded retry loop. The jar rejects cookies
// scoped to a public suffix, so a session cookie never reaches a sibling
// domain.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use bytes::Bytes;
use publicsuffix::List;
use reqwest::cookie::CookieStore;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue, LOCATION};
use reqwest::{Method, StatusCode};
use reqwest_cookie_store::CookieStoreMutex;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Error;
use crate::retry::RetryPolicy;

static PUBLIC_SUFFIXES: LazyLock<Option<List>> =
    LazyLock::new(|| List::from_bytes(include_bytes!("../data/public_suffix_list.dat")).ok());

fn suffix_aware_store() -> Result<CookieStoreMutex, Error> {
    let list = PUBLIC_SUFFIXES
        .clone()
        .ok_or_else(|| Error::Tls("failed to build HTTP client: bad public suffix list".into()))?;
    let store = cookie_store::CookieStore::default().with_suffix_list(list);
    Ok(CookieStoreMutex::new(store))
}

/// Settings used to build a [`Transport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// PEM bundle to trust instead of the built-in roots.
    pub ca_cert_pem: Option<String>,
    pub retry: RetryPolicy,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            ca_cert_pem: None,
            retry: RetryPolicy::default(),
        }
    }
}

/// A buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub body: Bytes,
    /// The `Location` header, when the server sent one.
    pub location: Option<String>,
}

impl Response {
    /// The body decoded as UTF-8, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Retrying HTTP client with a private cookie jar.
#[derive(Debug)]
pub struct Transport {
    http: reqwest::Client,
    cookie_jar: Arc<CookieStoreMutex>,
    retry: RetryPolicy,
}

impl Transport {
    /// Build a transport from `config`.
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        let cookie_jar = Arc::new(suffix_aware_store()?);

        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("wikijs-api/", env!("CARGO_PKG_VERSION")))
            .cookie_provider(Arc::clone(&cookie_jar));

        if let Some(pem) = config.ca_cert_pem.as_deref() {
            let certs = reqwest::Certificate::from_pem_bundle(pem.as_bytes())
                .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
            if certs.is_empty() {
                return Err(Error::Tls("CA cert contains no certificates".into()));
            }
            builder = builder.tls_built_in_root_certs(false);
            for cert in certs {
                builder = builder.add_root_certificate(cert);
            }
        }

        let http = builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            cookie_jar,
            retry: config.retry,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    // ── Cookies ──────────────────────────────────────────────────────

    /// Store a `Set-Cookie` style string for `url`.
    ///
    /// Cookies whose `Domain` is a public suffix other than the host itself
    /// are dropped.
    pub fn add_cookie(&self, cookie: &str, url: &Url) {
        match HeaderValue::from_str(cookie) {
            Ok(value) => self
                .cookie_jar
                .set_cookies(&mut std::iter::once(&value), url),
            Err(e) => debug!("ignoring unparsable cookie for {url}: {e}"),
        }
    }

    /// The `Cookie` header the jar would send to `url`, if any.
    pub fn cookie_header(&self, url: &Url) -> Option<String> {
        let cookies = self.cookie_jar.cookies(url)?;
        cookies.to_str().ok().map(String::from)
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// Send a request, retrying network errors and 5xx answers.
    ///
    /// Any status >= 400 left after retries becomes [`Error::Api`].
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<Bytes>,
        bearer: Option<&SecretString>,
    ) -> Result<Response, Error> {
        let resp = self.execute(&method, &url, body, bearer).await?;
        Self::check_status(&method, &url, resp)
    }

    /// GET `url` without credentials and return the status and body text.
    ///
    /// The status is not checked; HTML probes inspect it themselves.
    pub async fn get_text(&self, url: Url) -> Result<(StatusCode, String), Error> {
        let resp = self.execute(&Method::GET, &url, None, None).await?;
        Ok((resp.status, resp.text()))
    }

    async fn execute(
        &self,
        method: &Method,
        url: &Url,
        body: Option<Bytes>,
        bearer: Option<&SecretString>,
    ) -> Result<Response, Error> {
        let attempts = self.retry.attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!("{method} {url} (attempt {attempt}/{attempts})");

            let request = self.request(method, url, body.clone(), bearer);
            let retryable = match request.send().await {
                Ok(resp) if resp.status().is_server_error() && attempt < attempts => {
                    format!("HTTP {}", resp.status())
                }
                Ok(resp) => return Self::read(resp).await,
                Err(e) if e.is_builder() || attempt >= attempts => {
                    return Err(Error::Transport(e));
                }
                Err(e) => e.to_string(),
            };

            let delay = self.retry.delay(attempt);
            warn!(
                attempt,
                max_attempts = attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "{method} {} failed ({retryable}), retrying",
                url.path()
            );
            tokio::time::sleep(delay).await;
        }
    }

    fn request(
        &self,
        method: &Method,
        url: &Url,
        body: Option<Bytes>,
        bearer: Option<&SecretString>,
    ) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .header(ACCEPT, "application/json");

        if let Some(token) = bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }

        if let Some(body) = body {
            if matches!(*method, Method::POST | Method::PUT | Method::DELETE) {
                builder = builder.header(CONTENT_TYPE, "application/json");
            }
            builder = builder.body(body);
        }

        builder
    }

    async fn read(resp: reqwest::Response) -> Result<Response, Error> {
        let status = resp.status();
        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = resp.bytes().await.map_err(Error::Transport)?;
        trace!(status = status.as_u16(), bytes = body.len(), "response received");

        Ok(Response {
            status,
            body,
            location,
        })
    }

    fn check_status(method: &Method, url: &Url, resp: Response) -> Result<Response, Error> {
        if resp.status.as_u16() < 400 {
            return Ok(resp);
        }

        let mut message = format!(
            "error sending {method} request to {}: {}.",
            url.path(),
            resp.status
        );
        if !resp.body.is_empty() {
            message.push_str(" Response body: ");
            message.push_str(&resp.text());
        }
        Err(Error::Api {
            status: resp.status.as_u16(),
            message,
        })
    }
}
