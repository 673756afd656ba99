// wikijs-api: Async Rust client that bootstraps and administers Wiki.js
//
// Connects, runs the first-start setup when asked, logs in, enables the
// GraphQL API, issues an API key, and then serves typed queries over the
// instance's authentication strategies.

pub mod api_keys;
pub mod auth;
pub mod client;
pub mod codec;
pub mod error;
pub mod graphql;
pub mod retry;
pub mod session;
pub mod strategies;
pub mod transport;

pub use auth::{API_KEY_PREFIX, Credentials, SessionState};
pub use client::{ClientConfig, WikijsClient};
pub use error::Error;
pub use graphql::{ActiveAuthenticationStrategy, ApiKey, AuthenticationStrategy, KeyValuePair};
pub use retry::RetryPolicy;
pub use session::{page_requires_setup, parse_rate_limit};
pub use transport::{Response, Transport, TransportConfig};
