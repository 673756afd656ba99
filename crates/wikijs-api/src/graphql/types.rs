use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Request envelopes ────────────────────────────────────────────────

/// Always serialized as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extensions {}

/// GraphQL request envelope:
/// ```json
/// { "operationName": null, "variables": {...}, "extensions": {}, "query": "..." }
/// ```
/// `operationName` and `variables` are left out when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQl<V> {
    #[serde(
        rename = "operationName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub operation_name: Option<String>,
    #[serde(default = "none", skip_serializing_if = "Option::is_none")]
    pub variables: Option<V>,
    #[serde(default)]
    pub extensions: Extensions,
    pub query: String,
}

impl<V> GraphQl<V> {
    /// A query without variables.
    pub fn new(query: &str) -> Self {
        Self {
            operation_name: None,
            variables: None,
            extensions: Extensions {},
            query: query.to_owned(),
        }
    }

    pub fn with_variables(query: &str, variables: V) -> Self {
        Self {
            variables: Some(variables),
            ..Self::new(query)
        }
    }
}

/// Body of the one-time `POST /finalize` setup call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finalize {
    pub admin_email: String,
    pub admin_password: String,
    pub admin_password_confirm: String,
    pub site_url: String,
    pub telemetry: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginVariables {
    pub username: String,
    pub password: String,
    pub strategy: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiVariables {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyVariables {
    pub name: String,
    /// Lifetime in the server's shorthand, e.g. `"1y"`.
    pub expiration: String,
    pub full_access: bool,
    /// Group id for a scoped (non full-access) key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyVariables {
    pub id: i64,
}

// ── Response envelopes ───────────────────────────────────────────────

/// Answer to `POST /finalize`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinalizeResult {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Standard GraphQL response: `{ data, errors }`.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<D> {
    #[serde(default = "none")]
    pub data: Option<D>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

fn none<T>() -> Option<T> {
    None
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

/// Every Wiki.js auth operation lives under `data.authentication`.
#[derive(Debug, Deserialize)]
pub struct Authentication<T> {
    #[serde(default = "none")]
    pub authentication: Option<T>,
}

pub type AuthResponse<T> = GraphQlResponse<Authentication<T>>;

impl<T> GraphQlResponse<Authentication<T>> {
    /// The `data.authentication` payload, if the server sent one.
    pub fn authentication(self) -> Option<T> {
        self.data.and_then(|d| d.authentication)
    }
}

impl<D> GraphQlResponse<D> {
    /// Message of the first GraphQL error, if any.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }
}

/// `responseResult` block returned by every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponseResult {
    pub succeeded: bool,
    pub error_code: i64,
    pub slug: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MutationResult {
    pub response_result: Option<ResponseResult>,
}

// ── login ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginField {
    pub login: Option<LoginResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginResult {
    pub response_result: Option<ResponseResult>,
    pub jwt: Option<String>,
    pub must_change_pwd: Option<bool>,
    #[serde(rename = "mustProvideTFA")]
    pub must_provide_tfa: Option<bool>,
    #[serde(rename = "mustSetupTFA")]
    pub must_setup_tfa: Option<bool>,
    pub continuation_token: Option<String>,
    pub redirect: Option<String>,
    #[serde(rename = "tfaQRImage")]
    pub tfa_qr_image: Option<String>,
}

impl LoginResult {
    pub fn succeeded(&self) -> bool {
        self.response_result.as_ref().is_some_and(|r| r.succeeded)
    }
}

// ── API state and keys ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiStateField {
    pub api_state: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SetApiStateField {
    pub set_api_state: Option<MutationResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateApiKeyField {
    pub create_api_key: Option<CreateApiKeyResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateApiKeyResult {
    pub key: Option<String>,
    pub response_result: Option<ResponseResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevokeApiKeyField {
    pub revoke_api_key: Option<MutationResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiKeysField {
    pub api_keys: Vec<ApiKey>,
}

/// An API key as listed by the server. The secret itself is never listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub key_short: String,
    pub expiration: DateTime<Utc>,
    #[serde(default)]
    pub is_revoked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Authentication strategies ────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub key: String,
    /// JSON-encoded value as served, e.g. `{"v":"master"}`.
    pub value: String,
}

/// An authentication method the server supports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthenticationStrategy {
    pub key: String,
    pub props: Vec<KeyValuePair>,
    pub title: String,
    pub description: Option<String>,
    pub is_available: bool,
    pub use_form: bool,
    pub username_type: Option<String>,
    pub logo: Option<String>,
    pub color: Option<String>,
    pub website: Option<String>,
    pub icon: Option<String>,
}

/// A configured instance of a strategy, with its own ordering and config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActiveAuthenticationStrategy {
    pub key: String,
    pub strategy: AuthenticationStrategy,
    pub display_name: String,
    pub order: i64,
    pub is_enabled: bool,
    pub config: Vec<KeyValuePair>,
    pub self_registration: bool,
    pub domain_whitelist: Vec<String>,
    pub auto_enroll_groups: Vec<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StrategiesField {
    pub strategies: Vec<AuthenticationStrategy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActiveStrategiesField {
    pub active_strategies: Vec<ActiveAuthenticationStrategy>,
}
