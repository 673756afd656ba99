// API feature flag and API key management
//
// Every lookup re-reads the full key list from the server; nothing is cached.

use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::client::{WikijsClient, check_result};
use crate::error::Error;
use crate::graphql::{
    ApiKey, ApiKeyVariables, ApiKeysField, ApiStateField, ApiVariables, CreateApiKeyField,
    CreateApiKeyVariables, GraphQl, RevokeApiKeyField, SetApiStateField, queries,
};

impl WikijsClient {
    /// Whether the GraphQL API is enabled.
    ///
    /// A disabled API rejects the probe itself, so a failed probe on a
    /// host that still answers `GET /` reads as "disabled". If the host is
    /// down too, the probe's error is returned.
    pub async fn api_enabled(&self) -> Result<bool, Error> {
        let request: GraphQl<()> = GraphQl::new(queries::API_STATE);

        match self.graphql_payload::<_, ApiStateField>("apiState", &request).await {
            Ok(field) => Ok(field.api_state.unwrap_or(false)),
            Err(probe) => {
                debug!(error = %probe, "apiState probe failed, checking host");
                match self.fetch_root().await {
                    Ok(_) => Ok(false),
                    Err(_) => Err(probe),
                }
            }
        }
    }

    /// Turn the GraphQL API on or off. Does nothing if it is already in that state.
    pub async fn set_api_feature(&self, enabled: bool) -> Result<(), Error> {
        if self.api_enabled().await? == enabled {
            debug!(enabled, "API state already as requested");
            return Ok(());
        }

        let request = GraphQl::with_variables(queries::SET_API_STATE, ApiVariables { enabled });
        let field: SetApiStateField = self.graphql_payload("setApiState", &request).await?;
        check_result(
            "setApiState",
            field.set_api_state.and_then(|m| m.response_result),
        )?;

        info!(enabled, "API state changed");
        Ok(())
    }

    /// Issue a new API key and return its plaintext value.
    ///
    /// The server shows the key only once; the caller has to keep it.
    pub async fn create_api_key(
        &self,
        name: &str,
        expiration: &str,
        full_access: bool,
    ) -> Result<SecretString, Error> {
        let request = GraphQl::with_variables(
            queries::CREATE_API_KEY,
            CreateApiKeyVariables {
                name: name.to_owned(),
                expiration: expiration.to_owned(),
                full_access,
                group: None,
            },
        );

        let field: CreateApiKeyField = self.graphql_payload("createApiKey", &request).await?;
        let created = field.create_api_key.unwrap_or_default();
        check_result("createApiKey", created.response_result)?;

        let key = created
            .key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Remote {
                operation: "createApiKey",
                message: "server returned no key".into(),
            })?;

        debug!(name, "API key created");
        Ok(SecretString::from(key))
    }

    /// All API keys the server knows, revoked ones included.
    pub async fn list_api_keys(&self) -> Result<Vec<ApiKey>, Error> {
        let request: GraphQl<()> = GraphQl::new(queries::API_KEYS);
        let field: ApiKeysField = self.graphql_payload("apiKeys", &request).await?;
        Ok(field.api_keys)
    }

    /// Id of the first key called `name`.
    pub async fn find_key_id_by_name(&self, name: &str) -> Result<i64, Error> {
        self.find_key(name).await.map(|key| key.id)
    }

    pub async fn is_key_revoked(&self, name: &str) -> Result<bool, Error> {
        self.find_key(name).await.map(|key| key.is_revoked)
    }

    /// Revoke the key called `name`. Fails with [`Error::NotFound`] before
    /// sending anything if no such key exists.
    pub async fn revoke_api_key(&self, name: &str) -> Result<(), Error> {
        let id = self.find_key_id_by_name(name).await?;
        self.revoke_api_key_by_id(id).await
    }

    /// Revoke a key by id.
    ///
    /// The server accepts ids that match no key, and so does this call.
    pub async fn revoke_api_key_by_id(&self, id: i64) -> Result<(), Error> {
        let request = GraphQl::with_variables(queries::REVOKE_API_KEY, ApiKeyVariables { id });
        let field: RevokeApiKeyField = self.graphql_payload("revokeApiKey", &request).await?;

        if let Err(e) = check_result(
            "revokeApiKey",
            field.revoke_api_key.and_then(|m| m.response_result),
        ) {
            warn!(id, error = %e, "server reported a failed revoke");
        }
        Ok(())
    }

    async fn find_key(&self, name: &str) -> Result<ApiKey, Error> {
        self.list_api_keys()
            .await?
            .into_iter()
            .find(|key| key.name == name)
            .ok_or_else(|| Error::NotFound {
                kind: "API key",
                name: name.to_owned(),
            })
    }
}
