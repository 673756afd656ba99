// Authentication strategy queries (read-only)

use crate::client::WikijsClient;
use crate::error::Error;
use crate::graphql::{
    ActiveAuthenticationStrategy, ActiveStrategiesField, AuthenticationStrategy, GraphQl,
    StrategiesField, queries,
};

impl WikijsClient {
    /// Every authentication strategy the server supports.
    pub async fn authentication_strategies(&self) -> Result<Vec<AuthenticationStrategy>, Error> {
        let request: GraphQl<()> = GraphQl::new(queries::STRATEGIES);
        let field: StrategiesField = self.graphql_payload("strategies", &request).await?;
        Ok(field.strategies)
    }

    /// The configured strategies, in the server's order.
    pub async fn active_authentication_strategies(
        &self,
    ) -> Result<Vec<ActiveAuthenticationStrategy>, Error> {
        let request: GraphQl<()> = GraphQl::new(queries::ACTIVE_STRATEGIES);
        let field: ActiveStrategiesField =
            self.graphql_payload("activeStrategies", &request).await?;
        Ok(field.active_strategies)
    }

    /// Look up a single strategy by its key (e.g. `local`, `keycloak`).
    pub async fn authentication_strategy(&self, key: &str) -> Result<AuthenticationStrategy, Error> {
        self.authentication_strategies()
            .await?
            .into_iter()
            .find(|s| s.key == key)
            .ok_or_else(|| Error::NotFound {
                kind: "authentication strategy",
                name: key.to_owned(),
            })
    }
}
