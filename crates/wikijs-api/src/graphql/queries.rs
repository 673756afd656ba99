// GraphQL documents sent to `/graphql`.
//
// These strings are the wire contract with the server and are kept
// byte-for-byte, whitespace and `__typename` selections included.

/// Local-strategy login. Returns the session JWT on success.
pub const LOGIN: &str = "mutation ($username: String!, $password: String!, $strategy: String!) {\n  authentication {\n    login(username: $username, password: $password, strategy: $strategy) {\n      responseResult {\n        succeeded\n        errorCode\n        slug\n        message\n        __typename\n      }\n      jwt\n      mustChangePwd\n      mustProvideTFA\n      mustSetupTFA\n      continuationToken\n      redirect\n      tfaQRImage\n      __typename\n    }\n    __typename\n  }\n}\n";

/// Reads whether the GraphQL API is enabled.
pub const API_STATE: &str = r#"
{
	authentication {
		apiState
	}
}"#;

/// Turns the GraphQL API on or off (`$enabled`).
pub const SET_API_STATE: &str = r#"
mutation ($enabled: Boolean!) {
	authentication {
	    setApiState(enabled: $enabled) {
			responseResult {
			    succeeded
				errorCode
		        slug
		        message
		        __typename
	        }
	        __typename
	    }
	    __typename
	}
}"#;

/// Issues a new API key. The plaintext key is only returned here.
pub const CREATE_API_KEY: &str = r#"
mutation ($name: String!, $expiration: String!, $fullAccess: Boolean!, $group: Int) {
	authentication {
	    createApiKey(name: $name, expiration: $expiration, fullAccess: $fullAccess, group: $group) {
	        key
			responseResult {
		        succeeded
		        errorCode
		        slug
		        message
		        __typename
	        }
	        __typename
	    }
	    __typename
    }
}"#;

/// Lists every API key known to the server, revoked ones included.
pub const API_KEYS: &str = r#"
{
	authentication {
		apiKeys {
			id
			name
			keyShort
			expiration
			isRevoked
			createdAt
			updatedAt
			__typename
		}
		__typename
	}
}"#;

/// Revokes an API key by numeric id (`$id`).
pub const REVOKE_API_KEY: &str = r#"
mutation ($id: Int!) {
	authentication {
        revokeApiKey(id: $id) {
	        responseResult {
				succeeded
				errorCode
				slug
				message
				__typename
			}
			__typename
		}
		__typename
    }
}"#;

/// Lists the authentication strategies the server knows about.
pub const STRATEGIES: &str = r#"
{
	authentication {
		strategies {
			key
			props {
				key
				value
			}
			title
			description
			isAvailable
			useForm
			usernameType
			logo
			color
			website
			icon
			__typename
		}
		__typename
	}
}"#;

/// Lists the configured (active) authentication strategies.
pub const ACTIVE_STRATEGIES: &str = r#"
{
	authentication {
		activeStrategies {
			key
			strategy {
				key
				props {
					key
					value
				}
				title
				description
				isAvailable
				useForm
				usernameType
				logo
				color
				website
				icon
			}
			displayName
			order
			isEnabled
			config{
				key
				value
			}
			selfRegistration
			domainWhitelist
			autoEnrollGroups			
			__typename
		}
		__typename
	}
}"#;
