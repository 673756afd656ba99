// JSON encoding and decoding of request/response bodies.
//
// Kept apart from the session logic so wire-format changes stay here.

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Error;

/// Serialize a request payload to a JSON body.
pub fn encode<T: Serialize + ?Sized>(payload: &T) -> Result<Bytes, Error> {
    serde_json::to_vec(payload)
        .map(Bytes::from)
        .map_err(Error::Encode)
}

/// Deserialize a JSON response body.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|e| {
        let text = String::from_utf8_lossy(body).into_owned();
        let preview: String = text.chars().take(200).collect();
        Error::Decode {
            message: format!("{e} (body preview: {preview:?})"),
            body: text,
        }
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::graphql::{
        CreateApiKeyVariables, Finalize, GraphQl, LoginVariables, queries,
    };

    #[test]
    fn finalize_uses_exact_field_names() {
        let payload = Finalize {
            admin_email: "admin@example.com".into(),
            admin_password: "hunter22".into(),
            admin_password_confirm: "hunter22".into(),
            site_url: "http://wiki.local:3000".into(),
            telemetry: false,
        };

        let body = encode(&payload).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "adminEmail": "admin@example.com",
                "adminPassword": "hunter22",
                "adminPasswordConfirm": "hunter22",
                "siteUrl": "http://wiki.local:3000",
                "telemetry": false
            })
        );
        assert_eq!(decode::<Finalize>(&body).unwrap(), payload);
    }

    #[test]
    fn envelope_without_variables_omits_them() {
        let envelope: GraphQl<()> = GraphQl::new(queries::API_STATE);
        let body = encode(&envelope).unwrap();
        let text = std::str::from_utf8(&body).unwrap();

        assert!(text.starts_with(r#"{"extensions":{},"query":"#), "{text}");
        assert!(!text.contains("variables"));
        assert!(!text.contains("operationName"));
    }

    #[test]
    fn payloads_survive_a_round_trip() {
        let login = GraphQl::with_variables(
            queries::LOGIN,
            LoginVariables {
                username: "admin@example.com".into(),
                password: "hunter22".into(),
                strategy: "local".into(),
            },
        );
        let body = encode(&login).unwrap();
        assert_eq!(decode::<GraphQl<LoginVariables>>(&body).unwrap(), login);

        let key = CreateApiKeyVariables {
            name: "terraform_abc".into(),
            expiration: "1y".into(),
            full_access: true,
            group: None,
        };
        let body = encode(&key).unwrap();
        assert!(!std::str::from_utf8(&body).unwrap().contains("group"));
        assert_eq!(decode::<CreateApiKeyVariables>(&body).unwrap(), key);

        let create = GraphQl::with_variables(queries::CREATE_API_KEY, key);
        let body = encode(&create).unwrap();
        assert_eq!(
            decode::<GraphQl<CreateApiKeyVariables>>(&body).unwrap(),
            create
        );
    }

    #[test]
    fn envelope_decodes_without_variables() {
        let body = br#"{"extensions":{},"query":"{ a }"}"#;
        let envelope = decode::<GraphQl<LoginVariables>>(body).unwrap();

        assert_eq!(envelope.variables, None);
        assert_eq!(envelope.query, "{ a }");
    }

    #[test]
    fn decode_error_keeps_the_body() {
        let err = decode::<Finalize>(b"<html>oops</html>").unwrap_err();
        match err {
            Error::Decode { message, body } => {
                assert!(message.contains("oops"));
                assert_eq!(body, "<html>oops</html>");
            }
            other => panic!("expected Decode, got {other:?}"),
        }
    }
}
