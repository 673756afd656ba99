// Session and first-run setup
//
// Connectivity probe, setup detection and finalize, and the local-strategy
// login that installs the `jwt` session cookie.

use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::auth::SessionState;
use crate::client::WikijsClient;
use crate::codec;
use crate::error::Error;
use crate::graphql::{Finalize, FinalizeResult, GraphQl, LoginField, LoginResult, LoginVariables, queries};

/// Pause before re-checking setup after the server rejected a finalize.
const SETUP_RECHECK_DELAY: Duration = Duration::from_secs(1);

/// Lifetime of the session cookie, in seconds.
const SESSION_COOKIE_MAX_AGE: u32 = 300;

/// Whether a served root page is the first-run setup wizard.
///
/// Wiki.js has no endpoint for this; the setup SPA shell is the only page
/// that mentions `setup`. This is a heuristic and will break if the served
/// markup changes.
pub fn page_requires_setup(page: &str) -> bool {
    page.contains("setup")
}

/// Seconds to wait from a login rate-limit message of the exact form
/// `Too many requests, please try again in N seconds.`
pub fn parse_rate_limit(message: &str) -> Option<Duration> {
    message
        .strip_prefix("Too many requests, please try again in ")?
        .strip_suffix(" seconds.")?
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

impl WikijsClient {
    /// Fail unless `GET /` answers 200.
    pub(crate) async fn check_connection(&self) -> Result<(), Error> {
        let connection = |reason: String| Error::Connection {
            url: self.host().to_owned(),
            reason,
        };

        let url = self.endpoint("/")?;
        let (status, _) = self
            .transport
            .get_text(url)
            .await
            .map_err(|e| connection(e.to_string()))?;

        if status != StatusCode::OK {
            return Err(connection(format!(
                "Wikijs returned HTTP status code: {}",
                status.as_u16()
            )));
        }
        debug!(host = %self.host(), "connected");
        Ok(())
    }

    /// Whether the instance still shows its first-run setup page.
    pub async fn requires_setup(&self) -> Result<bool, Error> {
        let (_, body) = self.transport.get_text(self.endpoint("/")?).await?;
        Ok(page_requires_setup(&body))
    }

    /// Negation of [`requires_setup`](Self::requires_setup).
    pub async fn setup_done(&self) -> Result<bool, Error> {
        let requires_setup = self
            .requires_setup()
            .await
            .map_err(|e| e.context("failed to check setup state"))?;
        debug!(requires_setup, "probed setup state");
        Ok(!requires_setup)
    }

    /// Run the first-start setup with the given admin account.
    ///
    /// Does nothing when setup is already done. A finalize the server
    /// rejects is taken as another client having won the race: the call
    /// waits a second and re-checks instead of posting again.
    pub async fn setup(
        &mut self,
        admin_email: &str,
        admin_password: &SecretString,
    ) -> Result<(), Error> {
        let done = self.setup_done().await?;
        self.state = SessionState::SetupChecked;
        self.credentials.admin_email = admin_email.to_owned();
        self.credentials.admin_password = Some(admin_password.clone());

        if done {
            debug!("setup already complete");
            self.state = SessionState::SetupComplete;
            return Ok(());
        }

        let payload = Finalize {
            admin_email: admin_email.to_owned(),
            admin_password: admin_password.expose_secret().to_owned(),
            admin_password_confirm: admin_password.expose_secret().to_owned(),
            site_url: self.host().to_owned(),
            telemetry: false,
        };

        info!(host = %self.host(), "running initial setup");
        let resp = self.post("/finalize", &payload).await.map_err(|e| Error::Setup {
            message: format!("Error POSTing to /finalize: {e}"),
        })?;
        self.state = SessionState::SetupPending;

        let result: FinalizeResult = codec::decode(&resp.body)?;
        if !result.ok {
            debug!(error = ?result.error, "finalize rejected, re-checking setup state");
            tokio::time::sleep(SETUP_RECHECK_DELAY).await;
            self.setup_done().await.map_err(|e| Error::Setup {
                message: e.to_string(),
            })?;
        }

        let done = self.setup_done().await.map_err(|e| Error::Setup {
            message: format!("Error confirming setup completed: {e}"),
        })?;
        if done {
            self.state = SessionState::SetupComplete;
        } else {
            warn!("server still reports setup as pending");
        }
        Ok(())
    }

    /// Log in with the local strategy and install the session cookie.
    ///
    /// A rate-limited attempt is retried exactly once after the wait the
    /// server asks for. Nothing is stored unless the login succeeds.
    pub async fn login(&mut self, username: &str, password: &SecretString) -> Result<(), Error> {
        let mut attempt = self.post_login(username, password).await?;

        if !attempt.succeeded() {
            let Some(wait) = attempt.error.as_deref().and_then(parse_rate_limit) else {
                return Err(Error::Login {
                    message: attempt.failure_message(),
                });
            };

            warn!(wait_secs = wait.as_secs(), "login rate limited, retrying once");
            tokio::time::sleep(wait).await;

            attempt = self.post_login(username, password).await?;
            if !attempt.succeeded() {
                return Err(Error::Login {
                    message: attempt.failure_message(),
                });
            }
        }

        let jwt = attempt
            .result
            .and_then(|r| r.jwt)
            .filter(|jwt| !jwt.is_empty())
            .ok_or_else(|| Error::Login {
                message: "server returned no session token".into(),
            })?;

        self.transport.add_cookie(
            &format!("jwt={jwt}; Max-Age={SESSION_COOKIE_MAX_AGE}"),
            self.base_url(),
        );
        self.credentials.session_token = Some(SecretString::from(jwt));
        self.state = SessionState::LoggedIn;

        debug!(user = username, "login successful");
        Ok(())
    }

    async fn post_login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginAttempt, Error> {
        let request = GraphQl::with_variables(
            queries::LOGIN,
            LoginVariables {
                username: username.to_owned(),
                password: password.expose_secret().to_owned(),
                strategy: "local".into(),
            },
        );

        let resp = self.graphql::<_, LoginField>(&request).await?;
        let error = resp.first_error().map(String::from);
        Ok(LoginAttempt {
            result: resp.authentication().and_then(|a| a.login),
            error,
        })
    }
}

/// One login round-trip: the `login` payload plus the first GraphQL error.
struct LoginAttempt {
    result: Option<LoginResult>,
    error: Option<String>,
}

impl LoginAttempt {
    fn succeeded(&self) -> bool {
        self.result.as_ref().is_some_and(LoginResult::succeeded)
    }

    fn failure_message(&self) -> String {
        self.result
            .as_ref()
            .and_then(|r| r.response_result.as_ref())
            .and_then(|r| r.message.clone())
            .filter(|m| !m.is_empty())
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "login rejected".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_page_is_detected_by_substring() {
        assert!(page_requires_setup(
            r#"<html><body><div id="root" class="setup"></div></body></html>"#
        ));
        assert!(!page_requires_setup("<html><body>Welcome to the wiki</body></html>"));
    }

    #[test]
    fn rate_limit_message_yields_wait() {
        assert_eq!(
            parse_rate_limit("Too many requests, please try again in 3 seconds."),
            Some(Duration::from_secs(3))
        );
        assert_eq!(
            parse_rate_limit("Too many requests, please try again in 120 seconds."),
            Some(Duration::from_secs(120))
        );
    }

    #[test]
    fn other_messages_are_not_rate_limits() {
        assert_eq!(parse_rate_limit("Invalid email / username or password."), None);
        assert_eq!(
            parse_rate_limit("Too many requests, please try again in a few seconds."),
            None
        );
        assert_eq!(
            parse_rate_limit("Too many requests, please try again in 3 seconds"),
            None
        );
    }

    #[test]
    fn failure_message_prefers_response_result() {
        let attempt = LoginAttempt {
            result: Some(LoginResult {
                response_result: Some(crate::graphql::ResponseResult {
                    succeeded: false,
                    message: Some("Invalid password".into()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            error: Some("generic".into()),
        };
        assert!(!attempt.succeeded());
        assert_eq!(attempt.failure_message(), "Invalid password");

        let attempt = LoginAttempt {
            result: None,
            error: Some("Invalid email / username or password.".into()),
        };
        assert_eq!(
            attempt.failure_message(),
            "Invalid email / username or password."
        );
    }
}
