//! Identity Toolkit REST client.

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use super::dto::{
    AuthResponse, ErrorEnvelope, OobCodeRequest, PasswordRequest, TokenResponse,
};
use crate::domain::entities::{Session, SessionToken, UserRef};
use crate::domain::errors::GatewayError;
use crate::domain::ports::IdentityGatewayPort;
use crate::infrastructure::config::IdentityConfig;

const USER_AGENT: &str = concat!("bakery/", env!("CARGO_PKG_VERSION"));

/// Identity gateway backed by the Identity Toolkit and Secure Token REST APIs.
pub struct FirebaseIdentityClient {
    client: Client,
    api_key: String,
    identity_base_url: String,
    token_base_url: String,
    current: RwLock<Option<Session>>,
}

impl FirebaseIdentityClient {
    /// Creates a client for the configured project.
    ///
    /// The HTTP client carries no timeout of its own; the flow controller
    /// bounds every request.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(api_key: impl Into<String>, config: &IdentityConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GatewayError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            identity_base_url: config.identity_base_url.trim_end_matches('/').to_string(),
            token_base_url: config.token_base_url.trim_end_matches('/').to_string(),
            current: RwLock::new(None),
        })
    }

    fn toolkit_url(&self, method: &str) -> String {
        format!("{}/accounts:{method}", self.identity_base_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, GatewayError> {
        let response = request
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to reach identity provider");
                if e.is_timeout() {
                    GatewayError::network("request timed out")
                } else if e.is_connect() {
                    GatewayError::network("failed to connect to the identity provider")
                } else {
                    GatewayError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = map_error(status, &body);
        warn!(%status, error = %error, "Identity provider rejected request");
        Err(error)
    }

    async fn password_request(&self, method: &str, email: &str, password: &str) -> Result<Session, GatewayError> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response = self
            .send(self.client.post(self.toolkit_url(method)).json(&body))
            .await?;

        let auth: AuthResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse auth response");
            GatewayError::unexpected(format!("failed to parse response: {e}"))
        })?;

        let session = Session::new(
            UserRef::new(auth.local_id, auth.email.unwrap_or_else(|| email.to_string())),
            SessionToken::new(auth.id_token),
            SessionToken::new(auth.refresh_token),
        );
        *self.current.write() = Some(session.clone());
        Ok(session)
    }
}

#[async_trait]
impl IdentityGatewayPort for FirebaseIdentityClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        debug!("Signing in with email and password");
        let session = self.password_request("signInWithPassword", email, password).await?;
        info!(uid = %session.user().uid(), "Signed in");
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        debug!("Creating account");
        let session = self.password_request("signUp", email, password).await?;
        info!(uid = %session.user().uid(), "Account created");
        Ok(session)
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), GatewayError> {
        debug!("Requesting password reset email");
        let body = OobCodeRequest {
            request_type: "PASSWORD_RESET",
            email,
        };
        self.send(self.client.post(self.toolkit_url("sendOobCode")).json(&body))
            .await?;
        info!("Password reset email requested");
        Ok(())
    }

    async fn refresh(&self, session: &Session) -> Result<Session, GatewayError> {
        debug!(token = %session.refresh_token().masked(), "Refreshing session");
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", session.refresh_token().as_str()),
        ];
        let response = self
            .send(
                self.client
                    .post(format!("{}/token", self.token_base_url))
                    .form(&form),
            )
            .await?;

        let tokens: TokenResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse token response");
            GatewayError::unexpected(format!("failed to parse response: {e}"))
        })?;

        if tokens.user_id != session.user().uid() {
            return Err(GatewayError::unexpected("refreshed token belongs to another user"));
        }

        let fresh = session.with_tokens(
            SessionToken::new(tokens.id_token),
            SessionToken::new(tokens.refresh_token),
        );
        *self.current.write() = Some(fresh.clone());
        Ok(fresh)
    }

    async fn sign_out(&self) {
        *self.current.write() = None;
    }

    fn adopt(&self, session: Session) {
        debug!(uid = %session.user().uid(), "Adopting session");
        *self.current.write() = Some(session);
    }

    fn current_session(&self) -> Option<Session> {
        self.current.read().clone()
    }
}

/// Translates an error response into a [`GatewayError`] carrying a readable
/// description where the provider code is known.
pub(crate) fn map_error(status: StatusCode, body: &str) -> GatewayError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_default();
    let (code, detail) = match message.split_once(':') {
        Some((code, detail)) => (code.trim(), Some(detail.trim())),
        None => (message.trim(), None),
    };

    match code {
        "EMAIL_EXISTS" => GatewayError::rejected("The email address is already in use by another account."),
        "EMAIL_NOT_FOUND" => GatewayError::rejected(
            "There is no user record corresponding to this identifier. The user may have been deleted.",
        ),
        "INVALID_PASSWORD" => {
            GatewayError::rejected("The password is invalid or the user does not have a password.")
        }
        "INVALID_LOGIN_CREDENTIALS" => {
            GatewayError::rejected("The supplied auth credential is incorrect, malformed or has expired.")
        }
        "USER_DISABLED" => {
            GatewayError::rejected("The user account has been disabled by an administrator.")
        }
        "INVALID_EMAIL" => GatewayError::rejected("The email address is badly formatted."),
        "WEAK_PASSWORD" => GatewayError::rejected(match detail {
            Some(detail) if !detail.is_empty() => format!("The given password is invalid. [ {detail} ]"),
            _ => "The given password is invalid.".to_string(),
        }),
        "OPERATION_NOT_ALLOWED" => {
            GatewayError::rejected("This sign-in method is disabled for this project.")
        }
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => {
            GatewayError::rejected("The session has expired. Please sign in again.")
        }
        "TOO_MANY_ATTEMPTS_TRY_LATER" => GatewayError::RateLimited,
        _ => match status {
            StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited,
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
                GatewayError::network("identity provider is temporarily unavailable")
            }
            _ if code.is_empty() => GatewayError::unexpected(format!("HTTP {status}")),
            _ => GatewayError::unexpected(format!("{status}: {code}")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn envelope(message: &str) -> String {
        format!(r#"{{"error":{{"code":400,"message":"{message}","errors":[]}}}}"#)
    }

    #[test_case("EMAIL_EXISTS", "already in use" ; "email exists")]
    #[test_case("EMAIL_NOT_FOUND", "no user record" ; "email not found")]
    #[test_case("INVALID_PASSWORD", "password is invalid" ; "invalid password")]
    #[test_case("INVALID_LOGIN_CREDENTIALS", "credential is incorrect" ; "invalid credentials")]
    #[test_case("USER_DISABLED", "disabled by an administrator" ; "user disabled")]
    #[test_case("INVALID_EMAIL", "badly formatted" ; "invalid email")]
    fn test_known_codes_have_descriptions(code: &str, fragment: &str) {
        let error = map_error(StatusCode::BAD_REQUEST, &envelope(code));
        let description = error.description().unwrap();
        assert!(description.contains(fragment), "{description}");
    }

    #[test]
    fn test_weak_password_keeps_detail() {
        let error = map_error(
            StatusCode::BAD_REQUEST,
            &envelope("WEAK_PASSWORD : Password should be at least 6 characters"),
        );
        assert_eq!(
            error.description().as_deref(),
            Some("The given password is invalid. [ Password should be at least 6 characters ]")
        );
    }

    #[test]
    fn test_too_many_attempts_is_rate_limited() {
        let error = map_error(StatusCode::BAD_REQUEST, &envelope("TOO_MANY_ATTEMPTS_TRY_LATER"));
        assert_eq!(error, GatewayError::RateLimited);
    }

    #[test]
    fn test_unknown_code_has_no_description() {
        let error = map_error(StatusCode::BAD_REQUEST, &envelope("SOMETHING_NEW"));
        assert!(matches!(error, GatewayError::Unexpected { .. }));
        assert!(error.description().is_none());
    }

    #[test]
    fn test_unreadable_body_uses_status() {
        assert!(matches!(
            map_error(StatusCode::SERVICE_UNAVAILABLE, "<html>"),
            GatewayError::Network { .. }
        ));
        assert_eq!(
            map_error(StatusCode::TOO_MANY_REQUESTS, ""),
            GatewayError::RateLimited
        );
    }

    #[test]
    fn test_client_creation() {
        let client = FirebaseIdentityClient::new("key", &IdentityConfig::default()).unwrap();
        assert_eq!(
            client.toolkit_url("signUp"),
            "https://identitytoolkit.googleapis.com/v1/accounts:signUp"
        );
        assert!(client.current_user().is_none());
    }
}
