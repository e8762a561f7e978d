use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{AuthBridge, AuthError, AuthSession};
use crate::models::user::SessionUser;

const USER_PATH: &str = "/auth/v1/user";
const TOKEN_PATH: &str = "/auth/v1/token";
const OTP_PATH: &str = "/auth/v1/otp";
const AUTHORIZE_PATH: &str = "/auth/v1/authorize";
const LOGOUT_PATH: &str = "/auth/v1/logout";
const CHALLENGE_METHOD: &str = "s256";

/// Error body shapes the auth service uses across endpoints.
#[derive(Debug, Deserialize)]
struct GoTrueErrorBody {
    msg: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
}

impl GoTrueErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg.or(self.error_description).or(self.message)
    }
}

/// Client for a GoTrue-compatible auth REST API (e.g. Supabase Auth).
/// Every request carries the project's public API key.
#[derive(Clone)]
pub struct GoTrueClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl GoTrueClient {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Result<Self, AuthError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn token_grant(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<Response, AuthError> {
        Ok(self
            .client
            .post(self.endpoint(TOKEN_PATH))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?)
    }
}

/// Turns a non-success response into `AuthError::Api`, keeping the service's
/// own message when it sends one.
async fn api_error(response: Response) -> AuthError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GoTrueErrorBody>(&body)
        .ok()
        .and_then(GoTrueErrorBody::into_message)
        .unwrap_or(body);
    AuthError::Api { status, message }
}

fn is_rejected_credential(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
    )
}

#[async_trait]
impl AuthBridge for GoTrueClient {
    async fn get_user(&self, access_token: &str) -> Result<Option<SessionUser>, AuthError> {
        let response = self
            .client
            .get(self.endpoint(USER_PATH))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if is_rejected_credential(status) {
            debug!("Access token rejected by auth service ({status})");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(api_error(response).await);
        }

        Ok(Some(response.json::<SessionUser>().await?))
    }

    async fn refresh_session(
        &self,
        refresh_token: &str,
    ) -> Result<Option<AuthSession>, AuthError> {
        let response = self
            .token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await?;

        let status = response.status();
        if is_rejected_credential(status) {
            debug!("Refresh token rejected by auth service ({status})");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(api_error(response).await);
        }

        Ok(Some(response.json::<AuthSession>().await?))
    }

    async fn exchange_code(&self, code: &str, verifier: &str) -> Result<AuthSession, AuthError> {
        let response = self
            .token_grant(
                "pkce",
                json!({ "auth_code": code, "code_verifier": verifier }),
            )
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(response.json::<AuthSession>().await?)
    }

    async fn send_magic_link(
        &self,
        email: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.endpoint(OTP_PATH))
            .query(&[("redirect_to", redirect_to)])
            .header("apikey", &self.anon_key)
            .json(&json!({
                "email": email,
                "create_user": true,
                "code_challenge": code_challenge,
                "code_challenge_method": CHALLENGE_METHOD,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }

    fn authorize_url(
        &self,
        provider: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<String, AuthError> {
        let mut url = Url::parse(&self.endpoint(AUTHORIZE_PATH))?;
        url.query_pairs_mut()
            .append_pair("provider", provider)
            .append_pair("redirect_to", redirect_to)
            .append_pair("code_challenge", code_challenge)
            .append_pair("code_challenge_method", CHALLENGE_METHOD);
        Ok(url.into())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.endpoint(LOGOUT_PATH))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if is_rejected_credential(status) {
            warn!("Sign-out with an already invalid token ({status})");
            return Ok(());
        }
        if !status.is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }
}
