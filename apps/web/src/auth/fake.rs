//! Scripted auth service for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::{AuthBridge, AuthError, AuthSession};
use crate::models::user::SessionUser;

#[derive(Debug, Clone)]
pub struct SentLink {
    pub email: String,
    pub redirect_to: String,
    pub code_challenge: String,
}

#[derive(Default)]
pub struct FakeAuth {
    access: Mutex<HashMap<String, SessionUser>>,
    refresh: Mutex<HashMap<String, AuthSession>>,
    /// code -> (expected verifier, session)
    codes: Mutex<HashMap<String, (String, AuthSession)>>,
    sent_links: Mutex<Vec<SentLink>>,
    signed_out: Mutex<Vec<String>>,
    offline: AtomicBool,
}

impl FakeAuth {
    pub fn new() -> Self {
        Self::default()
    }

    fn new_user() -> SessionUser {
        let id = Uuid::new_v4();
        SessionUser {
            id,
            email: Some(format!("{}@example.test", id.simple())),
        }
    }

    /// Registers a fresh user reachable through `access_token`.
    pub fn add_user(&self, access_token: &str) -> SessionUser {
        let user = Self::new_user();
        self.access
            .lock()
            .unwrap()
            .insert(access_token.to_string(), user.clone());
        user
    }

    /// Registers a user whose only valid credential is `refresh_token`,
    /// which trades for `new_access_token`.
    pub fn add_refreshable_user(&self, refresh_token: &str, new_access_token: &str) -> SessionUser {
        let user = Self::new_user();
        let session = AuthSession {
            access_token: new_access_token.to_string(),
            refresh_token: format!("{refresh_token}-next"),
            expires_in: Some(3600),
            user: user.clone(),
        };
        self.refresh
            .lock()
            .unwrap()
            .insert(refresh_token.to_string(), session);
        user
    }

    /// Registers a sign-in code that exchanges for a session when paired
    /// with `verifier`.
    pub fn add_code(&self, code: &str, verifier: &str, access_token: &str) -> SessionUser {
        let user = Self::new_user();
        let session = AuthSession {
            access_token: access_token.to_string(),
            refresh_token: format!("{access_token}-refresh"),
            expires_in: Some(3600),
            user: user.clone(),
        };
        self.codes
            .lock()
            .unwrap()
            .insert(code.to_string(), (verifier.to_string(), session));
        user
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn sent_links(&self) -> Vec<SentLink> {
        self.sent_links.lock().unwrap().clone()
    }

    pub fn signed_out(&self) -> Vec<String> {
        self.signed_out.lock().unwrap().clone()
    }

    fn check_online(&self) -> Result<(), AuthError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AuthError::Api {
                status: 503,
                message: "auth service offline".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AuthBridge for FakeAuth {
    async fn get_user(&self, access_token: &str) -> Result<Option<SessionUser>, AuthError> {
        self.check_online()?;
        Ok(self.access.lock().unwrap().get(access_token).cloned())
    }

    async fn refresh_session(
        &self,
        refresh_token: &str,
    ) -> Result<Option<AuthSession>, AuthError> {
        self.check_online()?;
        Ok(self.refresh.lock().unwrap().get(refresh_token).cloned())
    }

    async fn exchange_code(&self, code: &str, verifier: &str) -> Result<AuthSession, AuthError> {
        self.check_online()?;
        match self.codes.lock().unwrap().get(code) {
            Some((expected, session)) if expected == verifier => Ok(session.clone()),
            _ => Err(AuthError::Api {
                status: 400,
                message: "invalid flow state".to_string(),
            }),
        }
    }

    async fn send_magic_link(
        &self,
        email: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<(), AuthError> {
        self.check_online()?;
        self.sent_links.lock().unwrap().push(SentLink {
            email: email.to_string(),
            redirect_to: redirect_to.to_string(),
            code_challenge: code_challenge.to_string(),
        });
        Ok(())
    }

    fn authorize_url(
        &self,
        provider: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<String, AuthError> {
        self.check_online()?;
        let redirect: String = url::form_urlencoded::byte_serialize(redirect_to.as_bytes()).collect();
        Ok(format!(
            "https://auth.test/authorize?provider={provider}&redirect_to={redirect}&code_challenge={code_challenge}"
        ))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.check_online()?;
        self.signed_out
            .lock()
            .unwrap()
            .push(access_token.to_string());
        Ok(())
    }
}
