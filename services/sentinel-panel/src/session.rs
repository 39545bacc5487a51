//! Session store: the current identity and the login/logout state machine

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::ApiConfig;
use crate::identity::{Identity, LoginRequest};
use crate::io::HttpClient;
use crate::{PanelError, Result};

/// Where the session is in its login lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    Anonymous,
    Authenticating,
    Authenticated,
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthState::Anonymous => write!(f, "Anonymous"),
            AuthState::Authenticating => write!(f, "Authenticating"),
            AuthState::Authenticated => write!(f, "Authenticated"),
        }
    }
}

/// Session data guarded by [`SessionStore`].
///
/// Logged-in is derived from `user`, and an [`Identity`] always carries an
/// API key, so the flag and the key can never disagree.
#[derive(Debug, Default)]
pub struct Session {
    user: Option<Identity>,
    generation: u64,
    pending: Option<u64>,
}

impl Session {
    pub fn user(&self) -> Option<&Identity> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn state(&self) -> AuthState {
        if self.pending.is_some() {
            AuthState::Authenticating
        } else if self.user.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        }
    }

    /// Start a login attempt, returning its generation
    pub fn begin_login(&mut self) -> u64 {
        self.generation += 1;
        self.pending = Some(self.generation);
        self.generation
    }

    /// Apply the outcome of the login started as `generation`.
    ///
    /// Outcomes of attempts overtaken by a newer login or a logout are
    /// discarded with [`PanelError::Superseded`].
    pub fn complete_login(&mut self, generation: u64, outcome: Result<Identity>) -> Result<Identity> {
        if generation != self.generation {
            return Err(PanelError::Superseded);
        }
        self.pending = None;
        let identity = outcome?;
        self.user = Some(identity.clone());
        Ok(identity)
    }

    pub fn logout(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.user = None;
    }
}

/// Owns the session and performs the login call
pub struct SessionStore {
    login_url: String,
    http: Arc<dyn HttpClient>,
    session: RwLock<Session>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("login_url", &self.login_url)
            .finish()
    }
}

impl SessionStore {
    pub fn new(api: &ApiConfig, http: Arc<dyn HttpClient>) -> Self {
        let login_url = api.login_url();
        tracing::debug!("Created SessionStore with login endpoint {}", login_url);
        Self {
            login_url,
            http,
            session: RwLock::new(Session::default()),
        }
    }

    /// Post the credentials once and, on success, replace the current identity.
    ///
    /// On failure the session is left as it was.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Identity> {
        tracing::info!("Logging in {}", credentials.username);
        let generation = self.session.write().await.begin_login();

        let outcome = self.request_identity(credentials).await;
        let result = self.session.write().await.complete_login(generation, outcome);

        match &result {
            Ok(identity) => tracing::debug!("User {} logged in", identity.username),
            Err(PanelError::Superseded) => tracing::warn!(
                "Discarding login response for {}: a newer session change took over",
                credentials.username
            ),
            Err(e) => tracing::debug!("Login for {} failed: {}", credentials.username, e),
        }
        result
    }

    async fn request_identity(&self, credentials: &LoginRequest) -> Result<Identity> {
        let body = serde_json::to_value(credentials)?;
        let response = self.http.post_json(&self.login_url, &[], &body).await?;

        if !response.is_success() {
            return Err(PanelError::from_status(response.status, &response.body));
        }

        let identity = Identity::from_response_body(&response.body)?;
        if identity.api_key.is_empty() {
            return Err(PanelError::MalformedResponse(
                "login response carries an empty api_key".to_string(),
            ));
        }
        Ok(identity)
    }

    pub async fn logout(&self) {
        self.session.write().await.logout();
        tracing::info!("Logged out");
    }

    pub async fn is_logged_in(&self) -> bool {
        self.session.read().await.is_logged_in()
    }

    pub async fn user(&self) -> Option<Identity> {
        self.session.read().await.user().cloned()
    }

    pub async fn state(&self) -> AuthState {
        self.session.read().await.state()
    }
}
