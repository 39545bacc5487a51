//! Sentinel Panel - user and organization management client
//!
//! Logs into a Sentinel API server, keeps the resulting session, and issues
//! authenticated user and organization calls on its behalf.

pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod identity;
pub mod io;
pub mod resources;
pub mod routes;
pub mod session;

pub use config::{load_config, Config};
pub use controller::SentinelController;
pub use error::{PanelError, Result};

use std::sync::Arc;

use crate::auth::{ApiKeyScheme, AuthScheme};
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::resources::ResourceClient;
use crate::session::SessionStore;

/// Assembles the session store and resource client from a [`Config`]
pub struct PanelBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    scheme: Option<Arc<dyn AuthScheme>>,
}

impl PanelBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            scheme: None,
        }
    }

    /// Replace the reqwest transport, e.g. with a test double
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_auth_scheme(mut self, scheme: Arc<dyn AuthScheme>) -> Self {
        self.scheme = Some(scheme);
        self
    }

    pub fn build(self) -> Result<Panel> {
        let http = match self.http {
            Some(http) => http,
            None => Arc::new(ReqwestHttpClient::with_timeout(self.config.api.timeout)?),
        };
        let scheme = self.scheme.unwrap_or_else(|| Arc::new(ApiKeyScheme));

        let session = Arc::new(SessionStore::new(&self.config.api, Arc::clone(&http)));
        let resources = Arc::new(ResourceClient::new(
            &self.config.api,
            http,
            Arc::clone(&session),
            scheme,
        ));

        tracing::debug!("Panel built for {}", self.config.api.base_url);
        Ok(Panel {
            config: self.config,
            session,
            resources,
        })
    }
}

/// The shared session and resource state; controllers are cheap views onto it
#[derive(Debug)]
pub struct Panel {
    config: Config,
    session: Arc<SessionStore>,
    resources: Arc<ResourceClient>,
}

impl Panel {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> Arc<SessionStore> {
        Arc::clone(&self.session)
    }

    pub fn resources(&self) -> Arc<ResourceClient> {
        Arc::clone(&self.resources)
    }

    /// A new controller projecting the current shared state
    pub async fn controller(&self) -> SentinelController {
        let mut controller = SentinelController::new(self.session(), self.resources());
        controller.refresh().await;
        controller
    }
}
