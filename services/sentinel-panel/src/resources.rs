//! Resource client: authenticated user and organization calls

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::auth::AuthScheme;
use crate::config::ApiConfig;
use crate::identity::{Identity, NewOrg, NewUser, OrgRecord, UserRecord};
use crate::io::{Headers, HttpClient, HttpResponse};
use crate::session::SessionStore;
use crate::{PanelError, Result};

/// Last successfully fetched resources
#[derive(Debug, Clone, Default)]
pub struct ResourceState {
    pub users: Vec<UserRecord>,
    pub user_data: Option<Identity>,
    pub orgs: Vec<OrgRecord>,
    pub org_data: Option<OrgRecord>,
}

/// Issues user and organization calls on behalf of the session
pub struct ResourceClient {
    api: ApiConfig,
    http: Arc<dyn HttpClient>,
    session: Arc<SessionStore>,
    scheme: Arc<dyn AuthScheme>,
    state: RwLock<ResourceState>,
}

impl fmt::Debug for ResourceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("base_url", &self.api.base_url)
            .field("scheme", &self.scheme.name())
            .finish()
    }
}

impl ResourceClient {
    pub fn new(
        api: &ApiConfig,
        http: Arc<dyn HttpClient>,
        session: Arc<SessionStore>,
        scheme: Arc<dyn AuthScheme>,
    ) -> Self {
        tracing::debug!(
            "Created ResourceClient for {} using {} authorization",
            api.base_url,
            scheme.name()
        );
        Self {
            api: api.clone(),
            http,
            session,
            scheme,
            state: RwLock::new(ResourceState::default()),
        }
    }

    /// Authorization headers for the current session.
    ///
    /// Without a session this logs and returns no headers; the request still
    /// goes out and the server decides.
    pub async fn auth_headers(&self) -> Headers {
        match self.session.user().await {
            Some(identity) => self.scheme.headers(&identity),
            None => {
                tracing::error!("No user logged in, sending request without authorization");
                Headers::new()
            }
        }
    }

    /// GET all users, replacing the stored list on success
    pub async fn get_users(&self) -> Result<Vec<UserRecord>> {
        let response = self.get("user").await?;
        let users: Vec<UserRecord> = decode(&response, "user list")?;
        tracing::debug!("Retrieved {} users", users.len());
        self.state.write().await.users = users.clone();
        Ok(users)
    }

    /// GET one user, storing its flattened identity as the detail record
    pub async fn get_user(&self, user_id: &str) -> Result<Identity> {
        validate_user_id(user_id)?;
        let response = self.get(&format!("user/{}", user_id)).await?;
        let identity = Identity::from_response_body(&response.body)?;
        tracing::debug!("Retrieved user {} [{}]", identity.username, user_id);
        self.state.write().await.user_data = Some(identity.clone());
        Ok(identity)
    }

    /// POST a new user; the server's copy is authoritative
    pub async fn create_user(&self, user: &NewUser) -> Result<Identity> {
        let response = self.post("user", serde_json::to_value(user)?).await?;
        let created = Identity::from_response_body(&response.body)?;
        tracing::info!(
            "User {} created [{}]",
            created.username,
            created.id().unwrap_or_else(|| "no id".to_string())
        );
        Ok(created)
    }

    /// GET all organizations, replacing the stored list on success
    pub async fn get_orgs(&self) -> Result<Vec<OrgRecord>> {
        let response = self.get("org").await?;
        let orgs: Vec<OrgRecord> = decode(&response, "organization list")?;
        tracing::debug!("Retrieved {} organizations", orgs.len());
        self.state.write().await.orgs = orgs.clone();
        Ok(orgs)
    }

    /// POST a new organization, storing the created record as the detail record
    pub async fn create_org(&self, org: &NewOrg) -> Result<OrgRecord> {
        let response = self.post("org", serde_json::to_value(org)?).await?;
        let created: OrgRecord = decode(&response, "organization")?;
        tracing::info!(
            "Organization {} created",
            created.name.as_deref().unwrap_or(&org.name)
        );
        self.state.write().await.org_data = Some(created.clone());
        Ok(created)
    }

    pub async fn users(&self) -> Vec<UserRecord> {
        self.state.read().await.users.clone()
    }

    pub async fn user_data(&self) -> Option<Identity> {
        self.state.read().await.user_data.clone()
    }

    pub async fn orgs(&self) -> Vec<OrgRecord> {
        self.state.read().await.orgs.clone()
    }

    pub async fn org_data(&self) -> Option<OrgRecord> {
        self.state.read().await.org_data.clone()
    }

    pub async fn snapshot(&self) -> ResourceState {
        self.state.read().await.clone()
    }

    async fn get(&self, path: &str) -> Result<HttpResponse> {
        let url = self.api.resource_url(path);
        let headers = self.auth_headers().await;
        let response = self.http.get(&url, &headers).await?;
        check_status(response)
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<HttpResponse> {
        let url = self.api.resource_url(path);
        let headers = self.auth_headers().await;
        let response = self.http.post_json(&url, &headers, &body).await?;
        check_status(response)
    }
}

/// Ids are sent as one URL path segment and echoed in `/showUser/<id>`, so
/// only unreserved characters are accepted and `.`/`..` are refused.
fn validate_user_id(user_id: &str) -> Result<()> {
    let unreserved = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~');
    if user_id.is_empty()
        || user_id == "."
        || user_id == ".."
        || !user_id.chars().all(unreserved)
    {
        return Err(PanelError::InvalidUserId(user_id.to_string()));
    }
    Ok(())
}

fn check_status(response: HttpResponse) -> Result<HttpResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(PanelError::from_status(response.status, &response.body))
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse, what: &str) -> Result<T> {
    serde_json::from_str(&response.body)
        .map_err(|e| PanelError::MalformedResponse(format!("{}: {}", what, e)))
}
