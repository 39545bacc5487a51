//! View controller: projects session and resource state into a view model
//!
//! Every action delegates to the [`SessionStore`] or [`ResourceClient`]. On
//! success the shared state is copied into the view model, possibly followed
//! by navigation; on failure only `err_msg` changes. No action returns an
//! error to its caller.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::identity::{Identity, LoginRequest, NewOrg, NewUser, OrgRecord, UserRecord};
use crate::resources::ResourceClient;
use crate::routes::Route;
use crate::session::SessionStore;
use crate::PanelError;

/// The login form as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

/// CSS classes for a user row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataClass {
    pub active_user: bool,
    pub inactive_user: bool,
}

/// Everything a view renders
#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub header: String,
    pub msg_class: String,
    pub route: Route,
    pub user: LoginForm,
    pub identity: Option<Identity>,
    pub users: Vec<UserRecord>,
    pub orgs: Vec<OrgRecord>,
    pub user_data: Option<Identity>,
    pub org_data: Option<OrgRecord>,
    pub err_msg: Option<String>,
    pub user_msg: Option<String>,
    pub login_failed: bool,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self {
            header: "Sentinel Users".to_string(),
            msg_class: "normal".to_string(),
            route: Route::default(),
            user: LoginForm::default(),
            identity: None,
            users: Vec::new(),
            orgs: Vec::new(),
            user_data: None,
            org_data: None,
            err_msg: None,
            user_msg: None,
            login_failed: false,
        }
    }
}

#[derive(Debug)]
pub struct SentinelController {
    session: Arc<SessionStore>,
    resources: Arc<ResourceClient>,
    view: ViewModel,
}

impl SentinelController {
    pub fn new(session: Arc<SessionStore>, resources: Arc<ResourceClient>) -> Self {
        tracing::debug!("Sentinel controller loaded");
        Self {
            session,
            resources,
            view: ViewModel::default(),
        }
    }

    /// Copy the current shared state into the view model
    pub async fn refresh(&mut self) {
        let resources = self.resources.snapshot().await;
        self.view.identity = self.session.user().await;
        self.view.users = resources.users;
        self.view.orgs = resources.orgs;
        self.view.user_data = resources.user_data;
        self.view.org_data = resources.org_data;
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn route(&self) -> &Route {
        &self.view.route
    }

    /// Fill in the login form
    pub fn set_credentials(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.view.user = LoginForm {
            username: username.into(),
            password: Some(password.into()),
        };
    }

    pub async fn login(&mut self) {
        self.view.login_failed = false;
        self.view.err_msg = None;

        let username = self.view.user.username.clone();
        tracing::info!("Logging in {}", username);
        let request = LoginRequest {
            username: username.clone(),
            password: self.view.user.password.clone().unwrap_or_default(),
        };

        match self.session.login(&request).await {
            Ok(identity) => {
                self.view.identity = Some(identity);
                self.view.user.password = None;
                self.navigate(Route::ListUsers);
            }
            Err(PanelError::Superseded) => {
                tracing::debug!("Login for {} superseded, view unchanged", username);
            }
            Err(e) => {
                self.view.err_msg = Some(format!("Cannot authenticate {}", username));
                self.view.login_failed = true;
                self.view.user.password = None;
                if !matches!(e, PanelError::Authentication(_)) {
                    tracing::error!(
                        "Error ({}) encountered while logging in user {}",
                        e,
                        username
                    );
                }
            }
        }
    }

    pub async fn authenticated(&self) -> bool {
        self.session.is_logged_in().await
    }

    pub async fn logout(&mut self) {
        self.session.logout().await;
        self.view.identity = self.session.user().await;
        self.view.user = LoginForm::default();
    }

    pub async fn get_users(&mut self) {
        match self.resources.get_users().await {
            Ok(users) => self.view.users = users,
            Err(e) => {
                tracing::error!("Could not retrieve users: {}", e);
                self.view.err_msg = Some(e.to_string());
            }
        }
    }

    pub async fn get_orgs(&mut self) {
        match self.resources.get_orgs().await {
            Ok(orgs) => self.view.orgs = orgs,
            Err(e) => {
                tracing::error!("Could not retrieve organizations: {}", e);
                self.view.err_msg = Some(e.to_string());
            }
        }
    }

    pub async fn get_user(&mut self, user_id: &str) {
        match self.resources.get_user(user_id).await {
            Ok(user) => {
                tracing::info!("Retrieved {}", user.username);
                self.view.user_data = Some(user);
                self.navigate(Route::ShowUser(user_id.to_string()));
            }
            Err(e) => {
                tracing::error!("Could not retrieve user [{}]: {}", user_id, e);
                self.view.err_msg = Some(e.to_string());
            }
        }
    }

    pub async fn create_user(&mut self, user: &NewUser) {
        let username = &user.credentials.username;
        tracing::info!("Creating a new user for: {}", username);
        match self.resources.create_user(user).await {
            Ok(_) => {
                self.view.user_msg = Some(format!("Success: User {} created", username));
                self.navigate(Route::Home);
            }
            Err(e) => {
                tracing::error!("Could not create a new user [{}]: {}", username, e);
                self.view.err_msg = Some(e.to_string());
            }
        }
    }

    pub async fn create_org(&mut self, org: &NewOrg) {
        let owner = self
            .view
            .identity
            .as_ref()
            .map(|i| i.username.clone())
            .unwrap_or_default();
        tracing::info!("Creating new org: {}, for: {}", org.name, owner);
        match self.resources.create_org(org).await {
            Ok(created) => {
                tracing::info!("Organization created: {}", org.name);
                self.view.org_data = Some(created);
                self.navigate(Route::ListOrgs);
            }
            Err(e) => {
                tracing::error!("Could not create Organization {}: {}", org.name, e);
                self.view.err_msg = Some(e.to_string());
            }
        }
    }

    /// Fetch the logged-in user's own record
    pub async fn get_signed_user_acct(&mut self) {
        let Some(identity) = self.session.user().await else {
            self.view.err_msg = Some("No user logged in".to_string());
            return;
        };
        let Some(user_id) = identity.id() else {
            self.view.err_msg = Some(format!("User {} has no id", identity.username));
            return;
        };
        self.get_user(&user_id).await;
    }

    pub fn user_data_class(is_active: bool) -> UserDataClass {
        UserDataClass {
            active_user: is_active,
            inactive_user: !is_active,
        }
    }

    /// Navigate to an arbitrary path through the route table
    pub fn path(&mut self, new_path: &str) {
        self.navigate(Route::resolve(new_path));
    }

    fn navigate(&mut self, route: Route) {
        tracing::debug!("Navigating {} -> {}", self.view.route, route);
        self.view.route = route;
    }
}
