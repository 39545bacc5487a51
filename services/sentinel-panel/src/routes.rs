//! Client-side route table

use std::fmt;

use serde::{Serialize, Serializer};

/// A view the panel can navigate to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Home,
    ListUsers,
    ShowUser(String),
    CreateUser,
    ListOrgs,
    CreateOrg,
}

impl Route {
    /// Resolve a path; anything unmatched lands on the user list
    pub fn resolve(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["listUsers"] => Route::ListUsers,
            ["showUser", user_id] => Route::ShowUser((*user_id).to_string()),
            ["createUser"] => Route::CreateUser,
            ["listOrgs"] => Route::ListOrgs,
            ["createOrg"] => Route::CreateOrg,
            _ => {
                tracing::debug!("No route for {:?}, redirecting to /listUsers", path);
                Route::ListUsers
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::ListUsers => "/listUsers".to_string(),
            Route::ShowUser(user_id) => format!("/showUser/{}", user_id),
            Route::CreateUser => "/createUser".to_string(),
            Route::ListOrgs => "/listOrgs".to_string(),
            Route::CreateOrg => "/createOrg".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}
