//! User, organization, and credential records
//!
//! The API nests a user's username and API key under `credentials`. The panel
//! works with the flattened [`Identity`] instead; the conversion is one-way.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{PanelError, Result};

/// A user record as listed by `GET /user`; never inspected by the client
pub type UserRecord = Value;

/// Credentials block of a user record as sent by the server
#[derive(Debug, Clone, Deserialize)]
pub struct ServerCredentials {
    pub username: String,
    pub api_key: String,
}

/// User record shape returned by `/login` and `/user/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct ServerUserRecord {
    pub credentials: ServerCredentials,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

/// Normalized user identity with `username` and `apiKey` at the top level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl From<ServerUserRecord> for Identity {
    fn from(record: ServerUserRecord) -> Self {
        let ServerUserRecord {
            credentials,
            mut profile,
        } = record;
        // the hoisted fields win over any stray top-level copies
        profile.remove("username");
        profile.remove("apiKey");
        Self {
            username: credentials.username,
            api_key: credentials.api_key,
            profile,
        }
    }
}

impl Identity {
    /// Decode and flatten a user record from a response body
    pub fn from_response_body(body: &str) -> Result<Self> {
        let record: ServerUserRecord = serde_json::from_str(body)
            .map_err(|e| PanelError::MalformedResponse(format!("user record: {}", e)))?;
        Ok(record.into())
    }

    /// The server-assigned id, if the profile carries one
    pub fn id(&self) -> Option<String> {
        match self.profile.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn profile_field(&self, name: &str) -> Option<&Value> {
        self.profile.get(name)
    }
}

/// Organization record; only `id` and `name` are known to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Credentials for a user that does not exist yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCredentials {
    pub username: String,
    pub password: String,
}

/// Body of `POST /user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub credentials: NewCredentials,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl NewUser {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credentials: NewCredentials {
                username: username.into(),
                password: password.into(),
            },
            profile: Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.profile.insert(name.into(), value.into());
        self
    }
}

/// Body of `POST /org`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrg {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewOrg {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}
