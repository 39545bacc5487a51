//! BDD test world for the sentinel panel

use std::collections::HashMap;
use std::sync::Arc;

use cucumber::World;
use sentinel_panel::io::{HttpClient, HttpResponse};
use sentinel_panel::routes::Route;
use sentinel_panel::{Config, Panel, PanelBuilder, PanelError, SentinelController};
use tokio::sync::RwLock;

pub const BASE_URL: &str = "http://sentinel.test";

/// A recorded HTTP request
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl RecordedRequest {
    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == "Authorization")
            .map(|(_, v)| v.as_str())
    }
}

/// Canned reply for one method and path
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(HttpResponse),
    Unreachable,
}

/// An HTTP client that records requests and answers from a script.
///
/// Unscripted requests get a 404.
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    replies: RwLock<HashMap<(String, String), Reply>>,
    pub requests: RwLock<Vec<RecordedRequest>>,
}

impl ScriptedHttpClient {
    pub async fn reply(&self, method: &str, path: &str, status: u16, body: &str) {
        self.replies.write().await.insert(
            (method.to_string(), path.to_string()),
            Reply::Respond(HttpResponse {
                status,
                body: body.to_string(),
            }),
        );
    }

    pub async fn unreachable(&self, method: &str, path: &str) {
        self.replies
            .write()
            .await
            .insert((method.to_string(), path.to_string()), Reply::Unreachable);
    }

    pub async fn last_request(&self) -> RecordedRequest {
        self.requests
            .read()
            .await
            .last()
            .cloned()
            .expect("no request was recorded")
    }

    async fn answer(
        &self,
        method: &str,
        url: &str,
        headers: &[(String, String)],
        body: Option<serde_json::Value>,
    ) -> sentinel_panel::Result<HttpResponse> {
        let path = url.trim_start_matches(BASE_URL).to_string();
        self.requests.write().await.push(RecordedRequest {
            method: method.to_string(),
            path: path.clone(),
            headers: headers.to_vec(),
            body,
        });

        match self.replies.read().await.get(&(method.to_string(), path)) {
            Some(Reply::Respond(response)) => Ok(response.clone()),
            Some(Reply::Unreachable) => Err(PanelError::Http("connection refused".to_string())),
            None => Ok(HttpResponse {
                status: 404,
                body: r#"{"error": "not found"}"#.to_string(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> sentinel_panel::Result<HttpResponse> {
        self.answer("GET", url, headers, None).await
    }

    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> sentinel_panel::Result<HttpResponse> {
        self.answer("POST", url, headers, Some(body.clone())).await
    }
}

#[derive(Debug, Default, World)]
pub struct PanelWorld {
    pub http: Option<Arc<ScriptedHttpClient>>,
    pub panel: Option<Panel>,
    pub controller: Option<SentinelController>,

    // Results of direct session/resource calls
    pub last_error: Option<PanelError>,
    pub requests_after_login: Option<usize>,

    // Route testing
    pub resolved_route: Option<Route>,
}

impl PanelWorld {
    pub fn http(&mut self) -> Arc<ScriptedHttpClient> {
        Arc::clone(
            self.http
                .get_or_insert_with(|| Arc::new(ScriptedHttpClient::default())),
        )
    }

    pub fn panel(&mut self) -> &Panel {
        if self.panel.is_none() {
            let mut config = Config::default();
            config.api.base_url = BASE_URL.to_string();
            let http = self.http();
            let panel = PanelBuilder::new(config)
                .with_http_client(http as Arc<dyn HttpClient>)
                .build()
                .expect("panel should build");
            self.panel = Some(panel);
        }
        self.panel.as_ref().expect("panel was just built")
    }

    pub fn controller(&mut self) -> &mut SentinelController {
        if self.controller.is_none() {
            let panel = self.panel();
            let controller = SentinelController::new(panel.session(), panel.resources());
            self.controller = Some(controller);
        }
        self.controller.as_mut().expect("controller was just created")
    }
}
