// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process stub of the volunteer API for integration tests.

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sukarela_client::config::Config;
use sukarela_client::models::User;
use sukarela_client::services::MemoryStorage;
use sukarela_client::AppState;

/// A request the stub received.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

#[allow(dead_code)]
impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body should be JSON")
    }
}

#[derive(Clone)]
struct Reply {
    status: u16,
    body: String,
    delay: Option<Duration>,
}

#[derive(Default)]
struct StubState {
    replies: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<Recorded>>,
}

/// Stub server bound to an ephemeral localhost port.
pub struct StubServer {
    pub base: String,
    state: Arc<StubState>,
}

#[allow(dead_code)]
impl StubServer {
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub server");
        let addr = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server");
        });

        Self {
            base: format!("http://{}", addr),
            state,
        }
    }

    /// Answer `"<METHOD> <path>"` with `status` and a JSON body.
    pub fn reply(&self, route: &str, status: u16, body: serde_json::Value) {
        self.reply_raw(route, status, &body.to_string(), None);
    }

    /// Same as [`StubServer::reply`] but waits `delay` before answering.
    pub fn reply_slow(&self, route: &str, status: u16, body: serde_json::Value, delay: Duration) {
        self.reply_raw(route, status, &body.to_string(), Some(delay));
    }

    pub fn reply_raw(&self, route: &str, status: u16, body: &str, delay: Option<Duration>) {
        self.state.replies.lock().unwrap().insert(
            route.to_string(),
            Reply {
                status,
                body: body.to_string(),
                delay,
            },
        );
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Client config pointed at this stub, with a short scan debounce.
    pub fn config(&self) -> Config {
        Config {
            api_base: self.base.clone(),
            scan_debounce: Duration::from_millis(150),
            ..Config::test_default()
        }
    }

    /// App state over in-memory storage, not logged in.
    pub fn app(&self) -> AppState {
        AppState::with_storage(self.config(), Arc::new(MemoryStorage::default()))
            .expect("app state")
    }

    /// App state with a stored volunteer session.
    pub fn logged_in_app(&self) -> AppState {
        let app = self.app();
        app.store
            .save("test-token", &volunteer())
            .expect("save credentials");
        app
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let reply = state
        .replies
        .lock()
        .unwrap()
        .get(&format!("{} {}", method, path))
        .cloned();
    let reply = reply.unwrap_or(Reply {
        status: 404,
        body: r#"{"message":"Not found"}"#.to_string(),
        delay: None,
    });

    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    (
        StatusCode::from_u16(reply.status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
}

/// A volunteer account as the server returns it.
#[allow(dead_code)]
pub fn volunteer_json() -> serde_json::Value {
    serde_json::json!({
        "id": 17,
        "name": "Nur Aisyah binti Ahmad",
        "role": "volunteer",
        "email": "aisyah@example.org",
        "gender": "female",
        "dateOfBirth": "2001-06-02",
        "total_attended": 4,
        "total_points": 85
    })
}

#[allow(dead_code)]
pub fn volunteer() -> User {
    serde_json::from_value(volunteer_json()).expect("volunteer user")
}

/// Address nothing is listening on.
#[allow(dead_code)]
pub async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
