// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Volunteer API client.
//!
//! One configured `reqwest::Client` is shared by every screen. The bearer
//! credential lives in an [`AuthHeader`] that the credential store writes
//! and every request reads.

use std::sync::{Arc, RwLock};

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Attendance, Event, Profile, User};

/// Default `Authorization` header shared between the credential store and
/// the API client.
#[derive(Debug, Clone, Default)]
pub struct AuthHeader(Arc<RwLock<Option<String>>>);

impl AuthHeader {
    pub fn set_bearer(&self, token: &str) {
        let mut guard = self.0.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(format!("Bearer {}", token));
    }

    pub fn clear(&self) {
        let mut guard = self.0.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    /// Current header value, e.g. `Bearer abc`.
    pub fn value(&self) -> Option<String> {
        self.0.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Volunteer API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: AuthHeader,
}

impl ApiClient {
    /// Create a client for `<api_base>/api` with a fresh, empty auth header.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            http,
            base_url: config.api_url(),
            auth: AuthHeader::default(),
        })
    }

    /// The shared default authorization header.
    pub fn auth(&self) -> &AuthHeader {
        &self.auth
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /login`
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });
        let response = self
            .request(Method::POST, "/login")
            .json(&body)
            .send()
            .await?;

        check_response_json(response).await
    }

    /// `GET /volunteer/profile`
    pub async fn profile(&self) -> Result<Profile> {
        let response = self
            .request(Method::GET, "/volunteer/profile")
            .send()
            .await?;
        check_response_json(response).await
    }

    /// `GET /volunteer/events/upcoming`
    pub async fn upcoming_events(&self) -> Result<Vec<Event>> {
        self.get_list("/volunteer/events/upcoming").await
    }

    /// `GET /volunteer/events/attended`
    pub async fn attended_events(&self) -> Result<Vec<Attendance>> {
        self.get_list("/volunteer/events/attended").await
    }

    /// `POST /ngo/events/scan` with a signed QR body, forwarded unchanged.
    pub async fn scan_signed(
        &self,
        payload: &serde_json::Value,
        signature: &serde_json::Value,
    ) -> Result<ScanResponse> {
        let body = SignedScanRequest { payload, signature };
        let response = self
            .request(Method::POST, "/ngo/events/scan")
            .json(&body)
            .send()
            .await?;
        scan_response(response).await
    }

    /// `POST /ngo/events/{event_id}/scan`
    pub async fn scan_event(&self, event_id: &str) -> Result<ScanResponse> {
        let path = format!("/ngo/events/{}/scan", urlencoding::encode(event_id));
        let response = self.request(Method::POST, &path).send().await?;
        scan_response(response).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = %method, url = %url, "API request");

        let builder = self.http.request(method, url);
        match self.auth.value() {
            Some(value) => builder.header(header::AUTHORIZATION, value),
            None => builder,
        }
    }

    /// GET a list resource. A body that is not a JSON array is treated as an
    /// empty list; items that fail to decode are skipped.
    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let response = self.request(Method::GET, path).send().await?;
        let body: serde_json::Value = check_response_json(response).await?;

        match body {
            serde_json::Value::Array(items) => Ok(decode_items(path, items)),
            other => {
                tracing::warn!(path, kind = json_kind(&other), "Expected a JSON array");
                Ok(Vec::new())
            }
        }
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, &body));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Decode(format!("JSON parse error: {}", e)))
}

/// Scan endpoints may answer with an empty or non-JSON body on success, so
/// only the optional `message` field is extracted.
async fn scan_response(response: reqwest::Response) -> Result<ScanResponse> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(status_error(status, &body));
    }

    Ok(ScanResponse {
        status: status.as_u16(),
        message: message_field(&body),
    })
}

fn status_error(status: StatusCode, body: &str) -> AppError {
    let message = message_field(body);
    if status == StatusCode::UNAUTHORIZED {
        tracing::warn!("API returned 401");
        return AppError::Unauthorized(message);
    }

    tracing::debug!(status = %status, body = %body, "API error response");
    AppError::Api {
        status: status.as_u16(),
        message,
    }
}

/// The server's human-readable `message`, if the body is a JSON object
/// carrying one.
fn message_field(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn decode_items<T: DeserializeOwned>(path: &str, items: Vec<serde_json::Value>) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(path, index, error = %e, "Skipping undecodable list item");
                None
            }
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[derive(Serialize)]
struct SignedScanRequest<'a> {
    payload: &'a serde_json::Value,
    signature: &'a serde_json::Value,
}

/// Response from `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Outcome of a successful scan request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResponse {
    pub status: u16,
    pub message: Option<String>,
}
