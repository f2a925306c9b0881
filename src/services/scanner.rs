// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! QR scan classification and attendance dispatch.
//!
//! A decoded code is either a signed body (`{"payload": .., "signature": ..}`)
//! forwarded verbatim to the server, or something an event id can be pulled
//! out of. Only one scan is handled at a time; after each one the scanner
//! stays closed for a debounce window so the camera re-reading the same code
//! does not submit it twice.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::AppError;
use crate::services::api::ApiClient;
use crate::services::credentials::CredentialStore;

/// Path prefix that precedes the event id in scan URLs.
const SCAN_URL_PREFIX: &str = "/api/ngo/events/";
const SCAN_URL_SUFFIX: &str = "/scan";

/// Id length accepted inside a scan URL.
const URL_ID_LEN: std::ops::RangeInclusive<usize> = 1..=36;
/// Id length accepted when the whole code is a bare id.
const BARE_ID_LEN: std::ops::RangeInclusive<usize> = 8..=36;

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Attendance recorded";
pub const DEFAULT_INFO_MESSAGE: &str = "Response received";
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to record attendance. Check your network or server.";

/// What a scanned code asks the client to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanCode {
    /// Signed body; both values are passed through untouched.
    Signed {
        payload: serde_json::Value,
        signature: serde_json::Value,
    },
    /// Event identifier for the per-event scan endpoint.
    EventId(String),
}

impl ScanCode {
    /// Classify decoded QR text. `None` means the code is unrecognized.
    pub fn parse(data: &str) -> Option<Self> {
        if let Ok(serde_json::Value::Object(mut fields)) =
            serde_json::from_str::<serde_json::Value>(data)
        {
            let present = |v: Option<&serde_json::Value>| v.is_some_and(is_truthy);
            if present(fields.get("payload")) && present(fields.get("signature")) {
                return Some(ScanCode::Signed {
                    payload: fields.remove("payload").unwrap_or_default(),
                    signature: fields.remove("signature").unwrap_or_default(),
                });
            }
        }

        extract_event_id(data).map(ScanCode::EventId)
    }
}

/// JSON truthiness: null, false, 0, and "" do not count as present.
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_hexdigit() || c == '-'
}

/// Pull an event id out of a scan URL (`.../api/ngo/events/<id>/scan`),
/// falling back to the whole trimmed text when it looks like a bare id.
pub fn extract_event_id(data: &str) -> Option<String> {
    for (start, _) in data.match_indices(SCAN_URL_PREFIX) {
        let rest = &data[start + SCAN_URL_PREFIX.len()..];
        let id_len = rest.find(|c: char| !is_id_char(c)).unwrap_or(rest.len());
        if URL_ID_LEN.contains(&id_len) && rest[id_len..].starts_with(SCAN_URL_SUFFIX) {
            return Some(rest[..id_len].to_string());
        }
    }

    let trimmed = data.trim();
    if BARE_ID_LEN.contains(&trimmed.len()) && trimmed.chars().all(is_id_char) {
        return Some(trimmed.to_string());
    }

    None
}

/// Result of one decode event, phrased for the user.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Attendance recorded.
    Success(String),
    /// The server answered 2xx but not 200/201.
    Info(String),
    /// The server rejected the scan with a message.
    Failed(String),
    /// Transport failure or an error without a server message.
    Error(String),
    /// Nothing usable in the code; no request was made.
    Unrecognized,
    /// Another scan is still being handled.
    Ignored,
}

impl ScanOutcome {
    pub fn title(&self) -> &'static str {
        match self {
            ScanOutcome::Success(_) => "Success",
            ScanOutcome::Info(_) => "Info",
            ScanOutcome::Failed(_) => "Failed",
            ScanOutcome::Error(_) => "Error",
            ScanOutcome::Unrecognized => "Unrecognized QR",
            ScanOutcome::Ignored => "Busy",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ScanOutcome::Success(m)
            | ScanOutcome::Info(m)
            | ScanOutcome::Failed(m)
            | ScanOutcome::Error(m) => m.clone(),
            ScanOutcome::Unrecognized => AppError::UnrecognizedQr.to_string(),
            ScanOutcome::Ignored => "Still processing the previous scan".to_string(),
        }
    }
}

/// Attendance scanner with a single in-flight guard.
#[derive(Clone)]
pub struct Scanner {
    api: ApiClient,
    store: CredentialStore,
    processing: Arc<AtomicBool>,
    debounce: Duration,
}

impl Scanner {
    pub fn new(api: ApiClient, store: CredentialStore, debounce: Duration) -> Self {
        Self {
            api,
            store,
            processing: Arc::new(AtomicBool::new(false)),
            debounce,
        }
    }

    /// True from the moment a scan is accepted until its debounce window
    /// has elapsed.
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Handle one decoded code. Returns [`ScanOutcome::Ignored`] without
    /// doing anything if another scan holds the guard.
    pub async fn handle_scan(&self, data: &str) -> ScanOutcome {
        let Some(_guard) = self.try_acquire() else {
            tracing::debug!("Scan ignored, previous scan still processing");
            return ScanOutcome::Ignored;
        };

        let outcome = self.dispatch(data).await;
        tracing::info!(outcome = outcome.title(), "Scan handled");
        outcome
    }

    fn try_acquire(&self) -> Option<ScanGuard> {
        self.processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(ScanGuard {
            processing: self.processing.clone(),
            debounce: self.debounce,
        })
    }

    async fn dispatch(&self, data: &str) -> ScanOutcome {
        // Make sure the bearer header reflects what is stored
        self.store.load();

        match ScanCode::parse(data) {
            None => ScanOutcome::Unrecognized,
            Some(ScanCode::Signed { payload, signature }) => {
                match self.api.scan_signed(&payload, &signature).await {
                    Ok(response) => ScanOutcome::Success(
                        response
                            .message
                            .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
                    ),
                    Err(e) => failure_outcome(e),
                }
            }
            Some(ScanCode::EventId(event_id)) => {
                tracing::debug!(event_id = %event_id, "Scanning event");
                match self.api.scan_event(&event_id).await {
                    Ok(response) if matches!(response.status, 200 | 201) => {
                        ScanOutcome::Success(
                            response
                                .message
                                .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
                        )
                    }
                    Ok(response) => ScanOutcome::Info(
                        response
                            .message
                            .unwrap_or_else(|| DEFAULT_INFO_MESSAGE.to_string()),
                    ),
                    Err(e) => failure_outcome(e),
                }
            }
        }
    }
}

/// Held while a scan is handled. Dropping it, including when the scan
/// future is cancelled, reopens the scanner once the debounce has elapsed.
struct ScanGuard {
    processing: Arc<AtomicBool>,
    debounce: Duration,
}

impl Drop for ScanGuard {
    fn drop(&mut self) {
        let processing = self.processing.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let debounce = self.debounce;
                handle.spawn(async move {
                    tokio::time::sleep(debounce).await;
                    processing.store(false, Ordering::Release);
                });
            }
            // No runtime left to run the timer on
            Err(_) => processing.store(false, Ordering::Release),
        }
    }
}

fn failure_outcome(err: AppError) -> ScanOutcome {
    tracing::warn!(error = %err, "Scan request failed");
    match err.server_message() {
        Some(message) => ScanOutcome::Failed(message.to_string()),
        None => ScanOutcome::Error(NETWORK_ERROR_MESSAGE.to_string()),
    }
}
