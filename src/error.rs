// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types shared by the API client, the credential store
//! and the screens.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// HTTP 401 from the server.
    #[error("Authentication required")]
    Unauthorized(Option<String>),

    /// The server accepted the login but the account is not a volunteer.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// Non-success HTTP status other than 401.
    #[error("Server returned HTTP {status}")]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("This QR does not contain a valid event id or payload.")]
    UnrecognizedQr,

    #[error("Secure storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub const ONLY_VOLUNTEERS: &'static str = "Only volunteers can log in.";

    /// True for failures that must end the session: an HTTP 401 or a role
    /// the client refuses to serve.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AppError::Unauthorized(_) | AppError::AccessDenied(_))
    }

    /// The `message` field the server attached to an error response, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AppError::Unauthorized(message) | AppError::Api { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// Text to show the user: the server message when there is one,
    /// otherwise the error's own description.
    pub fn display_message(&self) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| self.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, AppError>;
