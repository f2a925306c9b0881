// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Volunteer login.

use crate::error::{AppError, Result};
use crate::models::Session;
use crate::screens::{Alert, Route};
use crate::services::api::ApiClient;
use crate::services::credentials::CredentialStore;

pub struct LoginScreen {
    api: ApiClient,
    store: CredentialStore,
}

impl LoginScreen {
    pub fn new(api: ApiClient, store: CredentialStore) -> Self {
        Self { api, store }
    }

    /// Log in and persist the session. Non-volunteer accounts are refused
    /// even when the server accepts the credentials; nothing is stored for
    /// them.
    pub async fn submit(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Please enter email and password".to_string(),
            ));
        }

        let response = self.api.login(email, password).await?;

        let user = match response.user {
            Some(user) if user.is_volunteer() => user,
            other => {
                tracing::warn!(
                    role = other.as_ref().and_then(|u| u.role.as_deref()).unwrap_or("none"),
                    "Login refused for non-volunteer account"
                );
                return Err(AppError::AccessDenied(AppError::ONLY_VOLUNTEERS.to_string()));
            }
        };

        self.store.save(&response.token, &user)?;
        tracing::info!(user = user.display_name(), "Logged in");

        Ok(Session {
            token: response.token,
            user,
        })
    }

    /// Screen to show after a successful login.
    pub fn next_route(&self) -> Route {
        Route::Home
    }
}

/// Alert for a failed login attempt.
pub fn login_alert(err: &AppError) -> Alert {
    match err {
        AppError::Validation(message) => Alert::new("Login", message.clone()),
        AppError::AccessDenied(message) => Alert::new("Access denied", message.clone()),
        other => Alert::new(
            "Login failed",
            other
                .server_message()
                .unwrap_or("Network or server error")
                .to_string(),
        ),
    }
}
