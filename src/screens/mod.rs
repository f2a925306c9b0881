// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Screens: login, home, upcoming, attended and scanner.
//!
//! Data screens share one lifecycle. They start out loading, end up ready
//! or in error, and can be refreshed any number of times. While a refresh
//! is in flight the previous data stays on screen.

pub mod attended;
pub mod format;
pub mod home;
pub mod login;
pub mod scanner;
pub mod upcoming;

pub use attended::AttendedScreen;
pub use home::HomeScreen;
pub use login::LoginScreen;
pub use scanner::ScannerScreen;
pub use upcoming::UpcomingScreen;

use std::future::Future;

use crate::error::AppError;
use crate::services::credentials::CredentialStore;

/// Top-level destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    Upcoming,
    Attended,
    Scanner,
}

/// Where the app opens: home when a token is stored, login otherwise.
pub fn startup_route(store: &CredentialStore) -> Route {
    if store.load().is_logged_in() {
        Route::Home
    } else {
        Route::Login
    }
}

/// Dismissible notice shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// What a data screen currently shows.
#[derive(Debug, PartialEq)]
pub enum ScreenState<'a, T> {
    Loading,
    Ready(&'a T),
    Error(&'a str),
}

/// Loading/ready/error lifecycle with a refreshing overlay.
#[derive(Debug)]
pub struct Screen<T> {
    data: Option<T>,
    error: Option<String>,
    loading: bool,
    refreshing: bool,
    default_error: &'static str,
}

impl<T> Screen<T> {
    /// A freshly mounted screen, loading.
    pub fn new(default_error: &'static str) -> Self {
        Self {
            data: None,
            error: None,
            loading: true,
            refreshing: false,
            default_error,
        }
    }

    pub fn state(&self) -> ScreenState<'_, T> {
        if self.loading {
            return ScreenState::Loading;
        }
        match (&self.error, &self.data) {
            (Some(error), _) => ScreenState::Error(error),
            (None, Some(data)) => ScreenState::Ready(data),
            (None, None) => ScreenState::Error(self.default_error),
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// Last successfully fetched data, even if a later fetch failed.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Mark a pull-to-refresh as started.
    pub fn start_refresh(&mut self) {
        self.refreshing = true;
    }

    /// Apply the result of a fetch. The error is handed back so callers can
    /// react to auth failures.
    pub fn complete(&mut self, result: Result<T, AppError>) -> Result<(), AppError> {
        self.loading = false;
        self.refreshing = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(error_message(&e, self.default_error));
                Err(e)
            }
        }
    }

    /// Run a fetch and apply its result.
    pub async fn run<F>(&mut self, fetch: F) -> Result<(), AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        let result = fetch.await;
        self.complete(result)
    }

    /// Refresh: keep showing current data while `fetch` runs.
    pub async fn refresh<F>(&mut self, fetch: F) -> Result<(), AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        self.start_refresh();
        self.run(fetch).await
    }
}

/// Message for an inline error panel: the server's message when it sent
/// one, otherwise a description of the failure.
pub fn error_message(err: &AppError, default: &str) -> String {
    if let Some(message) = err.server_message() {
        return message.to_string();
    }
    match err {
        AppError::Api { status, .. } => format!("{} (HTTP {})", default, status),
        AppError::Unauthorized(_) => default.to_string(),
        other => other.to_string(),
    }
}
