// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Home screen: volunteer profile, totals and logout.

use chrono::{DateTime, TimeZone};

use crate::error::AppError;
use crate::models::Profile;
use crate::screens::{Route, Screen, ScreenState};
use crate::services::api::ApiClient;
use crate::services::credentials::CredentialStore;

pub struct HomeScreen {
    api: ApiClient,
    store: CredentialStore,
    screen: Screen<Profile>,
}

impl HomeScreen {
    pub fn new(api: ApiClient, store: CredentialStore) -> Self {
        Self {
            api,
            store,
            screen: Screen::new("Failed to load profile"),
        }
    }

    pub fn screen(&self) -> &Screen<Profile> {
        &self.screen
    }

    /// Fetch the profile. Returns `Some(Route::Login)` when the session was
    /// rejected and the user has been logged out.
    pub async fn load(&mut self) -> Option<Route> {
        self.store.load();
        let result = self.screen.run(self.api.profile()).await;
        self.after_fetch(result)
    }

    /// Pull-to-refresh variant of [`HomeScreen::load`].
    pub async fn refresh(&mut self) -> Option<Route> {
        self.store.load();
        let result = self.screen.refresh(self.api.profile()).await;
        self.after_fetch(result)
    }

    fn after_fetch(&self, result: Result<(), AppError>) -> Option<Route> {
        match result {
            Ok(()) => None,
            Err(AppError::Unauthorized(_)) => {
                tracing::warn!("Session rejected, logging out");
                Some(self.logout())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching profile");
                None
            }
        }
    }

    /// Clear the stored session and go to login. Storage errors are logged
    /// and do not block the logout.
    pub fn logout(&self) -> Route {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Error clearing token/user");
        }
        Route::Login
    }

    pub fn render<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String {
        let mut lines = Vec::new();
        match self.screen.state() {
            ScreenState::Loading => lines.push("Loading your profile...".to_string()),
            ScreenState::Error(message) => {
                lines.push("Unable to load your profile".to_string());
                lines.push(message.to_string());
            }
            ScreenState::Ready(profile) => {
                lines.push(format!("{}!", profile.first_name()));
                lines.push(String::new());
                lines.push(profile.display_name().to_string());

                let mut details = Vec::new();
                if let Some(age) = profile.display_age(now.date_naive()) {
                    details.push(format!("{} years", age));
                }
                if let Some(gender) = profile.gender.as_deref().filter(|g| !g.is_empty()) {
                    details.push(gender.to_string());
                }
                if !details.is_empty() {
                    lines.push(details.join(" \u{2022} "));
                }
                if let Some(email) = profile.email.as_deref() {
                    lines.push(email.to_string());
                }

                lines.push(String::new());
                lines.push(format!(
                    "Events: {}    Points: {}",
                    profile.total_attended.unwrap_or(0),
                    profile.total_points.unwrap_or(0)
                ));
            }
        }
        if self.screen.is_refreshing() {
            lines.push("Refreshing...".to_string());
        }
        lines.join("\n")
    }
}
