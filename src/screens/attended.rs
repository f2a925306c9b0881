// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attendance history.

use chrono::{DateTime, TimeZone};

use crate::models::Attendance;
use crate::screens::format::{format_attended_ago, format_event_date};
use crate::screens::{Screen, ScreenState};
use crate::services::api::ApiClient;
use crate::services::credentials::CredentialStore;

pub struct AttendedScreen {
    api: ApiClient,
    store: CredentialStore,
    screen: Screen<Vec<Attendance>>,
}

impl AttendedScreen {
    pub fn new(api: ApiClient, store: CredentialStore) -> Self {
        Self {
            api,
            store,
            screen: Screen::new("Failed to load attended events"),
        }
    }

    pub fn screen(&self) -> &Screen<Vec<Attendance>> {
        &self.screen
    }

    /// Number of attended events currently displayed.
    pub fn total_events(&self) -> usize {
        self.screen.data().map_or(0, Vec::len)
    }

    pub async fn load(&mut self) {
        self.store.load();
        if let Err(e) = self.screen.run(self.api.attended_events()).await {
            tracing::error!(error = %e, "Error fetching attended events");
        }
    }

    pub async fn refresh(&mut self) {
        self.store.load();
        if let Err(e) = self.screen.refresh(self.api.attended_events()).await {
            tracing::error!(error = %e, "Error fetching attended events");
        }
    }

    pub fn render<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let mut lines = Vec::new();
        match self.screen.state() {
            ScreenState::Loading => lines.push("Loading your event history...".to_string()),
            ScreenState::Error(message) => {
                lines.push("Attended Events".to_string());
                lines.push(String::new());
                lines.push("Unable to Load Events".to_string());
                lines.push(message.to_string());
                lines.push("Refresh to try again.".to_string());
            }
            ScreenState::Ready(items) => {
                lines.push("Attended Events".to_string());
                lines.push(format!("You have attended {} events", self.total_events()));

                if items.is_empty() {
                    lines.push(String::new());
                    lines.push("No Events Attended Yet".to_string());
                    lines.push(
                        "Events you attend will appear here with your earned points and attendance records"
                            .to_string(),
                    );
                }

                for item in items.iter() {
                    lines.push(String::new());
                    lines.push(format!(
                        "{}  [{} pts]",
                        item.display_title(),
                        item.display_points()
                    ));
                    let date = format_event_date(item.event_start.as_deref(), now);
                    if !date.is_empty() {
                        lines.push(format!("  Date:  {}", date));
                    }
                    if let Some(location) = item.location() {
                        lines.push(format!("  Where: {}", location));
                    }
                    lines.push(format!(
                        "  Attended {}",
                        format_attended_ago(item.attended_at(), now)
                    ));
                    lines.push(format!("  attended    ID: {}", item.short_id()));
                }
            }
        }
        if self.screen.is_refreshing() {
            lines.push("Refreshing...".to_string());
        }
        lines.join("\n")
    }
}
