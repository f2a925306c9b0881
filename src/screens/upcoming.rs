// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Upcoming events the volunteer is registered for.

use chrono::{DateTime, TimeZone};

use crate::models::Event;
use crate::screens::format::format_event_duration;
use crate::screens::{Screen, ScreenState};
use crate::services::api::ApiClient;
use crate::services::credentials::CredentialStore;

pub struct UpcomingScreen {
    api: ApiClient,
    store: CredentialStore,
    screen: Screen<Vec<Event>>,
}

impl UpcomingScreen {
    pub fn new(api: ApiClient, store: CredentialStore) -> Self {
        Self {
            api,
            store,
            screen: Screen::new("Failed to load events"),
        }
    }

    pub fn screen(&self) -> &Screen<Vec<Event>> {
        &self.screen
    }

    pub async fn load(&mut self) {
        self.store.load();
        if let Err(e) = self.screen.run(self.api.upcoming_events()).await {
            tracing::error!(error = %e, "Error fetching upcoming events");
        }
    }

    pub async fn refresh(&mut self) {
        self.store.load();
        if let Err(e) = self.screen.refresh(self.api.upcoming_events()).await {
            tracing::error!(error = %e, "Error fetching upcoming events");
        }
    }

    pub fn render<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let mut lines = Vec::new();
        match self.screen.state() {
            ScreenState::Loading => lines.push("Loading upcoming events...".to_string()),
            ScreenState::Error(message) => {
                lines.push("Upcoming Events".to_string());
                lines.push(String::new());
                lines.push("Unable to Load Events".to_string());
                lines.push(message.to_string());
                lines.push("Refresh to try again.".to_string());
            }
            ScreenState::Ready(events) => {
                lines.push("Upcoming Events".to_string());
                lines.push(format!(
                    "{} event{} registered",
                    events.len(),
                    if events.len() == 1 { "" } else { "s" }
                ));

                if events.is_empty() {
                    lines.push(String::new());
                    lines.push("No Upcoming Events".to_string());
                    lines.push("You haven't registered for any upcoming events yet".to_string());
                }

                for event in events.iter() {
                    lines.push(String::new());
                    lines.push(format!(
                        "{}  [{} pts]",
                        event.display_title(),
                        event.display_points()
                    ));
                    let when =
                        format_event_duration(event.start.as_deref(), event.end.as_deref(), now);
                    if !when.is_empty() {
                        lines.push(format!("  When:  {}", when));
                    }
                    if let Some(location) = event.location.as_deref().filter(|l| !l.is_empty()) {
                        lines.push(format!("  Where: {}", location));
                    }
                    if let Some(description) =
                        event.description.as_deref().filter(|d| !d.is_empty())
                    {
                        lines.push(format!("  {}", description));
                    }
                    lines.push("  confirmed".to_string());
                }
            }
        }
        if self.screen.is_refreshing() {
            lines.push("Refreshing...".to_string());
        }
        lines.join("\n")
    }
}
