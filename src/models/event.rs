// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Upcoming event model, as listed for the signed-in volunteer.

use serde::{Deserialize, Serialize};

use super::wire::{lenient_i64, Id};

/// A volunteering opportunity the user is registered for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Registration-scoped event identifier
    #[serde(default)]
    pub event_id: Option<Id>,
    /// Plain identifier, used by servers that omit `event_id`
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(rename = "eventTitle", default)]
    pub title: Option<String>,
    #[serde(rename = "eventDescription", default)]
    pub description: Option<String>,
    #[serde(rename = "eventLocation", default)]
    pub location: Option<String>,
    /// Start date/time (ISO 8601)
    #[serde(rename = "eventStart", default)]
    pub start: Option<String>,
    /// End date/time (ISO 8601)
    #[serde(rename = "eventEnd", default)]
    pub end: Option<String>,
    #[serde(rename = "eventPoints", default, deserialize_with = "lenient_i64")]
    pub points: Option<i64>,
}

impl Event {
    pub fn id(&self) -> Option<&Id> {
        self.event_id.as_ref().or(self.id.as_ref())
    }

    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("Untitled Event")
    }

    pub fn display_points(&self) -> i64 {
        self.points.unwrap_or(0)
    }
}
