// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Attendance record model. Records are created by the server when a scan
//! succeeds; the client only lists them.

use serde::{Deserialize, Serialize};

use super::wire::{lenient_i64, Id};

/// One attended event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    #[serde(default)]
    pub attendance_id: Option<Id>,
    /// Event the attendance belongs to
    #[serde(default)]
    pub event_id: Option<Id>,
    #[serde(rename = "eventTitle", default)]
    pub title: Option<String>,
    /// Event start date/time (ISO 8601)
    #[serde(rename = "eventStart", default)]
    pub event_start: Option<String>,
    #[serde(rename = "eventLocation", default)]
    pub location: Option<String>,
    /// Venue name, used when `eventLocation` is absent
    #[serde(rename = "venueName", default)]
    pub venue_name: Option<String>,
    /// When the scan was recorded (ISO 8601)
    #[serde(rename = "attendanceTime", default)]
    pub attendance_time: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Points awarded for the event
    #[serde(rename = "eventPoints", default, deserialize_with = "lenient_i64")]
    pub points: Option<i64>,
}

impl Attendance {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("Untitled Event")
    }

    pub fn display_points(&self) -> i64 {
        self.points.unwrap_or(0)
    }

    pub fn location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .or(self.venue_name.as_deref())
            .filter(|l| !l.is_empty())
    }

    pub fn attended_at(&self) -> Option<&str> {
        self.attendance_time
            .as_deref()
            .or(self.created_at.as_deref())
    }

    /// Last eight characters of the attendance id, or "N/A".
    pub fn short_id(&self) -> String {
        let id = self
            .attendance_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default();
        if id.is_empty() {
            return "N/A".to_string();
        }
        let chars: Vec<char> = id.chars().collect();
        chars[chars.len().saturating_sub(8)..].iter().collect()
    }
}
