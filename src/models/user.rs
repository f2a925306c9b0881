// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Volunteer account model, as returned by login and the profile endpoint.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::wire::{lenient_i64, Id};

/// Volunteer account. Fields the client does not know about are kept in
/// `extra` so a stored user survives a save/load cycle unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    /// Full display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Account role ("volunteer", "ngo", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Profile picture URL
    #[serde(
        rename = "profilePhoto",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_photo: Option<String>,
    /// Date of birth (ISO 8601 date)
    #[serde(
        rename = "dateOfBirth",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_birth: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Number of events attended
    #[serde(
        default,
        deserialize_with = "lenient_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_attended: Option<i64>,
    /// Points earned across all events
    #[serde(
        default,
        deserialize_with = "lenient_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_points: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The profile endpoint returns the same shape as the login user.
pub type Profile = User;

impl User {
    pub const VOLUNTEER_ROLE: &'static str = "volunteer";

    /// Whether the client may serve this account. A missing role is
    /// accepted; the server enforces roles as well.
    pub fn is_volunteer(&self) -> bool {
        self.role
            .as_deref()
            .is_none_or(|role| role.eq_ignore_ascii_case(Self::VOLUNTEER_ROLE))
    }

    /// Name to greet the user with.
    pub fn first_name(&self) -> &str {
        self.name
            .as_deref()
            .and_then(|n| n.split_whitespace().next())
            .unwrap_or("Volunteer")
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Volunteer")
    }

    /// Age in whole years: the server's `age` if set, otherwise derived from
    /// `dateOfBirth` relative to `today`.
    pub fn display_age(&self, today: NaiveDate) -> Option<i64> {
        if let Some(age) = self.age.filter(|a| *a > 0) {
            return Some(age);
        }
        let dob = parse_date(self.date_of_birth.as_deref()?)?;
        today.years_since(dob).map(i64::from)
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|d| d.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|d| d.date())
        })
}

/// Authenticated session: bearer token plus the user it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(json: &str) -> User {
        serde_json::from_str(json).expect("user should parse")
    }

    #[test]
    fn test_role_check_is_case_insensitive() {
        assert!(user(r#"{"id": 1, "role": "Volunteer"}"#).is_volunteer());
        assert!(user(r#"{"id": 1}"#).is_volunteer());
        assert!(!user(r#"{"id": 1, "role": "ngo"}"#).is_volunteer());
    }

    #[test]
    fn test_display_age() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert_eq!(user(r#"{"age": 30}"#).display_age(today), Some(30));
        assert_eq!(
            user(r#"{"dateOfBirth": "2000-03-15"}"#).display_age(today),
            Some(25)
        );
        assert_eq!(
            user(r#"{"dateOfBirth": "2000-03-14T00:00:00Z"}"#).display_age(today),
            Some(26)
        );
        assert_eq!(user(r#"{"dateOfBirth": "soon"}"#).display_age(today), None);
        assert_eq!(user(r#"{}"#).display_age(today), None);
    }

    #[test]
    fn test_first_name_defaults() {
        assert_eq!(user(r#"{"name": "Siti Aminah"}"#).first_name(), "Siti");
        assert_eq!(user(r#"{}"#).first_name(), "Volunteer");
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let original = user(r#"{"id": 7, "name": "A", "phone": "0123", "total_points": "40"}"#);
        let json = serde_json::to_string(&original).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back.extra.get("phone"), Some(&serde_json::json!("0123")));
        assert_eq!(back.total_points, Some(40));
        assert_eq!(back, original);
    }
}
