// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time display.
//!
//! All helpers take `now` explicitly; its time zone is the display zone.
//! Timestamps without an offset are read as local to that zone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

/// Parse a server timestamp into the zone of `now`.
pub fn parse_datetime<Tz: TimeZone>(s: &str, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let s = s.trim();
    let tz = now.timezone();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&tz));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    tz.from_local_datetime(&naive).earliest()
}

/// Upcoming-list date: "Today, 09:00", "Tomorrow, 09:00" or
/// "Sat, Mar 14, 09:00". Missing input renders "-", unparseable input is
/// shown as-is.
pub fn format_upcoming_date<Tz: TimeZone>(s: Option<&str>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Some(s) = s.filter(|s| !s.is_empty()) else {
        return "-".to_string();
    };
    match parse_datetime(s, now) {
        Some(d) => upcoming_instant(&d, now),
        None => s.to_string(),
    }
}

fn upcoming_instant<Tz: TimeZone>(d: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let today = now.date_naive();
    if d.date_naive() == today {
        format!("Today, {}", d.format("%H:%M"))
    } else if Some(d.date_naive()) == today.succ_opt() {
        format!("Tomorrow, {}", d.format("%H:%M"))
    } else {
        d.format("%a, %b %-d, %H:%M").to_string()
    }
}

/// Event duration for the upcoming list. A same-day event renders as
/// "Mar 14, 2026 • 09:00 - 12:00"; otherwise both ends are formatted like
/// [`format_upcoming_date`].
pub fn format_event_duration<Tz: TimeZone>(
    start: Option<&str>,
    end: Option<&str>,
    now: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Some(start) = start.and_then(|s| parse_datetime(s, now)) else {
        return String::new();
    };
    let Some(end) = end.and_then(|e| parse_datetime(e, now)) else {
        return upcoming_instant(&start, now);
    };

    if start.date_naive() == end.date_naive() {
        format!(
            "{} \u{2022} {} - {}",
            start.format("%b %-d, %Y"),
            start.format("%H:%M"),
            end.format("%H:%M")
        )
    } else {
        format!(
            "{} - {}",
            upcoming_instant(&start, now),
            upcoming_instant(&end, now)
        )
    }
}

/// Attended-list timestamp relative to `now`: "Today, 09:00",
/// "Yesterday, 09:00", "3 days ago", or "Mar 14, 2026".
pub fn format_attended_ago<Tz: TimeZone>(s: Option<&str>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Some(s) = s.filter(|s| !s.is_empty()) else {
        return "-".to_string();
    };
    let Some(d) = parse_datetime(s, now) else {
        return s.to_string();
    };

    match days_between(now, &d) {
        0 => format!("Today, {}", d.format("%H:%M")),
        1 => format!("Yesterday, {}", d.format("%H:%M")),
        n if n < 7 => format!("{} days ago", n),
        _ => d.format("%b %-d, %Y").to_string(),
    }
}

/// Long event date: "Saturday, March 14, 2026". Empty when missing or
/// unparseable.
pub fn format_event_date<Tz: TimeZone>(s: Option<&str>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    s.and_then(|s| parse_datetime(s, now))
        .map(|d| d.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_default()
}

/// Whole days between two instants, ignoring direction.
pub fn days_between<Tz: TimeZone>(a: &DateTime<Tz>, b: &DateTime<Tz>) -> i64 {
    (a.clone() - b.clone()).abs().num_days()
}
