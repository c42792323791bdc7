// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and parsing.

use chrono::{DateTime, Duration, Month, NaiveDateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format a timestamp the way the upload form expects its start time.
pub fn format_form_datetime(date: DateTime<Utc>) -> String {
    date.format("%Y/%m/%d %H:%M:%S").to_string()
}

/// Three-letter English abbreviation ("Jan", "Feb", ...).
pub fn month_abbr(month: Month) -> &'static str {
    &month.name()[..3]
}

/// Parse a month given as a number (1-12), an abbreviation or a full name.
pub fn parse_month(input: &str) -> Option<Month> {
    let trimmed = input.trim();
    if let Ok(n) = trimmed.parse::<u8>() {
        return Month::try_from(n).ok();
    }
    trimmed.parse::<Month>().ok()
}

/// Split a duration into zero-padded hours, minutes and seconds.
///
/// Hours are not wrapped at 24. Negative durations clamp to zero.
pub fn hms_parts(duration: Duration) -> (String, String, String) {
    let total = duration.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    (
        format!("{:02}", hours),
        format!("{:02}", minutes),
        format!("{:02}", seconds),
    )
}

/// Format a duration as `HH:MM:SS`.
pub fn format_hms(duration: Duration) -> String {
    let (h, m, s) = hms_parts(duration);
    format!("{}:{}:{}", h, m, s)
}

/// Parse an ISO-8601-like timestamp.
///
/// Accepts RFC3339 (any offset, converted to UTC) and offset-less
/// `YYYY-MM-DDTHH:MM:SS[.fff]`, which is taken as UTC.
pub fn parse_iso8601(input: &str) -> Option<DateTime<Utc>> {
    let trimmed = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Parse the date printed on an activity page, e.g. `Sat Jan 06 08:30:00 PST 2024`.
///
/// Returns the naive local time and the timezone abbreviation.
pub fn parse_activity_datetime(input: &str) -> Option<(NaiveDateTime, String)> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.len() != 6 {
        return None;
    }
    let zone = tokens[4].to_string();
    let without_zone = format!(
        "{} {} {} {} {}",
        tokens[0], tokens[1], tokens[2], tokens[3], tokens[5]
    );
    let parsed = NaiveDateTime::parse_from_str(&without_zone, "%a %b %d %H:%M:%S %Y").ok()?;
    Some((parsed, zone))
}
