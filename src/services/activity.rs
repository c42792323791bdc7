// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity history enumeration rules.
//!
//! Handles:
//! - Which months of a year are worth querying
//! - The `startDate` parameter of the date-range endpoint
//! - Picking one month out of the date-range JSON

use crate::error::{AppError, Result};
use crate::models::Activity;
use crate::time_utils::month_abbr;
use chrono::{Datelike, Month, NaiveDate};
use serde_json::Value;

/// Reject years that have not happened yet.
pub fn check_year(year: i32, today: NaiveDate) -> Result<()> {
    if year > today.year() {
        return Err(AppError::NoActivityInYear(year));
    }
    Ok(())
}

/// Months to query for `year`: all twelve for past years, January through
/// the current month for the current year.
pub fn months_to_query(year: i32, today: NaiveDate) -> Result<Vec<Month>> {
    check_year(year, today)?;
    let last = if year >= today.year() { today.month() } else { 12 };
    Ok((1..=last)
        .filter_map(|n| u8::try_from(n).ok())
        .filter_map(|n| Month::try_from(n).ok())
        .collect())
}

/// `startDate` value for the first day of a month, e.g. `Jan-01-2024`.
pub fn start_date_param(month: Month, year: i32) -> String {
    format!("{}-01-{}", month_abbr(month), year)
}

/// Pull one month's activities out of a date-range response body.
///
/// The body looks like `{"activities": {"2024": {"Jan": [ ... ]}}}`.
pub fn extract_month_activities(body: &str, month: Month, year: i32) -> Result<Vec<Activity>> {
    let parsed: Value = serde_json::from_str(body).map_err(|_| AppError::NoActivitiesFound)?;
    let activities = parsed
        .get("activities")
        .ok_or(AppError::NoActivitiesFound)?;

    if is_empty_json(activities) {
        return Err(AppError::NoActivityInMonth);
    }

    let entries = activities
        .get(year.to_string())
        .and_then(|by_month| by_month.get(month_abbr(month)))
        .ok_or(AppError::NoActivityInMonth)?;

    let list = entries.as_array().ok_or_else(|| {
        AppError::UnexpectedResponse(format!(
            "activities for {} {} is not a list",
            month_abbr(month),
            year
        ))
    })?;

    list.iter().map(Activity::from_json).collect()
}

fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(_) => false,
    }
}
