// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Month and year activity listings.

use chrono::Month;
use serde::{Serialize, Serializer};

use super::Activity;
use crate::time_utils::month_abbr;

/// Activities of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthActivities {
    #[serde(serialize_with = "serialize_month")]
    pub month: Month,
    pub activities: Vec<Activity>,
}

/// Activities of one year, in calendar order.
///
/// Months that were queried but had nothing in them are present with an
/// empty list; months in the future are absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearActivities {
    pub year: i32,
    pub months: Vec<MonthActivities>,
}

impl YearActivities {
    /// Activities for `month`, if that month was queried.
    pub fn month(&self, month: Month) -> Option<&[Activity]> {
        self.months
            .iter()
            .find(|m| m.month == month)
            .map(|m| m.activities.as_slice())
    }

    pub fn total(&self) -> usize {
        self.months.iter().map(|m| m.activities.len()).sum()
    }
}

fn serialize_month<S: Serializer>(month: &Month, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(month_abbr(*month))
}
