// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity model built from the site's activity listing JSON.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, Result};

/// One activity as listed by the site.
///
/// Every field is optional: anything the source JSON omits stays `None`.
/// `timestamp` and `stats` are never part of a listing; they are filled in by
/// `RunkeeperService::populate`, which returns a new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Profile username of the owner
    #[serde(default)]
    pub username: Option<String>,
    /// Site activity ID
    #[serde(default, deserialize_with = "string_or_number")]
    pub activity_id: Option<String>,
    /// Distance as displayed by the site
    #[serde(default, deserialize_with = "string_or_number")]
    pub distance: Option<String>,
    /// Unit of `distance` ("km", "mi")
    #[serde(default, rename(deserialize = "distanceUnits"))]
    pub distance_units: Option<String>,
    /// Elapsed time as displayed by the site
    #[serde(
        default,
        rename(deserialize = "elapsedTime"),
        deserialize_with = "string_or_number"
    )]
    pub elapsed_time: Option<String>,
    /// Whether the activity was tracked live
    #[serde(default, deserialize_with = "lenient_bool")]
    pub live: Option<bool>,
    /// Caption shown in the activity feed
    #[serde(default, rename(deserialize = "mainText"))]
    pub caption: Option<String>,
    /// Activity type (Running, Cycling, ...)
    #[serde(default, rename(deserialize = "type"))]
    pub activity_type: Option<String>,
    /// Start time from the activity page
    #[serde(default, skip_deserializing)]
    pub timestamp: Option<ActivityTimestamp>,
    /// Calories, pace, speed and elevation from the point data endpoint
    #[serde(default, skip_deserializing)]
    pub stats: Option<ActivityStats>,
    /// Raw GPX export, only set by `RunkeeperService::populate_with_exports`
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub gpx_data: Option<String>,
    /// Raw KML export, only set by `RunkeeperService::populate_with_exports`
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub kml_data: Option<String>,
}

impl Activity {
    /// Build an activity from one element of the listing JSON.
    pub fn from_json(value: &Value) -> Result<Self> {
        Self::deserialize(value)
            .map_err(|e| AppError::UnexpectedResponse(format!("Activity JSON: {}", e)))
    }

    /// Activity ID, required for every per-activity request.
    pub fn id(&self) -> Result<&str> {
        self.activity_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::InvalidActivityId("<missing>".to_string()))
    }

    /// Copy of this activity with details filled in.
    pub fn with_details(&self, timestamp: ActivityTimestamp, stats: ActivityStats) -> Self {
        Self {
            timestamp: Some(timestamp),
            stats: Some(stats),
            ..self.clone()
        }
    }

    /// Copy of this activity carrying its GPX and KML exports.
    pub fn with_exports(&self, gpx: String, kml: String) -> Self {
        Self {
            gpx_data: Some(gpx),
            kml_data: Some(kml),
            ..self.clone()
        }
    }

    pub fn calories(&self) -> Option<&str> {
        self.stats.as_ref().and_then(|s| s.calories.as_deref())
    }

    pub fn elevation(&self) -> Option<&str> {
        self.stats.as_ref().and_then(|s| s.elevation.as_deref())
    }

    pub fn pace(&self) -> Option<&str> {
        self.stats.as_ref().and_then(|s| s.pace.as_deref())
    }

    pub fn speed(&self) -> Option<&str> {
        self.stats.as_ref().and_then(|s| s.speed.as_deref())
    }
}

/// Per-activity stats from the point data endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityStats {
    #[serde(
        default,
        rename(deserialize = "statsCalories"),
        deserialize_with = "string_or_number"
    )]
    pub calories: Option<String>,
    #[serde(
        default,
        rename(deserialize = "statsElevation"),
        deserialize_with = "string_or_number"
    )]
    pub elevation: Option<String>,
    #[serde(
        default,
        rename(deserialize = "statsPace"),
        deserialize_with = "string_or_number"
    )]
    pub pace: Option<String>,
    #[serde(
        default,
        rename(deserialize = "statsSpeed"),
        deserialize_with = "string_or_number"
    )]
    pub speed: Option<String>,
}

/// Start time as printed on the activity page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTimestamp {
    /// Wall-clock time in the activity's timezone
    pub local: NaiveDateTime,
    /// Timezone abbreviation as printed (e.g. "PST")
    pub zone: String,
}

/// Distance unit used by the upload form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[serde(rename = "km")]
    Kilometers,
    #[serde(rename = "mi")]
    Miles,
}

impl DistanceUnit {
    const METERS_PER_MILE: f64 = 1609.344;

    /// Convert metres into this unit.
    pub fn from_meters(self, meters: f64) -> f64 {
        match self {
            DistanceUnit::Kilometers => meters / 1000.0,
            DistanceUnit::Miles => meters / Self::METERS_PER_MILE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "km" | "kilometers" | "kilometres" => Ok(DistanceUnit::Kilometers),
            "mi" | "miles" => Ok(DistanceUnit::Miles),
            other => Err(format!("unknown distance unit: {}", other)),
        }
    }
}

/// Track export formats offered by the download endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Gpx,
    Kml,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Gpx => "gpx",
            ExportFormat::Kml => "kml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accept a JSON string or number, keeping it as a string.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Accept `true`/`false` as booleans, strings or 0/1.
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Some(Value::Number(n)) => n.as_i64().map(|n| n != 0),
        _ => None,
    })
}
