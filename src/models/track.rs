// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! GPS track model used to pre-fill the upload form.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::time_utils::{format_hms, format_utc_rfc3339};

/// A single GPX track point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
    /// `<time>` is optional in GPX
    pub time: Option<DateTime<Utc>>,
}

/// Earliest and latest timestamp of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSpan {
    /// Span of an unordered set of timestamps; `None` if there are none.
    pub fn from_times<I>(times: I) -> Option<Self>
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        times.into_iter().fold(None, |span, t| match span {
            None => Some(TimeSpan { start: t, end: t }),
            Some(TimeSpan { start, end }) => Some(TimeSpan {
                start: start.min(t),
                end: end.max(t),
            }),
        })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Values derived from a GPX file for the upload form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadMetadata {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Whole seconds between first and last timestamp
    pub duration_secs: i64,
    pub distance_meters: f64,
    pub point_count: usize,
}

impl UploadMetadata {
    pub fn duration(&self) -> Duration {
        Duration::seconds(self.duration_secs)
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    /// One-line human readable summary.
    pub fn summary(&self) -> String {
        format!(
            "{} points, start {}, duration {}, distance {:.2} km",
            self.point_count,
            format_utc_rfc3339(self.start_time),
            format_hms(self.duration()),
            self.distance_km()
        )
    }
}
