// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod history;
pub mod track;

pub use activity::{Activity, ActivityStats, ActivityTimestamp, DistanceUnit, ExportFormat};
pub use history::{MonthActivities, YearActivities};
pub use track::{TimeSpan, TrackPoint, UploadMetadata};
