// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types shared by the client, the GPX tools and the CLI.

/// Application error type.
///
/// Each variant is a flat signal for one kind of anomaly. Nothing is retried;
/// callers decide what to do with it.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Could not reach Runkeeper: {0}")]
    EndpointConnection(String),

    #[error("Invalid email or password")]
    InvalidAuthentication,

    #[error("No hidden form fields found")]
    HiddenElementsNotFound,

    #[error("Profile username not found")]
    ProfileNotFound,

    #[error("Invalid activity id: {0}")]
    InvalidActivityId(String),

    #[error("No activities found")]
    NoActivitiesFound,

    #[error("No activities in month")]
    NoActivityInMonth,

    #[error("No activities in year {0}")]
    NoActivityInYear(i32),

    #[error("Unknown activity type: {0}")]
    ActivityTypeUnknown(String),

    #[error("No activity types found on upload form")]
    NoActivityTypesFound,

    #[error("Failed to parse GPX: {0}")]
    GpxParse(String),

    #[error("GPX namespace not found")]
    GpxNamespaceNotFound,

    #[error("Error uploading track: {0}")]
    UploadFailed(String),

    #[error("Unknown file type: {0}")]
    UnknownFileType(String),

    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for the errors that mean "this month simply has nothing in it".
    ///
    /// Year listings record these months as empty instead of failing.
    pub fn is_empty_range(&self) -> bool {
        matches!(self, AppError::NoActivityInMonth | AppError::NoActivitiesFound)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::EndpointConnection(err.to_string())
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
