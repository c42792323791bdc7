// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Runkeeper website client.
//!
//! The site has no public API. This module:
//! - Logs in through the HTML login form and keeps the session cookies
//! - Resolves the profile username from the home page
//! - Enumerates activities month by month via the date-range JSON endpoint
//! - Fetches per-activity stats, start time and GPX/KML exports
//! - Uploads GPX tracks through the new-activity form

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    Activity, ActivityStats, ActivityTimestamp, DistanceUnit, ExportFormat, MonthActivities,
    UploadMetadata, YearActivities,
};
use crate::services::activity::{
    check_year, extract_month_activities, months_to_query, start_date_param,
};
use crate::services::{gpx, scrape};
use crate::time_utils::{format_form_datetime, hms_parts, month_abbr, parse_activity_datetime};
use chrono::{Datelike, Local, Month, NaiveDate};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::multipart;
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Cookie the site only sets after a successful login.
const LOGIN_COOKIE: &str = "checker";

/// Low-level client: one method per site endpoint, no session logic.
#[derive(Clone)]
pub struct RunkeeperClient {
    http: reqwest::Client,
    cookies: Arc<Jar>,
    base_url: String,
}

impl RunkeeperClient {
    /// Create a client with its own cookie jar.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let cookies = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(cookies.clone())
            .timeout(timeout)
            .user_agent(concat!("runkeeper-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            cookies,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Whether the cookie jar holds a cookie named `name` for the site.
    pub fn has_cookie(&self, name: &str) -> bool {
        let Ok(url) = Url::parse(&self.base_url) else {
            return false;
        };
        let Some(header) = self.cookies.cookies(&url) else {
            return false;
        };
        header.to_str().is_ok_and(|cookies| {
            cookies
                .split(';')
                .filter_map(|pair| pair.trim().split_once('='))
                .any(|(key, _)| key == name)
        })
    }

    /// GET a page and return its body.
    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        let response = self.http.get(self.url(path)).query(query).send().await?;
        let response = check_response(response).await?;
        Ok(response.text().await?)
    }

    /// GET a JSON endpoint and return its body whatever the status.
    ///
    /// These endpoints answer errors with an HTML page; callers tell them
    /// apart by whether the body parses as JSON.
    async fn get_body(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        let response = self.http.get(self.url(path)).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = %status, path, "JSON endpoint returned an error status");
        }
        Ok(response.text().await?)
    }

    /// GET the login page.
    pub async fn login_page(&self) -> Result<String> {
        self.get_text("/login", &[]).await
    }

    /// POST the login form.
    pub async fn submit_login(&self, form: &HashMap<String, String>) -> Result<()> {
        let response = self.http.post(self.url("/login")).form(form).send().await?;
        // A rejected login still answers 200 with the form; the cookie decides.
        tracing::debug!(status = %response.status(), "Login form submitted");
        Ok(())
    }

    /// GET the home page of the logged-in user.
    pub async fn home_page(&self) -> Result<String> {
        self.get_text("/home", &[]).await
    }

    /// GET the activity listing for the month starting at `start_date`.
    pub async fn activities_by_date_range(
        &self,
        username: &str,
        start_date: &str,
    ) -> Result<String> {
        self.get_body(
            "/activitiesByDateRange",
            &[("userName", username), ("startDate", start_date)],
        )
        .await
    }

    /// GET the point data JSON of an activity.
    pub async fn point_data(&self, activity_id: &str) -> Result<String> {
        self.get_body("/ajax/pointData", &[("activityId", activity_id)])
            .await
    }

    /// GET the public page of an activity.
    pub async fn activity_page(&self, username: &str, activity_id: &str) -> Result<String> {
        let path = format!(
            "/user/{}/activity/{}",
            urlencoding::encode(username),
            urlencoding::encode(activity_id)
        );
        self.get_text(&path, &[]).await
    }

    /// GET an activity export.
    pub async fn download_activity(
        &self,
        activity_id: &str,
        format: ExportFormat,
    ) -> Result<String> {
        self.get_text(
            "/download/activity",
            &[("activityId", activity_id), ("downloadType", format.as_str())],
        )
        .await
    }

    /// GET the new-activity form.
    pub async fn new_activity_page(&self) -> Result<String> {
        self.get_text("/new/activity", &[]).await
    }

    /// POST a track file; returns the JSON reply.
    pub async fn upload_track_file(&self, file_name: &str, data: Vec<u8>) -> Result<Value> {
        let part = multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str("application/gpx+xml")?;
        let form = multipart::Form::new()
            .text("uploadType", ".gpx")
            .part("trackFile", part);

        let response = self
            .http
            .post(self.url("/trackFileUpload"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AppError::UploadFailed(format!("HTTP {}: {}", status, body)));
        }
        serde_json::from_str(&body)
            .map_err(|e| AppError::UploadFailed(format!("Unreadable upload reply: {}", e)))
    }

    /// POST the new-activity form; returns the final URL after redirects.
    pub async fn submit_new_activity(&self, form: &HashMap<String, String>) -> Result<String> {
        let response = self
            .http
            .post(self.url("/new/activity"))
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UploadFailed(format!("HTTP {}: {}", status, body)));
        }
        Ok(response.url().to_string())
    }
}

/// Check response status and return an error if not successful.
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = %status, "Runkeeper request failed");
    Err(AppError::EndpointConnection(format!("HTTP {}: {}", status, body)))
}

// ─────────────────────────────────────────────────────────────────────────────
// RunkeeperService - authenticated session and high-level operations
// ─────────────────────────────────────────────────────────────────────────────

/// Result of a successful track upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReceipt {
    /// Page the site redirected to after saving
    pub activity_url: String,
    pub activity_type: String,
    pub metadata: UploadMetadata,
}

/// An authenticated session on the site.
///
/// Requests are issued one at a time; the only state is the cookie jar and
/// the lazily resolved profile username.
pub struct RunkeeperService {
    client: RunkeeperClient,
    distance_unit: DistanceUnit,
    profile_username: OnceCell<String>,
}

impl RunkeeperService {
    /// Log in with the configured credentials.
    pub async fn login(config: &Config) -> Result<Self> {
        let client = RunkeeperClient::new(
            &config.site_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;

        let mut form = scrape::hidden_inputs(&client.login_page().await?);
        if form.is_empty() {
            return Err(AppError::HiddenElementsNotFound);
        }
        form.insert("email".to_string(), config.email.clone());
        form.insert("password".to_string(), config.password.clone());

        client.submit_login(&form).await?;

        if !client.has_cookie(LOGIN_COOKIE) {
            tracing::warn!(email = %config.email, "Login rejected");
            return Err(AppError::InvalidAuthentication);
        }

        tracing::info!(email = %config.email, "Logged in");
        Ok(Self {
            client,
            distance_unit: config.distance_unit,
            profile_username: OnceCell::new(),
        })
    }

    /// Profile username (or numeric ID) of the logged-in user.
    ///
    /// Resolved from the home page on first use, then cached.
    pub async fn profile_username(&self) -> Result<&str> {
        let name = self
            .profile_username
            .get_or_try_init(|| async {
                let home = self.client.home_page().await?;
                let name = scrape::profile_username(&home).ok_or(AppError::ProfileNotFound)?;
                tracing::debug!(username = %name, "Resolved profile username");
                Ok::<_, AppError>(name)
            })
            .await?;
        Ok(name.as_str())
    }

    // ─── History ─────────────────────────────────────────────────────────────

    /// Activities of one month; `year` defaults to the current year.
    pub async fn activities_month(
        &self,
        month: Month,
        year: Option<i32>,
    ) -> Result<Vec<Activity>> {
        let today = Local::now().date_naive();
        self.activities_month_as_of(month, year.unwrap_or(today.year()), today)
            .await
    }

    async fn activities_month_as_of(
        &self,
        month: Month,
        year: i32,
        today: NaiveDate,
    ) -> Result<Vec<Activity>> {
        check_year(year, today)?;

        let username = self.profile_username().await?;
        let start_date = start_date_param(month, year);
        let body = self
            .client
            .activities_by_date_range(username, &start_date)
            .await?;

        let activities = extract_month_activities(&body, month, year)?;
        tracing::debug!(
            month = month_abbr(month),
            year,
            count = activities.len(),
            "Fetched month activities"
        );
        Ok(activities)
    }

    /// Activities of every month of `year` up to today.
    ///
    /// Months with nothing in them are kept with an empty list; any other
    /// failure aborts the listing.
    pub async fn activities_year(&self, year: i32) -> Result<YearActivities> {
        let today = Local::now().date_naive();
        let mut months = Vec::new();

        for month in months_to_query(year, today)? {
            let activities = match self.activities_month_as_of(month, year, today).await {
                Ok(list) => list,
                Err(e) if e.is_empty_range() => Vec::new(),
                Err(e) => return Err(e),
            };
            months.push(MonthActivities { month, activities });
        }

        let listing = YearActivities { year, months };
        tracing::info!(year, total = listing.total(), "Fetched year activities");
        Ok(listing)
    }

    // ─── Activity Details ────────────────────────────────────────────────────

    /// Calories, elevation, pace and speed of an activity.
    pub async fn activity_stats(&self, activity_id: &str) -> Result<ActivityStats> {
        let body = self.client.point_data(activity_id).await?;
        serde_json::from_str(&body).map_err(|_| AppError::InvalidActivityId(activity_id.to_string()))
    }

    /// Start time of an activity, as printed on its page.
    pub async fn activity_timestamp(&self, activity_id: &str) -> Result<ActivityTimestamp> {
        let username = self.profile_username().await?;
        let page = self.client.activity_page(username, activity_id).await?;

        let text = scrape::activity_subtitle_date(&page).ok_or_else(|| {
            AppError::UnexpectedResponse(format!("no date on activity {}", activity_id))
        })?;
        let (local, zone) = parse_activity_datetime(&text).ok_or_else(|| {
            AppError::UnexpectedResponse(format!("unparseable activity date: {}", text))
        })?;

        Ok(ActivityTimestamp { local, zone })
    }

    /// Raw GPX or KML export of an activity.
    pub async fn export_activity(&self, activity_id: &str, format: ExportFormat) -> Result<String> {
        tracing::debug!(activity_id, format = %format, "Exporting activity");
        self.client.download_activity(activity_id, format).await
    }

    /// Copy of `activity` with its stats and start time filled in.
    pub async fn populate(&self, activity: &Activity) -> Result<Activity> {
        let id = activity.id()?;
        let stats = self.activity_stats(id).await?;
        let timestamp = self.activity_timestamp(id).await?;
        Ok(activity.with_details(timestamp, stats))
    }

    /// Like `populate`, but also bundles the GPX and KML exports.
    pub async fn populate_with_exports(&self, activity: &Activity) -> Result<Activity> {
        let populated = self.populate(activity).await?;
        let id = populated.id()?;
        let gpx = self.export_activity(id, ExportFormat::Gpx).await?;
        let kml = self.export_activity(id, ExportFormat::Kml).await?;
        Ok(populated.with_exports(gpx, kml))
    }

    /// Find a listed activity by ID within one month.
    pub async fn find_activity(
        &self,
        activity_id: &str,
        month: Month,
        year: Option<i32>,
    ) -> Result<Activity> {
        self.activities_month(month, year)
            .await?
            .into_iter()
            .find(|a| a.activity_id.as_deref() == Some(activity_id))
            .ok_or_else(|| AppError::InvalidActivityId(activity_id.to_string()))
    }

    // ─── Upload ──────────────────────────────────────────────────────────────

    /// Upload a GPX track as a new activity.
    ///
    /// Start time, duration and distance are computed from the track.
    pub async fn upload_track(
        &self,
        path: &Path,
        activity_type: &str,
        notes: &str,
    ) -> Result<UploadReceipt> {
        let is_gpx = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gpx"));
        if !is_gpx {
            return Err(AppError::UnknownFileType(path.display().to_string()));
        }

        let data = tokio::fs::read(path).await.map_err(|e| {
            AppError::Internal(anyhow::Error::new(e).context(format!("reading {}", path.display())))
        })?;
        let metadata = gpx::metadata_from_gpx(&data)?;

        let page = self.client.new_activity_page().await?;
        let hidden = scrape::hidden_inputs(&page);
        if hidden.is_empty() {
            return Err(AppError::HiddenElementsNotFound);
        }
        let options = scrape::activity_type_options(&page);
        if options.is_empty() {
            return Err(AppError::NoActivityTypesFound);
        }
        let chosen = options
            .iter()
            .find(|o| o.matches(activity_type))
            .ok_or_else(|| AppError::ActivityTypeUnknown(activity_type.to_string()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "track.gpx".to_string());
        let reply = self.client.upload_track_file(&file_name, data).await?;
        let import_data = track_import_data(&reply)?;

        let form = new_activity_form(
            hidden,
            &chosen.value,
            &metadata,
            self.distance_unit,
            notes,
            &import_data,
        );
        let activity_url = self.client.submit_new_activity(&form).await?;

        tracing::info!(
            activity_type = %chosen.value,
            points = metadata.point_count,
            url = %activity_url,
            "Track uploaded"
        );

        Ok(UploadReceipt {
            activity_url,
            activity_type: chosen.value.clone(),
            metadata,
        })
    }
}

/// Pull `trackImportData` out of the track upload reply.
fn track_import_data(reply: &Value) -> Result<String> {
    if let Some(error) = reply.get("error").filter(|e| !e.is_null()) {
        let message = error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(AppError::UploadFailed(message));
    }
    match reply.get("trackImportData") {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(v) if v.is_object() || v.is_array() => Ok(v.to_string()),
        _ => Err(AppError::UploadFailed(
            "Upload reply has no track import data".to_string(),
        )),
    }
}

/// Fields of the new-activity form, on top of the page's hidden inputs.
fn new_activity_form(
    mut form: HashMap<String, String>,
    activity_type: &str,
    metadata: &UploadMetadata,
    unit: DistanceUnit,
    notes: &str,
    import_data: &str,
) -> HashMap<String, String> {
    let (hours, minutes, seconds) = hms_parts(metadata.duration());
    let distance = unit.from_meters(metadata.distance_meters);

    form.insert("activityType".to_string(), activity_type.to_string());
    form.insert(
        "startTimeString".to_string(),
        format_form_datetime(metadata.start_time),
    );
    form.insert("durationHours".to_string(), hours);
    form.insert("durationMinutes".to_string(), minutes);
    form.insert("durationSeconds".to_string(), seconds);
    form.insert("distance".to_string(), format!("{:.2}", distance));
    form.insert("distanceUnits".to_string(), unit.as_str().to_string());
    form.insert("notes".to_string(), notes.to_string());
    form.insert("importFormat".to_string(), "gpx".to_string());
    form.insert("trackImportData".to_string(), import_data.to_string());
    form
}
