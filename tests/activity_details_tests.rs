// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-activity stats, start time and exports against a mock site.

use chrono::{Datelike, Timelike};
use runkeeper_client::models::{Activity, ExportFormat};
use runkeeper_client::AppError;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

const ACTIVITY_PAGE: &str = r#"
<html><body>
  <div class="activityTitle">Tempo run</div>
  <div class="micro-text activitySubTitle">Sat Jan 06 08:30:00 PST 2024 - <a href="/type/running">Running</a></div>
</body></html>
"#;

async fn mount_details(server: &MockServer, activity_id: &str) {
    Mock::given(method("GET"))
        .and(path("/ajax/pointData"))
        .and(query_param("activityId", activity_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statsCalories": 412,
            "statsElevation": "38",
            "statsPace": "5:02",
            "statsSpeed": "11.9",
            "points": [{"latitude": 37.4, "longitude": -122.1}]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/user/{}/activity/{}", common::USERNAME, activity_id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(ACTIVITY_PAGE))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_activity_stats() {
    let (server, service) = common::logged_in_service().await;
    mount_details(&server, "1001").await;

    let stats = service.activity_stats("1001").await.unwrap();

    assert_eq!(stats.calories.as_deref(), Some("412"));
    assert_eq!(stats.elevation.as_deref(), Some("38"));
    assert_eq!(stats.pace.as_deref(), Some("5:02"));
    assert_eq!(stats.speed.as_deref(), Some("11.9"));
}

#[tokio::test]
async fn test_activity_stats_invalid_id() {
    let (server, service) = common::logged_in_service().await;

    Mock::given(method("GET"))
        .and(path("/ajax/pointData"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Not found</html>"))
        .mount(&server)
        .await;

    let result = service.activity_stats("nope").await;
    assert!(matches!(result, Err(AppError::InvalidActivityId(id)) if id == "nope"));
}

#[tokio::test]
async fn test_activity_stats_error_status_with_html_body() {
    let (server, service) = common::logged_in_service().await;

    Mock::given(method("GET"))
        .and(path("/ajax/pointData"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>Not found</html>"))
        .mount(&server)
        .await;

    let result = service.activity_stats("nope").await;
    assert!(matches!(result, Err(AppError::InvalidActivityId(id)) if id == "nope"));
}

#[tokio::test]
async fn test_activity_timestamp() {
    let (server, service) = common::logged_in_service().await;
    mount_details(&server, "1001").await;

    let timestamp = service.activity_timestamp("1001").await.unwrap();

    assert_eq!(timestamp.zone, "PST");
    assert_eq!(timestamp.local.year(), 2024);
    assert_eq!(timestamp.local.month(), 1);
    assert_eq!(timestamp.local.day(), 6);
    assert_eq!(timestamp.local.hour(), 8);
    assert_eq!(timestamp.local.minute(), 30);
}

#[tokio::test]
async fn test_activity_timestamp_missing_subtitle() {
    let (server, service) = common::logged_in_service().await;

    Mock::given(method("GET"))
        .and(path(format!("/user/{}/activity/5", common::USERNAME)))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let result = service.activity_timestamp("5").await;
    assert!(matches!(result, Err(AppError::UnexpectedResponse(_))));
}

#[tokio::test]
async fn test_populate_returns_new_activity() {
    let (server, service) = common::logged_in_service().await;
    mount_details(&server, "1001").await;

    let listed = Activity::from_json(&json!({
        "activity_id": 1001,
        "type": "RUN",
        "mainText": "Tempo run"
    }))
    .unwrap();

    let populated = service.populate(&listed).await.unwrap();

    assert_eq!(populated.caption.as_deref(), Some("Tempo run"));
    assert_eq!(populated.calories(), Some("412"));
    assert_eq!(populated.speed(), Some("11.9"));
    assert_eq!(
        populated.timestamp.as_ref().map(|t| t.zone.as_str()),
        Some("PST")
    );
    assert!(listed.stats.is_none());
    assert!(listed.timestamp.is_none());
}

#[tokio::test]
async fn test_populate_with_exports() {
    let (server, service) = common::logged_in_service().await;
    mount_details(&server, "1001").await;

    for (kind, body) in [("gpx", "<gpx>track</gpx>"), ("kml", "<kml>track</kml>")] {
        Mock::given(method("GET"))
            .and(path("/download/activity"))
            .and(query_param("activityId", "1001"))
            .and(query_param("downloadType", kind))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    let listed = Activity {
        activity_id: Some("1001".to_string()),
        ..Default::default()
    };
    let populated = service.populate_with_exports(&listed).await.unwrap();

    assert_eq!(populated.calories(), Some("412"));
    assert_eq!(populated.gpx_data.as_deref(), Some("<gpx>track</gpx>"));
    assert_eq!(populated.kml_data.as_deref(), Some("<kml>track</kml>"));
    assert!(listed.gpx_data.is_none());
}

#[tokio::test]
async fn test_populate_without_id() {
    let (_server, service) = common::logged_in_service().await;

    let result = service.populate(&Activity::default()).await;
    assert!(matches!(result, Err(AppError::InvalidActivityId(_))));
}

#[tokio::test]
async fn test_export_activity_formats() {
    let (server, service) = common::logged_in_service().await;

    Mock::given(method("GET"))
        .and(path("/download/activity"))
        .and(query_param("activityId", "1001"))
        .and(query_param("downloadType", "gpx"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<gpx>track</gpx>"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/download/activity"))
        .and(query_param("activityId", "1001"))
        .and(query_param("downloadType", "kml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<kml>track</kml>"))
        .expect(1)
        .mount(&server)
        .await;

    let gpx = service
        .export_activity("1001", ExportFormat::Gpx)
        .await
        .unwrap();
    let kml = service
        .export_activity("1001", ExportFormat::Kml)
        .await
        .unwrap();

    assert_eq!(gpx, "<gpx>track</gpx>");
    assert_eq!(kml, "<kml>track</kml>");
}

#[tokio::test]
async fn test_find_activity_in_month() {
    let (server, service) = common::logged_in_service().await;

    Mock::given(method("GET"))
        .and(path("/activitiesByDateRange"))
        .and(query_param("startDate", "Jan-01-2021"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "activities": {"2021": {"Jan": [
                {"activity_id": 1, "mainText": "First"},
                {"activity_id": 2, "mainText": "Second"}
            ]}}
        })))
        .mount(&server)
        .await;

    let found = service
        .find_activity("2", chrono::Month::January, Some(2021))
        .await
        .unwrap();
    assert_eq!(found.caption.as_deref(), Some("Second"));

    let missing = service
        .find_activity("3", chrono::Month::January, Some(2021))
        .await;
    assert!(matches!(missing, Err(AppError::InvalidActivityId(_))));
}
