// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login and profile resolution against a mock site.

use runkeeper_client::{AppError, RunkeeperService};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

#[tokio::test]
async fn test_login_succeeds_with_checker_cookie() {
    let server = MockServer::start().await;
    common::mount_login(&server).await;

    let result = RunkeeperService::login(&common::test_config(&server)).await;
    assert!(result.is_ok(), "Login should succeed: {:?}", result.err());
}

#[tokio::test]
async fn test_login_without_cookie_is_invalid_authentication() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(common::LOGIN_PAGE))
        .mount(&server)
        .await;

    // Wrong password: the site re-renders the form and sets no cookie
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(common::LOGIN_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let result = RunkeeperService::login(&common::test_config(&server)).await;
    assert!(matches!(result, Err(AppError::InvalidAuthentication)));
}

#[tokio::test]
async fn test_login_page_without_hidden_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Down for maintenance</html>"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = RunkeeperService::login(&common::test_config(&server)).await;
    assert!(matches!(result, Err(AppError::HiddenElementsNotFound)));
}

#[tokio::test]
async fn test_login_page_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = RunkeeperService::login(&common::test_config(&server)).await;
    assert!(matches!(result, Err(AppError::EndpointConnection(_))));
}

#[tokio::test]
async fn test_unreachable_site() {
    let config = runkeeper_client::Config::default().with_site_url("http://127.0.0.1:1");

    let result = RunkeeperService::login(&config).await;
    assert!(matches!(result, Err(AppError::EndpointConnection(_))));
}

#[tokio::test]
async fn test_profile_username_is_resolved_once() {
    let server = MockServer::start().await;
    common::mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(ResponseTemplate::new(200).set_body_string(common::home_page()))
        .expect(1)
        .mount(&server)
        .await;

    let service = RunkeeperService::login(&common::test_config(&server))
        .await
        .unwrap();

    assert_eq!(service.profile_username().await.unwrap(), common::USERNAME);
    assert_eq!(service.profile_username().await.unwrap(), common::USERNAME);
}

#[tokio::test]
async fn test_profile_not_found() {
    let server = MockServer::start().await;
    common::mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><a href=\"/home\">Feed</a></html>"))
        .mount(&server)
        .await;

    let service = RunkeeperService::login(&common::test_config(&server))
        .await
        .unwrap();

    assert!(matches!(
        service.profile_username().await,
        Err(AppError::ProfileNotFound)
    ));
}
