// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use runkeeper_client::config::Config;
use runkeeper_client::RunkeeperService;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Username the mocked home page links to.
#[allow(dead_code)]
pub const USERNAME: &str = "jdoe42";

/// Login page with the hidden fields the site expects back.
#[allow(dead_code)]
pub const LOGIN_PAGE: &str = r#"
<html><body>
<form id="loginForm" method="post" action="/login">
  <input type="hidden" name="_sourcePage" value="src123" />
  <input type="hidden" name="__fp" value="fp456" />
  <input type="email" name="email" />
  <input type="password" name="password" />
</form>
</body></html>
"#;

/// Home page of a logged-in user.
#[allow(dead_code)]
pub fn home_page() -> String {
    format!(
        r#"<html><body>
        <a href="/home">Feed</a>
        <a class="profileLink" href="/user/{}/profile">Profile</a>
        </body></html>"#,
        USERNAME
    )
}

/// Config pointing at the mock server.
#[allow(dead_code)]
pub fn test_config(server: &MockServer) -> Config {
    Config::default().with_site_url(server.uri())
}

/// Mount the login form and a login endpoint that sets the `checker` cookie.
#[allow(dead_code)]
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("_sourcePage=src123"))
        .and(body_string_contains("email=runner%40example.com"))
        .and(body_string_contains("password=test_password"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "checker=logged-in; Path=/")
                .set_body_string("<html>Welcome back</html>"),
        )
        .mount(server)
        .await;
}

/// Mount the home page used to resolve the profile username.
#[allow(dead_code)]
pub async fn mount_home(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(ResponseTemplate::new(200).set_body_string(home_page()))
        .mount(server)
        .await;
}

/// Start a mock site and log in to it.
#[allow(dead_code)]
pub async fn logged_in_service() -> (MockServer, RunkeeperService) {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_home(&server).await;

    let service = RunkeeperService::login(&test_config(&server))
        .await
        .expect("login against mock site should succeed");

    (server, service)
}

/// Path of a file under tests/fixtures.
#[allow(dead_code)]
pub fn fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}
