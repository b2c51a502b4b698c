mod support;

use std::path::Path;
use std::time::Duration;

use serde_json::json;
use support::{StubResponse, StubServer};
use wealth_automation::config::{ConvertKitConfig, WordPressConfig};
use wealth_automation::publishing::{
    AuthMethod, BroadcastSender, ConvertKitClient, Form, PostPublisher, WordPressClient,
};

fn wordpress_config(base_url: &str, dir: &Path) -> WordPressConfig {
    WordPressConfig {
        api_url: format!("{base_url}/wp-json/wp/v2/posts"),
        user: Some("editor".to_string()),
        app_password: Some("abcd efgh ijkl".to_string()),
        jwt_secret: Some("jwt-secret".to_string()),
        fallback_dir: dir.join("wp_fallback"),
    }
}

fn convertkit_config(base_url: &str, dir: &Path) -> ConvertKitConfig {
    ConvertKitConfig {
        api_url: format!("{base_url}/v4"),
        api_secret: Some("ck-secret".to_string()),
        api_key_v4: Some("ck-key".to_string()),
        fallback_dir: dir.join("ck_fallback"),
    }
}

fn body_json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("request body is json")
}

#[test]
fn wordpress_posts_with_jwt_and_reuses_token() {
    let dir = tempfile::tempdir().expect("tempdir");
    let server = StubServer::start(vec![
        StubResponse::json(200, json!({ "token": "jwt-abc" })),
        StubResponse::json(201, json!({ "id": 42, "link": "https://blog.example/?p=42" })),
        StubResponse::json(201, json!({ "id": 43, "link": "https://blog.example/?p=43" })),
    ]);
    let mut client = WordPressClient::new(
        wordpress_config(&server.base_url, dir.path()),
        Duration::from_secs(5),
    )
    .expect("client");

    let first = client.create_post("First", "<p>One</p>");
    let second = client.create_post("Second", "<p>Two</p>");
    let requests = server.finish();

    assert_eq!(first.post_id, Some(42));
    assert_eq!(first.url.as_deref(), Some("https://blog.example/?p=42"));
    assert_eq!(first.auth_method, Some(AuthMethod::Jwt));
    assert_eq!(second.post_id, Some(43));

    assert_eq!(requests.len(), 3);
    assert!(requests[0]
        .request_line
        .starts_with("POST /wp-json/jwt-auth/v1/token "));
    let credentials = body_json(&requests[0].body);
    assert_eq!(credentials["username"], "editor");
    assert_eq!(credentials["password"], "abcdefghijkl");

    assert!(requests[1].request_line.starts_with("POST /wp-json/wp/v2/posts "));
    assert_eq!(requests[1].header("authorization"), Some("Bearer jwt-abc"));
    let post = body_json(&requests[1].body);
    assert_eq!(post["title"], "First");
    assert_eq!(post["content"], "<p>One</p>");
    assert_eq!(post["status"], "publish");
    assert_eq!(requests[2].header("authorization"), Some("Bearer jwt-abc"));
}

#[test]
fn wordpress_switches_to_basic_auth_when_token_response_is_not_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let server = StubServer::start(vec![
        StubResponse::html(200, "<html>plugin missing</html>"),
        StubResponse::json(201, json!({ "id": 7, "link": "https://blog.example/?p=7" })),
    ]);
    let mut client = WordPressClient::new(
        wordpress_config(&server.base_url, dir.path()),
        Duration::from_secs(5),
    )
    .expect("client");

    let outcome = client.create_post("Title", "<p>Body</p>");
    let requests = server.finish();

    assert_eq!(outcome.post_id, Some(7));
    assert_eq!(outcome.auth_method, Some(AuthMethod::Basic));
    assert_eq!(
        requests[1].header("authorization"),
        Some("Basic ZWRpdG9yOmFiY2RlZmdoaWprbA==")
    );
}

#[test]
fn wordpress_rejected_token_request_goes_straight_to_fallback() {
    let dir = tempfile::tempdir().expect("tempdir");
    let server = StubServer::start(vec![StubResponse::json(
        403,
        json!({ "code": "[jwt_auth] incorrect_password" }),
    )]);
    let mut client = WordPressClient::new(
        wordpress_config(&server.base_url, dir.path()),
        Duration::from_secs(5),
    )
    .expect("client");

    let outcome = client.create_post("Locked Out", "<p>Body</p>");
    let requests = server.finish();

    assert_eq!(requests.len(), 1);
    assert!(!outcome.published());
    assert_eq!(outcome.auth_method, None);
    let path = outcome.fallback_path.expect("fallback written");
    let saved = std::fs::read_to_string(path).expect("fallback readable");
    assert_eq!(saved, "<h1>Locked Out</h1>\n<p>Body</p>");
}

#[test]
fn wordpress_server_error_saves_fallback_with_auth_method() {
    let dir = tempfile::tempdir().expect("tempdir");
    let server = StubServer::start(vec![
        StubResponse::json(200, json!({ "token": "jwt-abc" })),
        StubResponse::html(500, "Internal Server Error"),
    ]);
    let mut client = WordPressClient::new(
        wordpress_config(&server.base_url, dir.path()),
        Duration::from_secs(5),
    )
    .expect("client");

    let outcome = client.create_post("Weekly: Tips, Tricks", "<p>Body</p>");
    server.finish();

    assert_eq!(outcome.post_id, None);
    assert_eq!(outcome.auth_method, Some(AuthMethod::Jwt));
    let path = outcome.fallback_path.expect("fallback written");
    assert!(path.starts_with(dir.path().join("wp_fallback")));
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .expect("utf-8 file name");
    assert!(name.starts_with("wp_fallback_"));
    assert!(name.ends_with("_Weekly__Tips__Tricks.html"));
}

#[test]
fn wordpress_response_without_link_is_a_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let server = StubServer::start(vec![
        StubResponse::json(200, json!({ "token": "jwt-abc" })),
        StubResponse::json(201, json!({ "id": 9 })),
    ]);
    let mut client = WordPressClient::new(
        wordpress_config(&server.base_url, dir.path()),
        Duration::from_secs(5),
    )
    .expect("client");

    let outcome = client.create_post("Half Created", "<p>Body</p>");
    server.finish();

    assert!(!outcome.published());
    assert!(outcome.fallback_path.is_some());
}

#[test]
fn convertkit_blast_is_created_with_bearer_secret() {
    let dir = tempfile::tempdir().expect("tempdir");
    let server = StubServer::start(vec![StubResponse::json(
        201,
        json!({ "email_blast": { "id": 99, "subject": "Weekly Digest" } }),
    )]);
    let mut client = ConvertKitClient::new(
        convertkit_config(&server.base_url, dir.path()),
        Duration::from_secs(5),
    )
    .expect("client");

    let outcome = client.send_broadcast("Weekly Digest", "<p>Hello</p>");
    let requests = server.finish();

    assert!(outcome.sent);
    assert_eq!(outcome.broadcast_id, Some(99));
    assert_eq!(outcome.fallback_path, None);
    assert!(requests[0].request_line.starts_with("POST /v4/email_blasts "));
    assert_eq!(requests[0].header("authorization"), Some("Bearer ck-secret"));
    let body = body_json(&requests[0].body);
    assert_eq!(body["subject"], "Weekly Digest");
    assert_eq!(body["content"], "<p>Hello</p>");
}

#[test]
fn convertkit_response_without_id_saves_fallback() {
    let dir = tempfile::tempdir().expect("tempdir");
    let server = StubServer::start(vec![StubResponse::json(200, json!({ "email_blast": {} }))]);
    let mut client = ConvertKitClient::new(
        convertkit_config(&server.base_url, dir.path()),
        Duration::from_secs(5),
    )
    .expect("client");

    let outcome = client.send_broadcast("Weekly Digest", "<p>Hello</p>");
    server.finish();

    assert!(!outcome.sent);
    let path = outcome.fallback_path.expect("fallback written");
    assert!(path.starts_with(dir.path().join("ck_fallback")));
}

#[test]
fn convertkit_lists_forms() {
    let dir = tempfile::tempdir().expect("tempdir");
    let server = StubServer::start(vec![StubResponse::json(
        200,
        json!({
            "forms": [
                { "id": 1, "name": "Newsletter", "type": "embed" },
                { "id": 2, "name": "Lead Magnet", "type": "hosted" },
                { "id": 3, "name": null, "type": "embed" }
            ]
        }),
    )]);
    let client = ConvertKitClient::new(
        convertkit_config(&server.base_url, dir.path()),
        Duration::from_secs(5),
    )
    .expect("client");

    let forms = client.list_forms();
    let requests = server.finish();

    assert_eq!(
        forms,
        vec![
            Form { id: 1, name: Some("Newsletter".to_string()) },
            Form { id: 2, name: Some("Lead Magnet".to_string()) },
            Form { id: 3, name: None },
        ]
    );
    assert!(requests[0].request_line.starts_with("GET /v4/forms "));
}

#[test]
fn convertkit_forms_error_yields_empty_list() {
    let dir = tempfile::tempdir().expect("tempdir");
    let server = StubServer::start(vec![StubResponse::json(401, json!({ "errors": ["bad"] }))]);
    let client = ConvertKitClient::new(
        convertkit_config(&server.base_url, dir.path()),
        Duration::from_secs(5),
    )
    .expect("client");

    assert!(client.list_forms().is_empty());
    server.finish();
}
