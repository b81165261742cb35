//! End-to-end installation token flow against a mock GitHub API.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use ghauth_application::{AuthError, ErrorKind, ReuseTokenSource, StaticTokenSource, TokenSource};
use ghauth_domain::{InstallationPermissions, InstallationTokenOptions, PermissionLevel};
use ghauth_infrastructure::{
    ApplicationClaims, InstallationTokenSource, ReqwestTransport, new_application_token_source,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const PRIVATE_KEY: &[u8] = include_bytes!("fixtures/app_key.pem");
const PUBLIC_KEY: &[u8] = include_bytes!("fixtures/app_key.pub.pem");

const TOKEN_PATH: &str = "/app/installations/1/access_tokens";
const TOKEN_BODY: &str = r#"{"token":"tkn-1","expires_at":"2030-01-01T00:00:00Z"}"#;
const ERROR_BODY: &str = r#"{"message":"nope"}"#;

fn installation_source(server: &MockServer) -> InstallationTokenSource {
    InstallationTokenSource::builder(1, StaticTokenSource::new("app-jwt"))
        .with_base_url(server.uri())
        .build()
        .unwrap()
}

fn bearer(request: &Request) -> String {
    request
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_created_token_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("content-type", "application/json"))
        .and(header("authorization", "Bearer app-jwt"))
        .respond_with(ResponseTemplate::new(201).set_body_string(TOKEN_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let credential = installation_source(&server).token().await.unwrap();

    assert_eq!(credential.access_token, "tkn-1");
    assert_eq!(credential.token_type, "Bearer");
    assert_eq!(
        credential.expiry.unwrap().to_rfc3339(),
        "2030-01-01T00:00:00+00:00"
    );
}

#[tokio::test]
async fn test_ok_status_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(TOKEN_BODY))
        .mount(&server)
        .await;

    let credential = installation_source(&server).token().await.unwrap();
    assert_eq!(credential.access_token, "tkn-1");
}

#[tokio::test]
async fn test_error_statuses_are_reported() {
    for status in [400_u16, 401, 403, 404, 500] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(ERROR_BODY))
            .mount(&server)
            .await;

        let error = installation_source(&server).token().await.unwrap_err();
        assert_eq!(error.status(), Some(status));
        assert_eq!(error.kind(), ErrorKind::Protocol);
        assert!(error.to_string().contains("nope"), "status {status}");
    }
}

#[tokio::test]
async fn test_invalid_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_string("invalid json"))
        .mount(&server)
        .await;

    let error = installation_source(&server).token().await.unwrap_err();
    assert!(matches!(error, AuthError::Decode(_)));
}

#[tokio::test]
async fn test_options_are_sent_as_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_json(serde_json::json!({
            "repositories": ["mocked-repo-1"],
            "permissions": {"pull_requests": "read"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_string(TOKEN_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let level = PermissionLevel::Read;
    let permissions = InstallationPermissions::new().with("pull_requests", level);
    let options = InstallationTokenOptions::default()
        .with_repositories(["mocked-repo-1"])
        .with_permissions(permissions);
    let source = InstallationTokenSource::builder(1, StaticTokenSource::new("app-jwt"))
        .with_base_url(server.uri())
        .with_options(options)
        .build()
        .unwrap();

    source.token().await.unwrap();
}

#[tokio::test]
async fn test_no_options_sends_no_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_string(TOKEN_BODY))
        .mount(&server)
        .await;

    installation_source(&server).token().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_string(TOKEN_BODY)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let source = InstallationTokenSource::builder(1, StaticTokenSource::new("app-jwt"))
        .with_base_url(server.uri())
        .with_timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let error = source.token().await.unwrap_err();
    assert_eq!(error, AuthError::Timeout { timeout_ms: 100 });
    assert_eq!(error.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_enterprise_host_uses_api_v3_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/app/installations/1/access_tokens"))
        .respond_with(ResponseTemplate::new(201).set_body_string(TOKEN_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let source = InstallationTokenSource::builder(1, StaticTokenSource::new("app-jwt"))
        .with_enterprise_url(server.uri())
        .build()
        .unwrap();

    assert_eq!(source.token().await.unwrap().access_token, "tkn-1");
}

#[tokio::test]
async fn test_app_jwt_authenticates_and_installation_token_is_reused() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_string(TOKEN_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let app_source = new_application_token_source(12345, PRIVATE_KEY).unwrap();
    let installation = InstallationTokenSource::builder(1, app_source)
        .with_base_url(server.uri())
        .build()
        .unwrap();
    let source = ReuseTokenSource::new(installation);

    assert_eq!(source.token().await.unwrap().access_token, "tkn-1");
    assert_eq!(source.token().await.unwrap().access_token, "tkn-1");

    let requests = server.received_requests().await.unwrap();
    let authorization = bearer(&requests[0]);
    let jwt = authorization.strip_prefix("Bearer ").unwrap();

    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_exp = false;
    let claims = jsonwebtoken::decode::<ApplicationClaims>(
        jwt,
        &DecodingKey::from_rsa_pem(PUBLIC_KEY).unwrap(),
        &validation,
    )
    .unwrap()
    .claims;
    assert_eq!(claims.iss, "12345");
    assert_eq!(claims.exp - claims.iat, 600);
}

#[tokio::test]
async fn test_expired_installation_token_is_renewed_with_same_jwt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_string(r#"{"token":"short-lived","expires_at":"2000-01-01T00:00:00Z"}"#),
        )
        .expect(2)
        .mount(&server)
        .await;

    let app_source = new_application_token_source(12345, PRIVATE_KEY).unwrap();
    let source = ReuseTokenSource::new(
        InstallationTokenSource::builder(1, app_source)
            .with_transport(Arc::new(ReqwestTransport::new().unwrap()))
            .with_base_url(server.uri())
            .build()
            .unwrap(),
    );

    source.token().await.unwrap();
    source.token().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(bearer(&requests[0]), bearer(&requests[1]));
}

#[tokio::test]
async fn test_unreachable_host_is_a_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let source = InstallationTokenSource::builder(1, StaticTokenSource::new("app-jwt"))
        .with_base_url(format!("http://127.0.0.1:{port}"))
        .build()
        .unwrap();

    let error = source.token().await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Transport);
}
