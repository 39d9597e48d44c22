//! Sign-in, sign-out and session expiry against a mock backend.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use senji_admin::services::{AuthError, AuthService, Navigation};
use senji_admin::{ConsoleError, ErrorKind};
use senji_integration_tests::{TestContext, path as api_path};

fn password() -> SecretString {
    SecretString::from("correct horse battery staple")
}

#[tokio::test]
async fn test_login_stores_token_and_profile() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path(api_path("/admin/login")))
        .and(body_partial_json(json!({"email": "kim@senji.shop"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok_abc",
            "admin": {"_id": "a1", "name": "Kim", "email": "kim@senji.shop", "role": "admin"}
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/admin/me")))
        .and(header("authorization", "Bearer tok_abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "admin": {"_id": "a1", "name": "Kim Lee", "email": "kim@senji.shop", "role": "admin"}
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let auth = AuthService::new(ctx.api.clone());
    let admin = auth.login("  kim@senji.shop ", &password()).await.unwrap();

    assert_eq!(admin.name, "Kim");
    assert!(auth.is_logged_in());
    assert!(auth.is_admin());
    assert_eq!(
        ctx.api.credentials().token().unwrap().expose_secret(),
        "tok_abc"
    );

    // The stored token is used by the next request.
    let refreshed = auth.refresh_profile().await.unwrap();
    assert_eq!(refreshed.name, "Kim Lee");
    assert_eq!(auth.current_admin().unwrap().name, "Kim Lee");
}

#[tokio::test]
async fn test_rejected_login_is_invalid_credentials() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path(api_path("/admin/login")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})))
        .mount(&ctx.server)
        .await;

    let auth = AuthService::new(ctx.api.clone());
    let err = auth.login("kim@senji.shop", &password()).await.unwrap_err();

    assert!(matches!(err, AuthError::InvalidCredentials(_)));
    assert!(!auth.is_logged_in());
    let err = ConsoleError::from(err);
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(err.user_message(), "Invalid email or password");
}

#[tokio::test]
async fn test_login_reply_without_token_is_invalid_response() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path(api_path("/admin/login")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "admin": {"name": "Kim", "email": "kim@senji.shop"}
        })))
        .mount(&ctx.server)
        .await;

    let auth = AuthService::new(ctx.api.clone());
    let err = auth.login("kim@senji.shop", &password()).await.unwrap_err();

    assert!(matches!(err, AuthError::InvalidResponse));
    assert!(!auth.is_logged_in());
}

#[tokio::test]
async fn test_blank_credentials_never_reach_backend() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path(api_path("/admin/login")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let auth = AuthService::new(ctx.api.clone());
    let err = auth
        .login("kim@senji.shop", &SecretString::from(""))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::MissingCredentials));
}

#[tokio::test]
async fn test_logout_clears_credentials_even_when_backend_fails() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("POST"))
        .and(path(api_path("/admin/logout")))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let auth = AuthService::new(ctx.api.clone());
    assert!(auth.is_logged_in());

    let next = auth.logout().await;

    assert_eq!(next, Navigation::Login);
    assert!(!auth.is_logged_in());
    assert!(ctx.api.credentials().admin().is_none());
}

#[tokio::test]
async fn test_rejected_token_expires_session() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("GET"))
        .and(path(api_path("/admin/me")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&ctx.server)
        .await;

    let auth = AuthService::new(ctx.api.clone());
    let err = auth.refresh_profile().await.unwrap_err();

    assert!(matches!(err, AuthError::SessionExpired));
    assert!(!auth.is_logged_in());
    assert!(ConsoleError::from(err).requires_login());
}
