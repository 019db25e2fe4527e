//! Integration tests for registration and sign-in.

mod helpers;

use nexo_core::config::AppConfig;
use nexo_core::error::ErrorKind;
use nexo_service::{RegisterRequest, SessionContext};

fn request(email: &str, admin_password: Option<&str>) -> RegisterRequest {
    RegisterRequest {
        username: "carol".into(),
        email: email.into(),
        password: "password123".into(),
        confirm_password: "password123".into(),
        admin_password: admin_password.map(str::to_string),
    }
}

#[tokio::test]
async fn test_register_login_whoami() {
    let app = helpers::TestApp::new();
    let ctx = app.create_test_user("carol", "carol@example.com").await;

    let me = app.services.auth.current_user(&ctx).await.unwrap();
    assert_eq!(me.username, "carol");
    assert_eq!(me.email, "carol@example.com");
    assert_eq!(app.backend.rows("users").len(), 1);
}

#[tokio::test]
async fn test_duplicate_registration_is_conflict() {
    let app = helpers::TestApp::new();
    app.register("carol", "carol@example.com").await;

    let err = app
        .services
        .auth
        .register(request("carol@example.com", None))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.message, "This email is already registered");
}

#[tokio::test]
async fn test_admin_password_gates_registration() {
    let mut config = AppConfig::default();
    config.auth.admin_password = Some("s3cret".into());
    let app = helpers::TestApp::with_config(config);

    let err = app
        .services
        .auth
        .register(request("carol@example.com", Some("wrong")))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert!(app.backend.rows("users").is_empty());

    app.services
        .auth
        .register(request("carol@example.com", Some("s3cret")))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_logout_invalidates_token() {
    let app = helpers::TestApp::new();
    app.register("carol", "carol@example.com").await;
    let session = app
        .services
        .auth
        .login("carol@example.com", "password123")
        .await
        .unwrap();

    app.services.auth.logout(&session).await.unwrap();
    let err = app
        .services
        .folders
        .list(&SessionContext::from_session(&session), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
}

#[tokio::test]
async fn test_refresh_issues_new_tokens() {
    let app = helpers::TestApp::new();
    app.register("carol", "carol@example.com").await;
    let session = app
        .services
        .auth
        .login("carol@example.com", "password123")
        .await
        .unwrap();

    let refreshed = app.services.auth.refresh(&session).await.unwrap();
    assert_ne!(refreshed.access_token, session.access_token);
    assert_eq!(refreshed.user.id, session.user.id);
}
