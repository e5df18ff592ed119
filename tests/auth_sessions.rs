mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{TestApp, unique};

#[tokio::test]
async fn test_session_lifecycle() {
    let Some(app) = TestApp::spawn().await else { return };
    let diner = app.register_diner().await;

    let (status, me) = app.request(Method::GET, "/api/user/me", Some(&diner.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], diner.email.as_str());
    assert_eq!(me["roles"], json!([{ "role": "diner" }]));

    let (status, body) = app.request(Method::DELETE, "/api/auth", Some(&diner.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "logout successful");

    let (status, body) = app.request(Method::GET, "/api/user/me", Some(&diner.token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "unauthorized");

    let (status, _) = app.request(Method::DELETE, "/api/auth", Some(&diner.token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_closes_only_presented_session() {
    let Some(app) = TestApp::spawn().await else { return };
    let diner = app.register_diner().await;
    let second = app.login(&diner.email, &diner.password).await;

    let (status, _) = app.request(Method::DELETE, "/api/auth", Some(&diner.token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, me) = app.request(Method::GET, "/api/user/me", Some(&second), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], diner.id);
    assert!(app.state.services.auth.is_logged_in(&second).await.unwrap());
    assert!(!app.state.services.auth.is_logged_in(&diner.token).await.unwrap());
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let Some(app) = TestApp::spawn().await else { return };
    let diner = app.register_diner().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth",
            None,
            Some(json!({ "name": "copy", "email": diner.email, "password": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_ENTRY");
}

#[tokio::test]
async fn test_bad_credentials_are_indistinguishable() {
    let Some(app) = TestApp::spawn().await else { return };
    let diner = app.register_diner().await;

    let (wrong_password, body_a) = app
        .request(
            Method::PUT,
            "/api/auth",
            None,
            Some(json!({ "email": diner.email, "password": "nope" })),
        )
        .await;
    let (unknown_email, body_b) = app
        .request(
            Method::PUT,
            "/api/auth",
            None,
            Some(json!({ "email": format!("{}@jwt.test", unique("ghost")), "password": "nope" })),
        )
        .await;
    assert_eq!(wrong_password, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email, StatusCode::UNAUTHORIZED);
    assert_eq!(body_a["message"], body_b["message"]);

    let snapshot = app.state.metrics.snapshot();
    assert_eq!(snapshot.auth_failure, 2);
    assert_eq!(snapshot.auth_success, 1);
}

#[tokio::test]
async fn test_update_user_self_and_forbidden() {
    let Some(app) = TestApp::spawn().await else { return };
    let diner = app.register_diner().await;
    let other = app.register_diner().await;

    let new_email = format!("{}@jwt.test", unique("renamed"));
    let (status, user) = app
        .request(
            Method::PUT,
            &format!("/api/auth/{}", diner.id),
            Some(&diner.token),
            Some(json!({ "email": new_email, "password": "changed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["email"], new_email.as_str());
    assert_eq!(user["name"], diner.name.as_str());
    assert!(user.get("password").is_none());

    app.login(&new_email, "changed").await;

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/auth/{}", other.id),
            Some(&diner.token),
            Some(json!({ "name": "hijack" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_updates_and_deletes_any_user() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.admin().await;
    let diner = app.register_diner().await;

    let (status, user) = app
        .request(
            Method::PUT,
            &format!("/api/auth/{}", diner.id),
            Some(&admin.token),
            Some(json!({ "name": "renamed by admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["name"], "renamed by admin");

    let (status, body) = app
        .request(Method::DELETE, &format!("/api/user/{}", diner.id), Some(&admin.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "user deleted");

    let (status, _) = app.request(Method::GET, "/api/user/me", Some(&diner.token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/user/{}", diner.id), Some(&admin.token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_diner_cannot_delete_someone_else() {
    let Some(app) = TestApp::spawn().await else { return };
    let diner = app.register_diner().await;
    let other = app.register_diner().await;

    let (status, body) = app
        .request(Method::DELETE, &format!("/api/user/{}", other.id), Some(&diner.token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_deleting_user_closes_all_sessions() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.admin().await;
    let diner = app.register_diner().await;
    let second = app.login(&diner.email, &diner.password).await;
    assert_eq!(app.state.metrics.snapshot().active_sessions, 3);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/user/{}", diner.id), Some(&admin.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(app.state.metrics.snapshot().active_sessions, 1);
    assert!(!app.state.services.auth.is_logged_in(&second).await.unwrap());
    assert!(!app.state.services.auth.is_logged_in(&diner.token).await.unwrap());
}
