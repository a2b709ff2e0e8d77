mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{TestApp, PASSWORD};

#[tokio::test]
async fn register_returns_user_without_password() -> Result<()> {
    let app = TestApp::new();

    let res = app
        .post(
            "/api/users",
            None,
            json!({ "username": "  alice ", "email": "alice@example.com", "password": PASSWORD, "isAdmin": true }),
        )
        .await?;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.token().is_some());
    assert_eq!(res.body["username"], "alice");
    assert_eq!(res.body["isAdmin"], false);
    assert!(res.body.get("password").is_none());
    assert!(res.body.get("createdAt").is_some());
    Ok(())
}

#[tokio::test]
async fn register_rejects_taken_email_then_username() -> Result<()> {
    let app = TestApp::new();
    app.register("alice").await?;

    let same_email = app
        .post(
            "/api/users",
            None,
            json!({ "username": "alice2", "email": "alice@example.com", "password": PASSWORD }),
        )
        .await?;
    assert_eq!(same_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(same_email.error(), "User with given email already exists");

    let same_username = app
        .post(
            "/api/users",
            None,
            json!({ "username": "alice", "email": "other@example.com", "password": PASSWORD }),
        )
        .await?;
    assert_eq!(same_username.status, StatusCode::BAD_REQUEST);
    assert_eq!(same_username.error(), "User with given username already exists");
    Ok(())
}

#[tokio::test]
async fn register_validates_body() -> Result<()> {
    let app = TestApp::new();

    let short_password = app
        .post("/api/users", None, json!({ "username": "alice", "email": "alice@example.com", "password": "short" }))
        .await?;
    assert_eq!(short_password.status, StatusCode::BAD_REQUEST);
    assert!(short_password.error().contains("password"));

    let bad_email = app
        .post("/api/users", None, json!({ "username": "alice", "email": "not-an-email", "password": PASSWORD }))
        .await?;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert!(bad_email.error().contains("email"));
    Ok(())
}

#[tokio::test]
async fn get_user_is_self_or_admin() -> Result<()> {
    let app = TestApp::new();
    let (alice, alice_token) = app.register("alice").await?;
    let (bob, bob_token) = app.register("bob").await?;
    let admin_token = app.promote(bob).await?;

    let own = app.get(&format!("/api/users/{}", alice), Some(&alice_token)).await?;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.body["_id"], json!(alice));

    let other = app.get(&format!("/api/users/{}", bob), Some(&alice_token)).await?;
    assert_eq!(other.status, StatusCode::FORBIDDEN);
    assert_eq!(other.error(), "Access denied.");

    // The old token still says bob is not an admin
    let stale = app.get(&format!("/api/users/{}", alice), Some(&bob_token)).await?;
    assert_eq!(stale.status, StatusCode::FORBIDDEN);

    let as_admin = app.get(&format!("/api/users/{}", alice), Some(&admin_token)).await?;
    assert_eq!(as_admin.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn get_user_checks_id_before_token() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = app.register("alice").await?;

    let bad_id_no_token = app.get("/api/users/1", None).await?;
    assert_eq!(bad_id_no_token.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_id_no_token.error(), "ERROR 400, ID is invalid");

    let unknown = app.get(&format!("/api/users/{}", Uuid::new_v4()), Some(&token)).await?;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.error(), "ERROR 404, Resource with given ID is NOT found");
    Ok(())
}

#[tokio::test]
async fn delete_checks_token_before_id() -> Result<()> {
    let app = TestApp::new();

    let res = app.delete("/api/users/1", None).await?;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn update_self_changes_only_given_fields() -> Result<()> {
    let app = TestApp::new();
    let (alice, token) = app.register("alice").await?;
    let uri = format!("/api/users/{}", alice);

    let res = app.patch(&uri, Some(&token), json!({ "email": "new@example.com" })).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["email"], "new@example.com");
    assert_eq!(res.body["username"], "alice");

    let empty = app.patch(&uri, Some(&token), json!({})).await?;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let unknown_only = app.patch(&uri, Some(&token), json!({ "isAdmin": true })).await?;
    assert_eq!(unknown_only.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn update_password_is_rehashed() -> Result<()> {
    let app = TestApp::new();
    let (alice, token) = app.register("alice").await?;

    let res = app
        .patch(&format!("/api/users/{}", alice), Some(&token), json!({ "password": "brand-new-pass" }))
        .await?;
    assert_eq!(res.status, StatusCode::OK);

    let old = app.post("/api/auth", None, json!({ "username": "alice", "password": PASSWORD })).await?;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);

    let new = app
        .post("/api/auth", None, json!({ "username": "alice", "password": "brand-new-pass" }))
        .await?;
    assert_eq!(new.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn update_uniqueness_excludes_self() -> Result<()> {
    let app = TestApp::new();
    let (alice, token) = app.register("alice").await?;
    app.register("bob").await?;
    let uri = format!("/api/users/{}", alice);

    let taken = app.patch(&uri, Some(&token), json!({ "email": "bob@example.com" })).await?;
    assert_eq!(taken.status, StatusCode::BAD_REQUEST);
    assert_eq!(taken.error(), "ERROR 400, user with given email already exists");

    let taken = app.patch(&uri, Some(&token), json!({ "username": "bob" })).await?;
    assert_eq!(taken.status, StatusCode::BAD_REQUEST);
    assert_eq!(taken.error(), "ERROR 400, user with given username already exists");

    let own = app
        .patch(&uri, Some(&token), json!({ "username": "alice", "email": "alice@example.com" }))
        .await?;
    assert_eq!(own.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn admin_cannot_update_someone_else() -> Result<()> {
    let app = TestApp::new();
    let (alice, _) = app.register("alice").await?;
    let (bob, _) = app.register("bob").await?;
    let admin_token = app.promote(bob).await?;

    let res = app
        .patch(&format!("/api/users/{}", alice), Some(&admin_token), json!({ "username": "mallory" }))
        .await?;

    assert_eq!(res.status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn update_validates_body_before_ownership() -> Result<()> {
    let app = TestApp::new();
    let (alice, _) = app.register("alice").await?;
    let (_, bob_token) = app.register("bob").await?;

    let res = app
        .patch(&format!("/api/users/{}", alice), Some(&bob_token), json!({ "username": "x" }))
        .await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn delete_self_or_by_admin() -> Result<()> {
    let app = TestApp::new();
    let (alice, alice_token) = app.register("alice").await?;
    let (bob, bob_token) = app.register("bob").await?;
    let (carol, _) = app.register("carol").await?;

    let denied = app.delete(&format!("/api/users/{}", bob), Some(&alice_token)).await?;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let own = app.delete(&format!("/api/users/{}", alice), Some(&alice_token)).await?;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.body["deleted"]["_id"], json!(alice));
    assert!(app.state.store.find_user(alice).await?.is_none());

    let admin_token = app.promote(bob).await?;
    let by_admin = app.delete(&format!("/api/users/{}", carol), Some(&admin_token)).await?;
    assert_eq!(by_admin.status, StatusCode::OK);

    let gone = app.delete(&format!("/api/users/{}", carol), Some(&bob_token)).await?;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    Ok(())
}
