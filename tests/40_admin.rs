mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn list_users_is_admin_only() -> Result<()> {
    let app = TestApp::new();
    let (alice, alice_token) = app.register("alice").await?;
    app.register("bob").await?;

    let anonymous = app.get("/api/users", None).await?;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let plain = app.get("/api/users", Some(&alice_token)).await?;
    assert_eq!(plain.status, StatusCode::FORBIDDEN);

    let admin = app.promote(alice).await?;
    let res = app.get("/api/users", Some(&admin)).await?;
    assert_eq!(res.status, StatusCode::OK);
    let users = res.body.as_array().expect("array");
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password").is_none()));
    Ok(())
}

#[tokio::test]
async fn set_admin_promotes_and_demotes() -> Result<()> {
    let app = TestApp::new();
    let (root, _) = app.register("root").await?;
    let (alice, _) = app.register("alice").await?;
    let admin = app.promote(root).await?;
    let uri = format!("/api/users/{}/set-admin", alice);

    let res = app.patch(&uri, Some(&admin), json!({ "isAdmin": true })).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["isAdmin"], true);

    // A fresh login carries the new role
    let login = app
        .post("/api/auth", None, json!({ "username": "alice", "password": common::PASSWORD }))
        .await?;
    let token = login.token().expect("token");
    assert!(app.state.tokens.verify(&token)?.is_admin);
    assert_eq!(app.get("/api/users", Some(&token)).await?.status, StatusCode::OK);

    let res = app.patch(&uri, Some(&admin), json!({ "isAdmin": false })).await?;
    assert_eq!(res.body["isAdmin"], false);
    Ok(())
}

#[tokio::test]
async fn set_admin_requires_boolean() -> Result<()> {
    let app = TestApp::new();
    let (root, _) = app.register("root").await?;
    let (alice, _) = app.register("alice").await?;
    let admin = app.promote(root).await?;
    let uri = format!("/api/users/{}/set-admin", alice);

    for body in [json!({}), json!({ "isAdmin": "yes" }), json!({ "isAdmin": 1 })] {
        let res = app.patch(&uri, Some(&admin), body).await?;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.error(), "isAdmin field is required and must be boolean");
    }
    Ok(())
}

#[tokio::test]
async fn set_admin_checks_role_before_id() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = app.register("alice").await?;

    let res = app.patch("/api/users/not-an-id/set-admin", Some(&token), json!({ "isAdmin": true })).await?;

    assert_eq!(res.status, StatusCode::FORBIDDEN);
    Ok(())
}
