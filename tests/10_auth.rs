mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn login_returns_token_and_admin() -> Result<()> {
    let server = common::spawn_server().await?;

    let (status, body) = server.try_login("admin", "pastibisa").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["data"]["token"].as_str().map(str::len), Some(40));
    assert_eq!(body["data"]["admin"]["username"], "admin");
    assert!(body["data"]["admin"].get("password_hash").is_none());

    Ok(())
}

#[tokio::test]
async fn invalid_credentials_issue_no_token() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;

    for (username, password) in [("admin", "wrong"), ("nobody", "pastibisa")] {
        let (status, body) = server.try_login(username, password).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Invalid username or password");
        assert!(body.get("data").is_none());
    }

    // a failed attempt must not rotate the existing session
    let (status, _) = server.get("/divisions", &token).await?;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn missing_login_fields_are_validation_errors() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .http
        .post(server.url("/login"))
        .json(&json!({ "username": "  " }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await?;
    assert!(body["errors"]["username"].is_array());
    assert!(body["errors"]["password"].is_array());

    Ok(())
}

#[tokio::test]
async fn only_the_latest_token_is_active() -> Result<()> {
    let server = common::spawn_server().await?;

    let first = server.login().await?;
    let second = server.login().await?;
    assert_ne!(first, second);

    let (status, body) = server.get("/employees", &first).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthenticated. Please log in first.");

    let (status, _) = server.get("/employees", &second).await?;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn logout_revokes_the_token() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;

    let res = server
        .http
        .post(server.url("/logout"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["message"], "Logout successful");

    let (status, _) = server.get("/divisions", &token).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let res = server
        .http
        .post(server.url("/logout"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn profile_update_replaces_fields() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;

    let res = server
        .http
        .put(server.url("/profile"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Admin Baru", "phone": "0899", "email": "baru@example.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["message"], "Profile updated successfully");
    assert_eq!(body["data"]["user"]["name"], "Admin Baru");
    assert_eq!(body["data"]["user"]["email"], "baru@example.com");
    assert_eq!(body["data"]["user"]["username"], "admin");

    let res = server
        .http
        .put(server.url("/profile"))
        .bearer_auth(&token)
        .json(&json!({ "name": "", "phone": "0899", "email": "not-an-email" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await?;
    assert!(body["errors"]["name"].is_array());
    assert!(body["errors"]["email"].is_array());

    Ok(())
}

#[tokio::test]
async fn get_on_login_is_a_json_405() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.http.get(server.url("/login")).send().await?;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "The method is not supported for this route.");

    Ok(())
}
