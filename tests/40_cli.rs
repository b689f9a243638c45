mod common;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::StatusCode;

use staffdir_api::cli::client::ClientError;
use staffdir_api::cli::commands::{auth, employee};
use staffdir_api::cli::config::{ConfigStore, ServerConfig};
use staffdir_api::cli::{CliContext, OutputFormat};

fn context_for(server: &common::TestServer, dir: &std::path::Path) -> Result<CliContext> {
    let store = ConfigStore::new(dir);
    store.save_server_config(&ServerConfig {
        url: server.base_url.clone(),
        updated_at: Utc::now(),
    })?;
    CliContext::load(store, OutputFormat::Json)
}

#[tokio::test]
async fn login_persists_a_session_the_next_run_can_use() -> Result<()> {
    let server = common::spawn_server().await?;
    let dir = tempfile::tempdir()?;
    let ctx = context_for(&server, dir.path())?;
    assert!(ctx.session.is_none());

    let session = auth::login(&ctx, "admin", "pastibisa").await?;
    assert_eq!(session.admin.username, "admin");
    assert_eq!(session.server, server.base_url);

    let ctx = CliContext::load(ConfigStore::new(dir.path()), OutputFormat::Json)?;
    assert_eq!(ctx.session.as_ref(), Some(&session));

    let body = ctx.session_client()?.get("/employees", &[]).await?;
    assert_eq!(body["pagination"]["total"], 12);

    // logging in again while a session exists goes through as a guest
    let again = auth::login(&ctx, "admin", "pastibisa").await?;
    assert_ne!(again.token, session.token);

    Ok(())
}

#[tokio::test]
async fn rejected_token_clears_the_stored_session() -> Result<()> {
    let server = common::spawn_server().await?;
    let dir = tempfile::tempdir()?;
    let ctx = context_for(&server, dir.path())?;
    auth::login(&ctx, "admin", "pastibisa").await?;
    let ctx = CliContext::load(ConfigStore::new(dir.path()), OutputFormat::Json)?;

    // another login elsewhere revokes the CLI's token
    server.login().await?;

    let err = ctx
        .session_client()?
        .get("/divisions", &[])
        .await
        .expect_err("revoked token must be rejected");
    assert!(matches!(err, ClientError::Unauthenticated { .. }), "{err:?}");
    assert!(ctx.config.load_session()?.is_none());

    Ok(())
}

#[tokio::test]
async fn wrong_password_leaves_no_session() -> Result<()> {
    let server = common::spawn_server().await?;
    let dir = tempfile::tempdir()?;
    let ctx = context_for(&server, dir.path())?;

    let err = auth::login(&ctx, "admin", "nope").await.unwrap_err();
    match err.downcast_ref::<ClientError>() {
        Some(ClientError::Api { status, message, .. }) => {
            assert_eq!(*status, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "Invalid username or password");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(ctx.config.load_session()?.is_none());

    Ok(())
}

#[tokio::test]
async fn employee_commands_create_and_update_through_multipart() -> Result<()> {
    let server = common::spawn_server().await?;
    let dir = tempfile::tempdir()?;
    let ctx = context_for(&server, dir.path())?;
    auth::login(&ctx, "admin", "pastibisa").await?;
    let ctx = CliContext::load(ConfigStore::new(dir.path()), OutputFormat::Json)?;

    let token = ctx.session.as_ref().context("session")?.token.clone();
    let qa = server.division_id(&token, "QA").await?;

    let photo = dir.path().join("photo.png");
    std::fs::write(&photo, common::png_bytes())?;

    employee::handle(
        employee::EmployeeCommands::Create {
            name: "Rina Klien".into(),
            phone: "0817".into(),
            division: qa,
            position: "Support".into(),
            image: Some(photo),
        },
        &ctx,
    )
    .await?;

    let body = ctx
        .session_client()?
        .get("/employees", &[("name", "Rina Klien".to_string())])
        .await?;
    let created = &body["data"]["employees"][0];
    assert_eq!(created["position"], "Support");
    assert!(created["image"]
        .as_str()
        .is_some_and(|s| s.starts_with("data:image/png;base64,")));
    let id = created["id"].as_str().context("id")?.to_string();

    employee::handle(
        employee::EmployeeCommands::Update {
            id: id.clone(),
            name: None,
            phone: None,
            division: None,
            position: Some("Support Lead".into()),
            image: None,
        },
        &ctx,
    )
    .await?;

    let body = ctx
        .session_client()?
        .get("/employees", &[("name", "Rina Klien".to_string())])
        .await?;
    assert_eq!(body["data"]["employees"][0]["position"], "Support Lead");
    assert_eq!(body["data"]["employees"][0]["phone"], "0817");

    employee::handle(employee::EmployeeCommands::Delete { id: id.clone() }, &ctx).await?;
    let err = employee::handle(employee::EmployeeCommands::Delete { id }, &ctx)
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ClientError>(),
        Some(ClientError::Api { status, .. }) if *status == StatusCode::NOT_FOUND
    ));

    Ok(())
}
