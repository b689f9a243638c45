mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn lists_seeded_divisions() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;

    let (status, body) = server.get("/divisions", &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let names: Vec<&str> = body["data"]["divisions"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["name"].as_str())
        .collect();
    assert_eq!(names.len(), 6);
    assert!(names.contains(&"Backend"));
    assert_eq!(body["pagination"]["total"], 6);
    assert_eq!(body["pagination"]["last_page"], 1);

    Ok(())
}

#[tokio::test]
async fn name_filter_is_case_insensitive_substring() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;

    let body: Value = server
        .http
        .get(server.url("/divisions"))
        .query(&[("name", "end")])
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;

    let mut names: Vec<&str> = body["data"]["divisions"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["name"].as_str())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Backend", "Frontend"]);

    let (_, body) = server.get("/divisions?name=nothing-matches", &token).await?;
    assert_eq!(body["data"]["divisions"], serde_json::json!([]));
    assert_eq!(body["pagination"]["total"], 0);
    assert_eq!(body["pagination"]["from"], Value::Null);

    Ok(())
}
