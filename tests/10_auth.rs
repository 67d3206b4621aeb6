mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/health", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn register_login_whoami_flow() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let employee = common::register_employee(&client, &server.base_url, "flow").await?;

    // Fresh login with the same credentials
    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "email": employee.email, "password": "integration-pass-123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    // Session cookie comes along for browser clients
    let cookies: Vec<_> = res
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .cloned()
        .collect();
    let body: Value = res.json().await?;
    let token = body["data"]["token"].as_str().expect("login token");

    assert!(cookies.iter().any(|c| c.to_str().is_ok_and(|s| s.starts_with("session="))));
    assert!(cookies.iter().any(|c| c.to_str().is_ok_and(|s| s.starts_with("csrf="))));

    // whoami resolves the same account, without leaking the hash
    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["email"], employee.email.as_str());
    assert!(body["data"].get("password_hash").is_none());

    Ok(())
}

#[tokio::test]
async fn duplicate_registration_conflicts() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let employee = common::register_employee(&client, &server.base_url, "dup").await?;

    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({ "email": employee.email, "password": "another-pass-456" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn wrong_password_rejected_and_counted() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let employee = common::register_employee(&client, &server.base_url, "lockout").await?;

    for _ in 0..2 {
        let res = client
            .post(format!("{}/auth/login", server.base_url))
            .json(&json!({ "email": employee.email, "password": "not-the-password" }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    // Correct password still works below the lockout threshold and resets it
    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "email": employee.email, "password": "integration-pass-123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn unauthenticated_whoami_rejected() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/api/auth/whoami", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn unconfigured_oauth_provider_is_absent() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none()).build()?;

    // No GOOGLE_CLIENT_ID/SECRET in the test environment, so the provider
    // is disabled rather than half-configured
    let res = client
        .get(format!("{}/auth/oauth/google", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
