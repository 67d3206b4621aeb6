mod common;

use anyhow::Result;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;

/// Checks the ownership guard across the remaining entity types and the
/// derived pay computation.

#[tokio::test]
async fn availability_protected_from_non_owner() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let owner = common::register_employee(&client, &server.base_url, "avail-owner").await?;
    let other = common::register_employee(&client, &server.base_url, "avail-other").await?;

    let res = client
        .post(format!("{}/api/availabilities", server.base_url))
        .bearer_auth(&owner.token)
        .json(&json!({
            "day": "monday",
            "start_availability": "09:00:00",
            "end_availability": "17:00:00"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    let id = body["data"]["id"].as_i64().expect("availability id");
    assert_eq!(body["data"]["employee_id"], owner.id.as_str());

    let res = client
        .put(format!("{}/api/availabilities/{}", server.base_url, id))
        .bearer_auth(&other.token)
        .json(&json!({
            "day": "tuesday",
            "start_availability": "10:00:00",
            "end_availability": "16:00:00"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(format!("{}/api/availabilities/{}", server.base_url, id))
        .bearer_auth(&other.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Still intact and unchanged
    let res = client
        .get(format!("{}/api/availabilities/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["day"], "monday");

    Ok(())
}

#[tokio::test]
async fn availability_rejects_unknown_day() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let user = common::register_employee(&client, &server.base_url, "avail-day").await?;

    let res = client
        .post(format!("{}/api/availabilities", server.base_url))
        .bearer_auth(&user.token)
        .json(&json!({
            "day": "funday",
            "start_availability": "09:00:00",
            "end_availability": "17:00:00"
        }))
        .send()
        .await?;
    // Enum membership is checked at deserialization
    assert!(res.status().is_client_error());

    Ok(())
}

#[tokio::test]
async fn pay_stub_total_is_derived_exactly() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let user = common::register_employee(&client, &server.base_url, "paystub").await?;

    let res = client
        .post(format!("{}/api/pay_stubs", server.base_url))
        .bearer_auth(&user.token)
        .json(&json!({
            "hours_worked": "40",
            "hourly_rate": "22.50",
            "pay_date": "2024-01-31"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;

    let total = Decimal::from_str(body["data"]["total_pay"].as_str().expect("total_pay"))?;
    assert_eq!(total, Decimal::new(90000, 2)); // exactly 900.00

    Ok(())
}

#[tokio::test]
async fn pay_stub_requires_hours() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let user = common::register_employee(&client, &server.base_url, "paystub-val").await?;

    let before = record_count(&client, &server.base_url, "pay_stubs").await?;

    let res = client
        .post(format!("{}/api/pay_stubs", server.base_url))
        .bearer_auth(&user.token)
        .json(&json!({ "hourly_rate": "22.50", "pay_date": "2024-01-31" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["field_errors"].get("hours_worked").is_some());

    // Nothing was persisted
    let after = record_count(&client, &server.base_url, "pay_stubs").await?;
    assert_eq!(before, after);

    Ok(())
}

#[tokio::test]
async fn punch_protected_from_non_owner() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let owner = common::register_employee(&client, &server.base_url, "punch-owner").await?;
    let other = common::register_employee(&client, &server.base_url, "punch-other").await?;

    let res = client
        .post(format!("{}/api/punches", server.base_url))
        .bearer_auth(&owner.token)
        .json(&json!({ "punch_in_time": "2024-01-01T09:00:00Z" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    let id = body["data"]["id"].as_i64().expect("punch id");
    assert!(body["data"]["punch_out_time"].is_null());

    let res = client
        .delete(format!("{}/api/punches/{}", server.base_url, id))
        .bearer_auth(&other.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Owner closes the punch
    let res = client
        .put(format!("{}/api/punches/{}", server.base_url, id))
        .bearer_auth(&owner.token)
        .json(&json!({
            "punch_in_time": "2024-01-01T09:00:00Z",
            "punch_out_time": "2024-01-01T17:00:00Z"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["punch_out_time"], "2024-01-01T17:00:00Z");

    Ok(())
}

async fn record_count(client: &reqwest::Client, base_url: &str, entity: &str) -> Result<usize> {
    let res = client.get(format!("{}/api/{}", base_url, entity)).send().await?;
    let body: Value = res.json().await?;
    Ok(body["data"].as_array().map(|a| a.len()).unwrap_or(0))
}
