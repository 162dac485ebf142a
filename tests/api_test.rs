mod common;

use anyhow::Result;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use common::test_service;
use serde_json::{Value, json};
use tower::ServiceExt;

use savings_tracker::routes;

fn app() -> Router {
    let (service, _clock) = test_service();
    routes::router(service)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))?,
        None => request.body(Body::empty())?,
    };

    read_response(app, request).await
}

/// POST a body exactly as given, for payloads `json!` cannot express.
async fn post_raw(app: &Router, uri: &str, body: &'static str) -> Result<(StatusCode, Value)> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))?;
    read_response(app, request).await
}

async fn read_response(app: &Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, json))
}

#[tokio::test]
async fn test_health_reports_memory_backend() -> Result<()> {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
    Ok(())
}

#[tokio::test]
async fn test_deposit_and_withdraw_over_http() -> Result<()> {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/deposit/joint",
        Some(json!({ "amount": 3000, "description": "gift" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"].as_f64(), Some(3000.0));
    assert_eq!(body["goalProgress"].as_f64(), Some(30.0));
    assert_eq!(body["transaction"]["type"], "deposit");
    assert_eq!(body["transaction"]["accountId"], "joint");
    assert_eq!(body["transaction"]["description"], "gift");
    assert!(body["transaction"]["date"].is_string());

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/withdraw/joint",
        Some(json!({ "amount": 1000.5 })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"].as_f64(), Some(1999.5));
    assert_eq!(body["transaction"]["type"], "withdraw");
    assert_eq!(body["transaction"]["description"], "");

    let (status, body) = send(&app, "GET", "/api/v1/transactions/joint", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transactions"].as_array().map(Vec::len), Some(2));

    Ok(())
}

#[tokio::test]
async fn test_insufficient_funds_maps_to_422() -> Result<()> {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/withdraw/first-person",
        Some(json!({ "amount": 10 })),
    )
    .await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "insufficient_funds");
    Ok(())
}

#[tokio::test]
async fn test_missing_amount_maps_to_400() -> Result<()> {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/v1/deposit/joint", Some(json!({}))).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_amount");
    Ok(())
}

#[tokio::test]
async fn test_unreadable_amount_maps_to_400() -> Result<()> {
    let app = app();

    for body in [
        r#"{"amount":"abc"}"#,
        r#"{"amount":1e30}"#,
        r#"{"amount":[100]}"#,
        r#"{"amount":"#,
    ] {
        let (status, response) = post_raw(&app, "/api/v1/deposit/joint", body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "deposit body {body}");
        assert_eq!(response["error"]["code"], "invalid_amount", "deposit body {body}");

        let (status, response) = post_raw(&app, "/api/v1/withdraw/joint", body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "withdraw body {body}");
        assert_eq!(response["error"]["code"], "invalid_amount", "withdraw body {body}");
    }

    let (_, body) = send(&app, "GET", "/api/v1/transactions/joint", None).await?;
    assert_eq!(body["transactions"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn test_unreadable_goal_maps_to_400() -> Result<()> {
    let app = app();

    let (status, body) = post_raw(&app, "/api/v1/goal/second-person", r#"{"monthlyGoal":"lots"}"#).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_goal");
    assert!(body["error"]["message"].is_string());

    let (_, body) = send(&app, "GET", "/api/v1/balance/second-person", None).await?;
    assert_eq!(body["monthlyGoal"].as_f64(), Some(5000.0));
    Ok(())
}

#[tokio::test]
async fn test_decimal_amounts_do_not_drift() -> Result<()> {
    let app = app();

    for _ in 0..3 {
        let (status, _) = post_raw(&app, "/api/v1/deposit/first-person", r#"{"amount":0.1}"#).await?;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = post_raw(&app, "/api/v1/withdraw/first-person", r#"{"amount":0.3}"#).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"].as_f64(), Some(0.0));
    Ok(())
}

#[tokio::test]
async fn test_negative_goal_maps_to_400() -> Result<()> {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/goal/second-person",
        Some(json!({ "monthlyGoal": -5 })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_goal");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/goal/second-person",
        Some(json!({ "monthlyGoal": 8000 })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["monthlyGoal"].as_f64(), Some(8000.0));
    Ok(())
}

#[tokio::test]
async fn test_unknown_account_maps_to_400() -> Result<()> {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/v1/balance/everyone", None).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "unknown_account");
    Ok(())
}

#[tokio::test]
async fn test_stats_before_creation_maps_to_404() -> Result<()> {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/v1/stats/joint", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "account_not_found");

    let (status, body) = send(&app, "GET", "/api/v1/balance/joint", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["monthlyGoal"].as_f64(), Some(10000.0));

    let (status, body) = send(&app, "GET", "/api/v1/stats/joint", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["netSavings"].as_f64(), Some(0.0));
    Ok(())
}

#[tokio::test]
async fn test_summary_lists_three_accounts() -> Result<()> {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/v1/summary", None).await?;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["accounts"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|a| a["accountId"].as_str())
        .collect();
    assert_eq!(ids, ["first-person", "second-person", "joint"]);
    Ok(())
}
