//! HTTP-level tests against the full router with a synthetic price provider.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tickerlens::api;
use tickerlens::config::Config;
use tickerlens::services::analysis::FeatureVector;
use tickerlens::services::{
    AnalysisService, AuthService, Classifier, ClassifierError, ClassifierVerdict, HistoryRequest,
    PriceHistoryProvider, ProviderError, SqliteStore,
};
use tickerlens::types::{Bar, Company, Role};
use tickerlens::AppState;
use tower::ServiceExt;

/// Steadily rising closes 1..=200 for any symbol except `EMPTY` and `DOWN`.
struct RampProvider;

#[async_trait]
impl PriceHistoryProvider for RampProvider {
    async fn fetch(&self, symbol: &str, _: &HistoryRequest) -> Result<Vec<Bar>, ProviderError> {
        match symbol {
            "EMPTY" => return Ok(Vec::new()),
            "DOWN" => return Err(ProviderError::Api("service down".into())),
            _ => {}
        }
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        Ok((0..200)
            .map(|i| {
                let close = 1.0 + i as f64;
                Bar {
                    date: start + chrono::Duration::days(i),
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 10_000,
                }
            })
            .collect())
    }
}

struct FixedClassifier;

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(&self, features: &FeatureVector) -> Result<ClassifierVerdict, ClassifierError> {
        assert_eq!(features.len(), 14);
        Ok(ClassifierVerdict {
            signal: "Sell".into(),
            confidence: 0.64,
        })
    }
}

struct TestApp {
    router: Router,
    store: Arc<SqliteStore>,
}

fn test_app() -> TestApp {
    build_app(None)
}

fn build_app(classifier: Option<Arc<dyn Classifier>>) -> TestApp {
    let config = Arc::new(Config::default());
    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    let auth_service = Arc::new(AuthService::new(store.clone(), config.token_ttl_minutes));
    let mut analysis =
        AnalysisService::new(Arc::new(RampProvider), Duration::from_secs(5)).with_store(store.clone());
    if let Some(classifier) = classifier {
        analysis = analysis.with_classifier(classifier);
    }
    let analysis = Arc::new(analysis);
    let state = AppState {
        config,
        store: store.clone(),
        auth_service,
        analysis,
    };
    TestApp {
        router: Router::new().merge(api::router()).with_state(state),
        store,
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn get(app: &TestApp, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let (status, _, body) = send(app, builder.body(Body::empty()).unwrap()).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

async fn post_json(app: &TestApp, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, _, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn login(app: &TestApp, username: &str) -> String {
    let credentials = json!({"username": username, "password": "hunter22"});
    let (status, _) = post_json(app, "/api/auth/register", credentials.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = post_json(app, "/api/auth/login", credentials).await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = test_app();
    app.store
        .upsert_company(&Company {
            symbol: "AAPL".into(),
            name: "Apple Inc.".into(),
        })
        .unwrap();
    let (status, body) = get(&app, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["classifier"], false);
    assert_eq!(body["companies"], 1);

    let app = build_app(Some(Arc::new(FixedClassifier)));
    let (_, body) = get(&app, "/api/health", None).await;
    assert_eq!(body["classifier"], true);
}

#[tokio::test]
async fn test_register_conflict_and_bad_login() {
    let app = test_app();
    login(&app, "alice").await;

    let (status, body) = post_json(
        &app,
        "/api/auth/register",
        json!({"username": "alice", "password": "another1"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], 409);

    let (status, _) = post_json(
        &app,
        "/api/auth/login",
        json!({"username": "alice", "password": "wrong-password"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_and_logout() {
    let app = test_app();
    let token = login(&app, "bob").await;

    let (status, body) = get(&app, "/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "bob");
    assert_eq!(body["role"], "free");

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(&app, "/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_premium_requires_role() {
    let app = test_app();
    let token = login(&app, "carol").await;

    let (status, _) = get(&app, "/api/auth/premium", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.store.set_role("carol", Role::Premium).unwrap();
    let token = {
        let (_, body) = post_json(
            &app,
            "/api/auth/login",
            json!({"username": "carol", "password": "hunter22"}),
        )
        .await;
        body["access_token"].as_str().unwrap().to_string()
    };
    let (status, _) = get(&app, "/api/auth/premium", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_analyze_requires_auth() {
    let app = test_app();
    let (status, body) = get(&app, "/api/stocks/analyze/AAPL", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn test_analyze_and_history() {
    let app = test_app();
    let token = login(&app, "dave").await;

    let (status, body) = get(&app, "/api/stocks/analyze/aapl?indicators=sma,rsi", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "AAPL");
    assert_eq!(body["latest"]["rsi"], 100.0);
    assert_eq!(body["signals"]["sma"], "Sell");
    assert_eq!(body["final_decision"]["signal"], "Sell");
    assert_eq!(body["final_decision"]["confidence"], 1.0);
    assert!(body.get("ai").is_none());

    let (status, history) = get(&app, "/api/history", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let records = history.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["symbol"], "AAPL");
    assert_eq!(records[0]["indicators"], "sma,rsi");
}

#[tokio::test]
async fn test_analyze_date_range() {
    let app = test_app();
    let token = login(&app, "erin").await;

    let (status, _) = get(
        &app,
        "/api/stocks/analyze/MSFT?start_date=2024-01-01&end_date=2024-06-30",
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(
        &app,
        "/api/stocks/analyze/MSFT?start_date=2024-01-01",
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_unknown_symbol_is_404() {
    let app = test_app();
    let token = login(&app, "frank").await;

    let (status, body) = get(&app, "/api/stocks/analyze/empty", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No data found for EMPTY");
}

#[tokio::test]
async fn test_provider_failure_is_502() {
    let app = test_app();
    let (status, _) = get(&app, "/api/stocks/DOWN", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_analysis_csv_download() {
    let app = test_app();
    let token = login(&app, "grace").await;

    let request = Request::builder()
        .uri("/api/stocks/analyze/nvda/csv")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=NVDA_analysis.csv"
    );
    let text = String::from_utf8(body).unwrap();
    assert!(text.starts_with("Field,Value\n"));
    assert!(text.contains("symbol,NVDA"));
}

#[tokio::test]
async fn test_stock_table() {
    let app = test_app();
    let (status, body) = get(&app, "/api/stocks/aapl", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    // 200 bars, SMA_20 first defined at index 19.
    assert_eq!(rows.len(), 181);
    assert!(rows[0]["SMA_20"].is_number());
    assert!(rows[0]["MACD_signal"].is_number());
}

#[tokio::test]
async fn test_plot_is_capped() {
    let app = test_app();
    let (status, body) = get(&app, "/api/plot/aapl", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "AAPL");
    let points = body["points"].as_array().unwrap();
    assert_eq!(points.len(), 100);
    assert_eq!(points[99]["close"], 200.0);
    assert!(points[0]["bollinger_upper"].is_number());
}

#[tokio::test]
async fn test_companies() {
    let app = test_app();
    app.store
        .upsert_company(&Company {
            symbol: "AAPL".into(),
            name: "Apple Inc.".into(),
        })
        .unwrap();

    let (status, body) = get(&app, "/api/companies", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = get(&app, "/api/companies/search?name=apple", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "AAPL");

    let (status, _) = get(&app, "/api/companies/search?name=zzz", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_screener_filters() {
    let app = test_app();
    for (symbol, name) in [("AAPL", "Apple Inc."), ("EMPTY", "Nothing Corp")] {
        app.store
            .upsert_company(&Company {
                symbol: symbol.into(),
                name: name.into(),
            })
            .unwrap();
    }

    let (status, body) = get(&app, "/api/screener?macd_gt=0", None).await;
    assert_eq!(status, StatusCode::OK);
    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["symbol"], "AAPL");

    let (_, body) = get(&app, "/api/screener?rsi_lt=50", None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_ai_predict_without_classifier() {
    let app = test_app();
    let token = login(&app, "heidi").await;
    let (status, body) = get(&app, "/api/ai/predict?symbol=AAPL", Some(&token)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], 503);
}

#[tokio::test]
async fn test_ai_with_classifier() {
    let app = build_app(Some(Arc::new(FixedClassifier)));
    let token = login(&app, "ivan").await;

    let (status, body) = get(&app, "/api/ai/predict?symbol=tsla", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "TSLA");
    assert_eq!(body["ai_prediction"], "Sell");
    assert_eq!(body["confidence"], 0.64);

    let (status, body) = get(&app, "/api/stocks/analyze/tsla", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ai"]["signal"], "Sell");
}
