use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use garden::api::{self, AppState};
use garden::{GardenConfig, Rng};

fn app() -> Router {
    api::router(Arc::new(AppState::new(GardenConfig::default(), Rng::new(12))))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn entry(id: &str) -> Value {
    json!({
        "id": id,
        "date": "2024-04-12",
        "title": "Evening",
        "content": "Read by the window.",
        "createdAt": "2024-04-12T20:00:00Z"
    })
}

#[tokio::test]
async fn health_check() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn journal_entry_lifecycle() {
    let app = app();

    let (status, body) = call(&app, Method::GET, "/api/journal/entries", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = call(&app, Method::POST, "/api/journal/entries", Some(entry("j1"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "j1");

    let (status, body) = call(&app, Method::GET, "/api/journal/entries/j1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["createdAt"], "2024-04-12T20:00:00Z");

    let (status, body) = call(&app, Method::GET, "/api/journal/entries/j2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn invalid_journal_entry_is_400() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/journal/entries",
        Some(json!({"id": "j1", "date": "2024-01-01", "content": "no title"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("title"));
}

#[tokio::test]
async fn client_placed_flower_roundtrip() {
    let app = app();
    let flower = json!({
        "id": "f1",
        "journalId": "j1",
        "answers": ["A", "B", "C", "D", "A", "B", "C", "D", "A", "B"],
        "position": [3.0, 0.0, -4.0],
        "journalDate": "2024-04-12",
        "journalTitle": "Evening",
        "created": "2024-04-12T20:05:00Z",
        "stemHeight": 1.1
    });
    let (status, _) = call(&app, Method::POST, "/api/flowers", Some(flower.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(&app, Method::GET, "/api/flowers/f1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, flower);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/flowers",
        Some(json!({"id": "f2", "journalId": "j1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn server_side_planting_spreads_flowers() {
    let app = app();
    call(&app, Method::POST, "/api/journal/entries", Some(entry("j1"))).await;
    let answers = vec!["C"; 10];

    for _ in 0..8 {
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/flowers/plant",
            Some(json!({"journalId": "j1", "answers": answers.clone()})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["fallback"], false);
        assert_eq!(body["flower"]["journalTitle"], "Evening");
    }

    let (_, body) = call(&app, Method::GET, "/api/flowers", None).await;
    let positions: Vec<(f64, f64)> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| {
            let p = &f["position"];
            (p[0].as_f64().unwrap(), p[2].as_f64().unwrap())
        })
        .collect();
    assert_eq!(positions.len(), 8);
    for (i, a) in positions.iter().enumerate() {
        assert!(a.0 * a.0 + a.1 * a.1 <= 100.0 + 1e-9);
        for b in &positions[i + 1..] {
            let d2 = (a.0 - b.0).powi(2) + (a.1 - b.1).powi(2);
            assert!(d2 >= 4.0);
        }
    }
}

#[tokio::test]
async fn planting_without_journal_is_400() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/flowers/plant",
        Some(json!({"journalId": "ghost", "answers": ["A"]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn place_endpoint_reports_fallback() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/place",
        Some(json!({
            "gardenRadius": 1.0,
            "minSeparation": 5.0,
            "existing": [{"x": 0.0, "z": 0.0}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fallback"], true);
    let (x, z) = (
        body["position"]["x"].as_f64().unwrap(),
        body["position"]["z"].as_f64().unwrap(),
    );
    assert!(((x * x + z * z).sqrt() - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn scatter_and_wallet_flow() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/scatter?seed=3", None).await;
    assert_eq!(status, StatusCode::OK);
    let coins = body["coins"].as_array().unwrap();
    assert_eq!(coins.len(), 20);
    let coin_id = coins[0]["id"].as_str().unwrap().to_string();

    let snow = json!({"category": "ground", "variant": "snow"});
    let (status, _) = call(&app, Method::POST, "/api/wallet/unlock", Some(snow.clone())).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/wallet/collect",
        Some(json!({"coinId": coin_id})),
    )
    .await;
    assert_eq!(body["changed"], true);
    assert_eq!(body["wallet"]["coins"], 1);

    let (status, body) = call(&app, Method::POST, "/api/wallet/unlock", Some(snow.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["coins"], 0);

    let (_, body) = call(&app, Method::POST, "/api/wallet/select", Some(snow)).await;
    assert_eq!(body["changed"], true);
    assert_eq!(body["wallet"]["environment"]["ground"], "snow");
}

#[tokio::test]
async fn questions_are_served() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/questions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 10);
    assert_eq!(body[0]["options"][1], "Calm and peaceful");
}

#[tokio::test]
async fn place_rejects_inset_outside_the_bed() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/place",
        Some(json!({
            "gardenRadius": 1.0,
            "minSeparation": 5.0,
            "fallbackInset": -5.0,
            "existing": [{"x": 0.0, "z": 0.0}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("fallbackInset"));

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/place",
        Some(json!({"gardenRadius": 10.0, "innerRadius": 12.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn request_sizes_are_bounded() {
    let app = app();
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/flowers/demo",
        Some(json!({"count": 1_000_000})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/place",
        Some(json!({"maxAttempts": 1_000_000_000u64})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("maxAttempts"));

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/flowers/demo",
        Some(json!({"count": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn wallet_reset_drops_coins() {
    let app = app();
    call(
        &app,
        Method::POST,
        "/api/wallet/collect",
        Some(json!({"coinId": "coin-2"})),
    )
    .await;
    let (status, body) = call(&app, Method::POST, "/api/wallet/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["coins"], 0);
    assert_eq!(body["collected"], json!([]));

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/wallet/collect",
        Some(json!({"coinId": "coin-2"})),
    )
    .await;
    assert_eq!(body["changed"], true);
}
