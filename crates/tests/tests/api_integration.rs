use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wayfarer_api::{build_app, ApiConfig};
use wayfarer_planner::GenerationConfig;

const API_KEY: &str = "dev-wayfarer-key";

async fn app_with(generation: GenerationConfig) -> Router {
    let config = ApiConfig {
        generation,
        ..ApiConfig::default()
    };
    build_app(&config).await.expect("app should build")
}

async fn app() -> Router {
    app_with(GenerationConfig::immediate(11)).await
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-api-key", API_KEY)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, parsed)
}

async fn open_quick_session(app: &Router) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/v1/sessions",
        Some(json!({"flow": "quick", "user_id": "traveler-9"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().unwrap().to_string()
}

async fn fill_quick(app: &Router, id: &str) {
    for action in [
        json!({"type": "set_destination", "destination": {"name": "Paris"}}),
        json!({"type": "set_dates", "start": "2024-06-01", "end": "2024-06-03"}),
        json!({"type": "set_companion", "companion": "friends"}),
        json!({"type": "toggle_style", "style": "foodie"}),
    ] {
        let (status, _) = call(app, "POST", &format!("/v1/sessions/{id}/actions"), Some(action)).await;
        assert_eq!(status, StatusCode::OK);
    }
}

async fn wait_for_itinerary(app: &Router, id: &str) -> Value {
    for _ in 0..400 {
        let (_, body) = call(app, "GET", &format!("/v1/sessions/{id}"), None).await;
        let workflow = &body["workflow"];
        if workflow["has_ai_content"] == json!(true) && workflow["generation"]["is_generating"] == json!(false) {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("generation did not finish");
}

#[tokio::test]
async fn health_is_public() {
    let app = app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["storage"], "memory");
    assert!(parsed.get("metrics").is_some());
}

#[tokio::test]
async fn sessions_require_api_key() {
    let app = app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/v1/sessions")
        .header("content-type", "application/json")
        .body(Body::from(json!({"flow": "quick", "user_id": "u"}).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn flow_steps_are_listed() {
    let app = app().await;

    let (status, body) = call(&app, "GET", "/v1/flows/advanced/steps", None).await;
    assert_eq!(status, StatusCode::OK);
    let steps = body["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 10);
    assert_eq!(steps[7]["id"], "accommodation");
    assert_eq!(steps[7]["optional"], true);

    let (status, _) = call(&app, "GET", "/v1/flows/scenic/steps", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn quick_flow_reaches_a_confirmed_plan() {
    let app = app().await;
    let id = open_quick_session(&app).await;

    let (_, blocked) = call(&app, "POST", &format!("/v1/sessions/{id}/next"), None).await;
    assert_eq!(blocked["moved"], false);

    fill_quick(&app, &id).await;
    let (_, moved) = call(&app, "POST", &format!("/v1/sessions/{id}/next"), None).await;
    assert_eq!(moved["moved"], true);
    assert_eq!(moved["session"]["workflow"]["step_id"], "dates");

    let (status, started) = call(&app, "POST", &format!("/v1/sessions/{id}/generate"), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(started["generation"]["is_generating"], true);

    wait_for_itinerary(&app, &id).await;

    let (status, draft) = call(&app, "POST", &format!("/v1/sessions/{id}/draft"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draft["plan"]["status"], "draft");
    assert_eq!(draft["plan"]["ai_content"]["days"].as_array().unwrap().len(), 3);

    let (_, confirmed) = call(&app, "POST", &format!("/v1/sessions/{id}/confirm"), None).await;
    let (_, again) = call(&app, "POST", &format!("/v1/sessions/{id}/confirm"), None).await;
    assert_eq!(confirmed["plan"]["status"], "confirmed");
    assert_eq!(confirmed["plan"]["id"], draft["plan"]["id"]);
    assert_eq!(again["plan"]["id"], draft["plan"]["id"]);
    assert_eq!(again["plan"]["confirmed_at"], confirmed["plan"]["confirmed_at"]);
    assert_eq!(again["revision"], 3);

    let (status, listed) = call(&app, "GET", "/v1/plans?user_id=traveler-9", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["plans"].as_array().unwrap().len(), 1);

    let (status, budget) = call(&app, "GET", &format!("/v1/sessions/{id}/budget?currency=EUR"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(budget["currency"], "EUR");
}

#[tokio::test]
async fn advanced_next_waits_for_valid_destinations() {
    let app = app().await;
    let (_, created) = call(
        &app,
        "POST",
        "/v1/sessions",
        Some(json!({"flow": "advanced", "user_id": "traveler-2"})),
    )
    .await;
    let id = created["session_id"].as_str().unwrap();

    let (_, first) = call(&app, "POST", &format!("/v1/sessions/{id}/next"), None).await;
    assert_eq!(first["moved"], true);
    let (_, second) = call(&app, "POST", &format!("/v1/sessions/{id}/next"), None).await;
    assert_eq!(second["moved"], false);
    assert_eq!(second["session"]["workflow"]["step_id"], "destinations");

    let (_, jumped) = call(
        &app,
        "POST",
        &format!("/v1/sessions/{id}/goto"),
        Some(json!({"index": 99})),
    )
    .await;
    assert_eq!(jumped["session"]["workflow"]["step_index"], 9);

    let (status, body) = call(
        &app,
        "POST",
        &format!("/v1/sessions/{id}/preferences"),
        Some(json!({"companion": "family"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_action");
}

#[tokio::test]
async fn generation_rejects_an_incomplete_form() {
    let app = app().await;
    let id = open_quick_session(&app).await;

    let (status, body) = call(&app, "POST", &format!("/v1/sessions/{id}/generate"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_failed");
}

#[tokio::test]
async fn closing_waits_for_cancelled_generation() {
    let app = app_with(GenerationConfig {
        tick: Duration::from_secs(5),
        step: 5,
        seed: Some(1),
    })
    .await;
    let id = open_quick_session(&app).await;
    fill_quick(&app, &id).await;

    let (status, _) = call(&app, "POST", &format!("/v1/sessions/{id}/generate"), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, body) = call(&app, "DELETE", &format!("/v1/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "generation_in_progress");

    let action = json!({"type": "set_companion", "companion": "family"});
    let (status, _) = call(&app, "POST", &format!("/v1/sessions/{id}/actions"), Some(action)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(&app, "POST", &format!("/v1/sessions/{id}/generate/cancel"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "DELETE", &format!("/v1/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, "GET", &format!("/v1/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn preferences_fill_the_quick_form() {
    let app = app().await;
    let id = open_quick_session(&app).await;

    let (status, body) = call(
        &app,
        "POST",
        &format!("/v1/sessions/{id}/preferences"),
        Some(json!({
            "companion": "family",
            "trip_styles": ["nature", "relaxation"],
            "travelers": {"adults": 2, "children": 1, "infants": 0}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["workflow"]["has_applied_preferences"], true);
    assert_eq!(body["workflow"]["form_data"]["companion"], "family");
    assert_eq!(body["workflow"]["form_data"]["travelers"]["children"], 1);
}

#[tokio::test]
async fn synthesize_is_deterministic_for_a_seed() {
    let app = app().await;
    let request = json!({
        "destination": "Paris",
        "dates": {"start": "2024-06-01", "end": "2024-06-03"},
        "interests": ["food"],
        "seed": 3
    });

    let (status, first) = call(&app, "POST", "/v1/synthesize", Some(request.clone())).await;
    let (_, second) = call(&app, "POST", "/v1/synthesize", Some(request)).await;
    assert_eq!(status, StatusCode::OK);

    let days = first["days"].as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[0]["title"], "Arrival Day");
    assert_eq!(days[1]["title"], "Iconic Paris");
    assert_eq!(days[2]["title"], "Departure Day");
    assert!(days[1]["activities"][0]["id"].as_str().unwrap().ends_with("-day2"));
    assert_eq!(first["weather_forecast"], second["weather_forecast"]);
}

#[tokio::test]
async fn currency_falls_back_without_upstream() {
    let app = app().await;

    let (status, body) = call(
        &app,
        "POST",
        "/v1/currency",
        Some(json!({
            "action": "convert",
            "amount": 100,
            "fromCurrency": "USD",
            "toCurrency": "EUR"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["meta"]["source"], "fallback");
    assert_eq!(body["data"]["to"]["amount"], 92.0);

    let (status, body) = call(
        &app,
        "POST",
        "/v1/currency",
        Some(json!({"action": "convert", "amount": 1, "fromCurrency": "USD", "toCurrency": "ZZZ"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
