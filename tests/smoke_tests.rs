//! Smoke tests against a file-backed store.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use phonebook::config::Config;
use phonebook::services::Registration;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

/// Removes the sqlite file (and any journal files) when the test ends.
struct TempDb {
    path: PathBuf,
}

impl TempDb {
    fn new() -> Self {
        let path =
            std::env::temp_dir().join(format!("phonebook-smoke-test-{}.db", uuid::Uuid::new_v4()));
        Self { path }
    }

    fn url(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-journal", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

struct SmokeApp {
    state: Arc<phonebook::api::AppState>,
    router: Router,
    token: String,
    db: TempDb,
}

async fn spawn_app() -> SmokeApp {
    let db = TempDb::new();

    let mut config = Config::default();
    config.general.database_path = db.url();
    config.observability.metrics_enabled = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = phonebook::api::create_app_state(config, None)
        .await
        .expect("failed to create app state");

    let identity = state
        .auth_service()
        .register(Registration {
            email: "smoke@x.com".to_string(),
            password: "smoke".to_string(),
            first_name: "Smoke".to_string(),
            last_name: "Test".to_string(),
        })
        .await
        .expect("failed to register smoke user");

    let router = phonebook::api::router(state.clone());
    SmokeApp {
        state,
        router,
        token: identity.access_token.into_inner(),
        db,
    }
}

async fn json_request(
    app: &Router,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Access-Token", token);

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn smoke_health_endpoints_are_public() {
    let SmokeApp { router: app, db: _db, .. } = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "ok");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["ready"], true);
    assert_eq!(body["checks"]["database"], true);
}

#[tokio::test]
async fn smoke_car_crud_flow() {
    let SmokeApp {
        router: app,
        token,
        db: _db,
        ..
    } = spawn_app().await;

    let (status, created) = json_request(
        &app,
        "POST",
        "/api/cars",
        &token,
        Some(json!({ "make": "Volvo", "model": "240", "color": null, "year": 1988 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["make"], "Volvo");
    assert_eq!(created["year"], 1988);
    assert!(created["color"].is_null());
    assert!(created.get("owner_token").is_none());

    let uri = format!("/api/cars/{}", created["id"].as_str().unwrap());

    let (status, updated) = json_request(
        &app,
        "PUT",
        &uri,
        &token,
        Some(json!({ "make": "Volvo", "model": "245", "color": "red", "year": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["model"], "245");
    assert!(updated["year"].is_null());

    let (status, list) = json_request(&app, "GET", "/api/cars", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["color"], "red");

    let (status, _) = json_request(&app, "DELETE", &uri, &token, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, list) = json_request(&app, "GET", "/api/cars", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn smoke_car_rejects_out_of_range_year() {
    let SmokeApp {
        router: app,
        token,
        db: _db,
        ..
    } = spawn_app().await;

    let (status, body) = json_request(
        &app,
        "POST",
        "/api/cars",
        &token,
        Some(json!({ "make": null, "model": null, "color": null, "year": 100_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn smoke_contacts_and_cars_are_separate() {
    let SmokeApp {
        state,
        router: app,
        token,
        db: _db,
    } = spawn_app().await;

    json_request(
        &app,
        "POST",
        "/api/contacts",
        &token,
        Some(json!({ "name": "Bob", "email": null, "phone_number": null, "address": null })),
    )
    .await;

    let (_, cars) = json_request(&app, "GET", "/api/cars", &token, None).await;
    assert_eq!(cars, json!([]));

    assert!(state.store().ping().await.is_ok());
}

#[tokio::test]
async fn smoke_metrics_requires_auth_and_can_be_disabled() {
    let SmokeApp {
        router: app,
        token,
        db: _db,
        ..
    } = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/metrics")
                .header("X-Access-Token", token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn smoke_temp_db_is_removed_on_drop() {
    let smoke = spawn_app().await;
    let path = smoke.db.path.clone();
    assert!(path.exists());

    drop(smoke);
    assert!(!path.exists());
}
