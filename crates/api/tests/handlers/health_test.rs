use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_health_and_version() {
    let server = TestContext::new().server();

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");

    let response = server.get("/version").await;
    let body: Value = response.json();
    assert_eq!(body["name"], "clubly-api");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
