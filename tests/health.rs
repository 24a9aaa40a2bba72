use axum::{http::StatusCode, response::IntoResponse};
use shopfront_api::routes::health::health_check;

#[tokio::test]
async fn health_check_returns_ok() {
    let response = health_check().await;
    assert_eq!(response.message, "Health check");
    assert_eq!(response.data.status, "ok");

    let response = health_check().await.into_response();
    assert_eq!(response.status(), StatusCode::OK);
}
