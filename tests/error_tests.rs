use axum::{http::StatusCode, response::IntoResponse};
use fondos_api::error::AppError;
use http_body_util::BodyExt;
use sea_orm::DbErr;
use serde_json::Value;

// Test for AppError Display implementation
#[test]
fn test_app_error_display() {
    // Test each error variant
    let error1 = AppError::FundNotFound(42);
    assert_eq!(error1.to_string(), "Fund not found: 42");

    let error2 = AppError::InvalidRequest("unparseable fechainicio: nope".to_string());
    assert_eq!(
        error2.to_string(),
        "Invalid request: unparseable fechainicio: nope"
    );

    let error3 = AppError::MissingFields(vec!["nombre", "url"]);
    assert_eq!(error3.to_string(), "Missing required fields: nombre, url");

    let error4 = AppError::DatabaseError(DbErr::Custom("connection refused".to_string()));
    assert!(error4.to_string().contains("connection refused"));
}

// Test for AppError IntoResponse implementation
#[tokio::test]
async fn test_app_error_into_response() {
    // Test FundNotFound error
    let error = AppError::FundNotFound(42);
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["error"], "Fund not found");

    // Test InvalidRequest error
    let error = AppError::InvalidRequest("unparseable fecha_desde: nope".to_string());
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(
        body["error"],
        "Invalid request: unparseable fecha_desde: nope"
    );

    // Test MissingFields error, which carries a details list
    let error = AppError::MissingFields(vec!["nombre", "fechacierre"]);
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["error"], "Missing required fields");
    assert_eq!(body["details"], serde_json::json!(["nombre", "fechacierre"]));

    // Test DatabaseError: driver detail must not leak to the client
    let error = AppError::DatabaseError(DbErr::Custom("password authentication failed".to_string()));
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["error"], "Internal server error");
}

// A DbErr converts into the storage variant
#[test]
fn test_db_err_conversion() {
    let error: AppError = DbErr::Custom("boom".to_string()).into();
    assert!(matches!(error, AppError::DatabaseError(_)));
}
