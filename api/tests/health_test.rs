mod common;

use actix_web::{http::StatusCode, test};

use common::TestContext;

#[actix_web::test]
async fn test_health_check() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);

    let response = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-content-type-options").unwrap(), "nosniff");

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "moreshop-admin-api");
}

#[actix_web::test]
async fn test_unknown_route_uses_error_envelope() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);

    let response =
        test::call_service(&app, test::TestRequest::get().uri("/v1/nope").to_request()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(body["message"], "Not Found - /v1/nope");
}
