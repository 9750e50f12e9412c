use actix_web::HttpResponse;

use ms_shared::HealthResponse;

/// Handler for GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy(
        "moreshop-admin-api",
        env!("CARGO_PKG_VERSION"),
    ))
}
