//! Application state and route table

use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};
use std::sync::Arc;

use ms_core::services::{OtpService, PasswordResetService};

use crate::handlers::error::json_error_handler;
use crate::middleware::RateLimiter;
use crate::routes::{health, otp, password_reset};

/// Services shared by every handler
pub struct AppState {
    pub otp_service: Arc<OtpService>,
    pub password_reset_service: Arc<PasswordResetService>,
}

impl AppState {
    pub fn new(
        otp_service: Arc<OtpService>,
        password_reset_service: Arc<PasswordResetService>,
    ) -> Self {
        Self {
            otp_service,
            password_reset_service,
        }
    }
}

/// JSON extractor configuration: size limit plus the shared error envelope
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err: JsonPayloadError, req: &HttpRequest| json_error_handler(err, req))
}

/// Register every route, with the public `/v1` endpoints behind `limiter`.
///
/// `/v1/otp/validate` must come before `/v1/otp/{type}` so the literal
/// segment wins.
pub fn configure(limiter: RateLimiter) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.route("/health", web::get().to(health::health_check))
            .service(v1_scope().wrap(limiter));
    }
}

fn v1_scope() -> actix_web::Scope {
    web::scope("/v1")
        .service(
            web::scope("/otp")
                .route("/validate", web::post().to(otp::validate_otp))
                .route("/{type}", web::post().to(otp::create_otp))
                .route("/{type}/resend", web::post().to(otp::resend_otp)),
        )
        .service(
            web::scope("/password-reset")
                .route("/link", web::post().to(password_reset::create_link))
                .route("/verify", web::post().to(password_reset::verify_link)),
        )
}

/// Fallback for unknown routes
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(ms_shared::ErrorResponse::new(
        ms_shared::error_codes::NOT_FOUND,
        format!("Not Found - {}", req.path()),
    ))
}
