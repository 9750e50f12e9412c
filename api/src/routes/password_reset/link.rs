use actix_web::{web, HttpResponse};
use validator::Validate;

use ms_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::PasswordResetLinkRequest;
use crate::handlers::{handle_domain_error, validation_error_response};

/// Handler for POST /v1/password-reset/link
pub async fn create_link(
    state: web::Data<AppState>,
    body: web::Json<PasswordResetLinkRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    if let Err(errors) = body.validate() {
        return validation_error_response(&errors);
    }

    match state
        .password_reset_service
        .create_link(&body.email, body.user_type)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message(
            "Password reset link sent successfully",
        )),
        Err(e) => handle_domain_error(e),
    }
}
