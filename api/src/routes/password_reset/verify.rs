use actix_web::{web, HttpResponse};
use validator::Validate;

use ms_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::{PasswordResetVerifyRequest, SubjectIdResponse};
use crate::handlers::{handle_domain_error, validation_error_response};

/// Handler for POST /v1/password-reset/verify
///
/// Redeems a reset token and stores the new password. A token stops working
/// once any reset for its subject has succeeded.
pub async fn verify_link(
    state: web::Data<AppState>,
    body: web::Json<PasswordResetVerifyRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    if let Err(errors) = body.validate() {
        return validation_error_response(&errors);
    }

    match state
        .password_reset_service
        .reset_password(&body.reset_token, &body.new_password)
        .await
    {
        Ok(user_id) => HttpResponse::Ok().json(ApiResponse::success(
            "Password updated successfully",
            SubjectIdResponse { user_id },
        )),
        Err(e) => handle_domain_error(e),
    }
}
