use actix_web::{web, HttpResponse};
use validator::Validate;

use ms_core::services::ValidateOtpRequest as ValidateCommand;
use ms_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::ValidateOtpRequest;
use crate::handlers::{handle_domain_error, validation_error_response};

/// Handler for POST /v1/otp/validate
///
/// On success the destination the code was sent to becomes the subject's
/// verified channel and the code is consumed.
pub async fn validate_otp(
    state: web::Data<AppState>,
    body: web::Json<ValidateOtpRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    if let Err(errors) = body.validate() {
        return validation_error_response(&errors);
    }

    let command = ValidateCommand {
        user_id: body.user_id,
        user_type: body.user_type,
        category: body.category,
        otp: body.otp,
    };

    match state.otp_service.validate(command).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message("OTP validated successfully")),
        Err(e) => handle_domain_error(e),
    }
}
