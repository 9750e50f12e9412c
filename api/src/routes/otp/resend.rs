use actix_web::{web, HttpResponse};
use validator::Validate;

use ms_core::services::ResendOtpRequest as ResendCommand;
use ms_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::{ResendOtpRequest, SubjectIdResponse};
use crate::handlers::{handle_domain_error, validation_error_response};

use super::parse_category;

/// Handler for POST /v1/otp/{type}/resend
///
/// Replaces any pending code for the subject and channel with a fresh one.
/// The subject must already exist.
pub async fn resend_otp(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ResendOtpRequest>,
) -> HttpResponse {
    let category = match parse_category(&path.into_inner()) {
        Ok(category) => category,
        Err(e) => return handle_domain_error(e),
    };

    let body = body.into_inner();
    if let Err(errors) = body.validate() {
        return validation_error_response(&errors);
    }

    let command = ResendCommand {
        user_id: body.user_id,
        user_type: body.user_type,
        category,
        destination: body.destination(category),
    };

    match state.otp_service.resend(command).await {
        Ok(outcome) => HttpResponse::Ok().json(ApiResponse::success(
            outcome.message(),
            SubjectIdResponse {
                user_id: outcome.subject_id,
            },
        )),
        Err(e) => handle_domain_error(e),
    }
}
