use actix_web::{web, HttpResponse};
use validator::Validate;

use ms_core::services::IssueOtpRequest;
use ms_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::{CreateOtpRequest, SubjectIdResponse};
use crate::handlers::{handle_domain_error, validation_error_response};

use super::parse_category;

/// Handler for POST /v1/otp/{type}
///
/// Sends a code to the `phoneNo` or `email` given in the body, registering a
/// bare subject when `userId` is omitted.
///
/// # Request Body
///
/// ```json
/// { "userType": "tenant", "email": "owner@shop.io" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "OTP sent successfully",
///     "data": { "userId": "5f0c6f0e-8f5e-4b8a-9a57-0c1d3b1f2a11" },
///     "timestamp": "2024-05-01T10:00:00Z"
/// }
/// ```
///
/// "OTP already sent" and "... already verified for this userId" are also
/// 200 responses with the same `data`.
pub async fn create_otp(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CreateOtpRequest>,
) -> HttpResponse {
    let category = match parse_category(&path.into_inner()) {
        Ok(category) => category,
        Err(e) => return handle_domain_error(e),
    };

    let body = body.into_inner();
    if let Err(errors) = body.validate() {
        return validation_error_response(&errors);
    }

    let request = IssueOtpRequest {
        user_id: body.user_id,
        user_type: body.user_type,
        category,
        destination: body.destination(category),
    };

    match state.otp_service.issue(request).await {
        Ok(outcome) => HttpResponse::Ok().json(ApiResponse::success(
            outcome.message(),
            SubjectIdResponse {
                user_id: outcome.subject_id(),
            },
        )),
        Err(e) => handle_domain_error(e),
    }
}
