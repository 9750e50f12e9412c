//! Translation of domain and request errors into the error envelope.
//!
//! Every failure a handler can produce goes through one of these functions,
//! so status codes and error codes are decided in a single place.

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse};
use serde_json::json;
use validator::ValidationErrors;

use ms_core::errors::{DomainError, TokenError};
use ms_shared::{error_codes, ErrorResponse};

/// Map a domain error to its HTTP response
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let (status, code, message) = match &error {
        DomainError::Validation { message } => (
            StatusCode::BAD_REQUEST,
            error_codes::VALIDATION_ERROR,
            message.clone(),
        ),
        DomainError::OtpNotFound => (
            StatusCode::BAD_REQUEST,
            error_codes::OTP_NOT_FOUND,
            error.to_string(),
        ),
        DomainError::InvalidOtp => (
            StatusCode::BAD_REQUEST,
            error_codes::INVALID_OTP,
            error.to_string(),
        ),
        DomainError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            error_codes::NOT_FOUND,
            error.to_string(),
        ),
        DomainError::Token(TokenError::GenerationFailed) | DomainError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            "An error occurred".to_string(),
        ),
        DomainError::Token(token_error) => {
            let code = match token_error {
                TokenError::TokenExpired => error_codes::TOKEN_EXPIRED,
                TokenError::TokenRevoked => error_codes::TOKEN_REVOKED,
                _ => error_codes::INVALID_TOKEN,
            };
            (StatusCode::UNAUTHORIZED, code, token_error.to_string())
        }
        DomainError::NotificationFailed { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::NOTIFICATION_FAILED,
            "Notification could not be delivered, please try again later".to_string(),
        ),
    };

    if status.is_server_error() {
        tracing::error!(error = %error, status = status.as_u16(), "Request failed");
    } else {
        tracing::debug!(error = %error, status = status.as_u16(), "Request rejected");
    }

    HttpResponse::build(status).json(ErrorResponse::new(code, message))
}

/// 400 response listing every failed field
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request body");

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.add_detail(field.to_string(), messages);
    }

    HttpResponse::BadRequest().json(response)
}

/// Turn JSON extractor failures into the error envelope
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let (status, message) = match &err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large".to_string())
        }
        JsonPayloadError::ContentType => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Content-Type must be application/json".to_string(),
        ),
        JsonPayloadError::Deserialize(e) => (StatusCode::BAD_REQUEST, e.to_string()),
        other => (StatusCode::BAD_REQUEST, other.to_string()),
    };

    tracing::debug!(path = req.path(), error = %err, "Rejected JSON body");

    let body = ErrorResponse::new(error_codes::BAD_REQUEST, message)
        .add_detail("path", json!(req.path()));
    actix_web::error::InternalError::from_response(err, HttpResponse::build(status).json(body))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_otp_errors_are_bad_requests() {
        let response = handle_domain_error(DomainError::InvalidOtp);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "INVALID_OTP");
        assert_eq!(body["message"], "Invalid OTP");

        let response = handle_domain_error(DomainError::OtpNotFound);
        assert_eq!(body_json(response).await["message"], "OTP not found");
    }

    #[actix_web::test]
    async fn test_token_errors_are_unauthorized() {
        let response = handle_domain_error(DomainError::Token(TokenError::TokenRevoked));
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "TOKEN_REVOKED");
    }

    #[actix_web::test]
    async fn test_internal_message_is_hidden() {
        let response = handle_domain_error(DomainError::internal("connection refused on 10.0.0.3"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "INTERNAL_ERROR");
        assert!(!body["message"].as_str().unwrap().contains("10.0.0.3"));
    }

    #[actix_web::test]
    async fn test_not_found_keeps_resource() {
        let response = handle_domain_error(DomainError::not_found("tenant with email a@b.io"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["message"],
            "tenant with email a@b.io not found"
        );
    }

    #[actix_web::test]
    async fn test_notification_failure_is_unavailable() {
        let response = handle_domain_error(DomainError::NotificationFailed {
            message: "smtp down".to_string(),
        });
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
