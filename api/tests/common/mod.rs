//! Shared fixtures: the real route table over in-memory adapters

#![allow(dead_code)]

use actix_web::web;
use std::sync::Arc;

use ms_api::AppState;
use ms_core::domain::entities::subject::{Category, Subject, UserType};
use ms_core::repositories::{InMemoryOtpRepository, SubjectDirectory};
use ms_core::services::{
    BcryptCredentialService, JwtResetTokenSigner, OtpService, OtpServiceConfig,
    PasswordResetConfig, PasswordResetService, RecordingNotificationDispatcher,
};

pub const TEST_SECRET: &str = "api-test-secret";

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub subjects: SubjectDirectory,
    pub otps: Arc<InMemoryOtpRepository>,
    pub notifier: Arc<RecordingNotificationDispatcher>,
}

impl TestContext {
    pub fn new() -> Self {
        let subjects = SubjectDirectory::in_memory();
        let otps = Arc::new(InMemoryOtpRepository::new());
        let notifier = Arc::new(RecordingNotificationDispatcher::new());
        let credentials = Arc::new(BcryptCredentialService::new(4));

        let otp_service = Arc::new(OtpService::new(
            subjects.clone(),
            otps.clone(),
            credentials.clone(),
            notifier.clone(),
            OtpServiceConfig::default(),
        ));

        let reset_config = PasswordResetConfig::default();
        let password_reset_service = Arc::new(PasswordResetService::new(
            subjects.clone(),
            credentials,
            notifier.clone(),
            Arc::new(JwtResetTokenSigner::new(
                TEST_SECRET,
                &reset_config.issuer,
                &reset_config.audience,
            )),
            reset_config,
        ));

        Self {
            state: web::Data::new(AppState::new(otp_service, password_reset_service)),
            subjects,
            otps,
            notifier,
        }
    }

    /// Register a subject whose e-mail is already verified
    pub async fn subject_with_email(&self, user_type: UserType, email: &str) -> Subject {
        let mut subject = Subject::new_bare(user_type);
        subject.set_channel(Category::Email, email);
        self.subjects
            .for_type(user_type)
            .create(subject)
            .await
            .unwrap()
    }

    pub fn last_reset_token(&self, email: &str) -> String {
        let link = self.notifier.last_reset_link_for(email).expect("a reset link was sent");
        link.split("resetToken=")
            .nth(1)
            .expect("link carries a token")
            .to_string()
    }
}

/// Build the application under test with rate limiting off
#[macro_export]
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ctx.state.clone())
                .app_data(ms_api::json_config(64 * 1024))
                .wrap(ms_api::middleware::SecurityMiddleware::development())
                .configure(ms_api::configure(ms_api::middleware::RateLimiter::disabled()))
                .default_service(actix_web::web::to(ms_api::not_found)),
        )
        .await
    };
}

/// POST `body` to `uri`, returning status and parsed JSON
#[macro_export]
macro_rules! post_json {
    ($app:expr, $uri:expr, $body:expr) => {{
        let request = actix_web::test::TestRequest::post()
            .uri($uri)
            .set_json($body)
            .to_request();
        let response = actix_web::test::call_service(&$app, request).await;
        let status = response.status();
        let body: serde_json::Value = actix_web::test::read_body_json(response).await;
        (status, body)
    }};
}
