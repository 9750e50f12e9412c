//! Claims carried by password reset tokens.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::subject::{Subject, UserType};

/// JWT payload of a reset link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetClaims {
    /// Subject id
    pub sub: String,

    pub user_type: UserType,

    pub role_id: Option<String>,

    /// Fingerprint of the password hash at issuance; a successful reset
    /// changes the hash and so invalidates every earlier link
    pub pwd: String,

    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    pub jti: String,
}

impl PasswordResetClaims {
    pub fn for_subject(
        subject: &Subject,
        expiry_minutes: i64,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::minutes(expiry_minutes);

        Self {
            sub: subject.id.to_string(),
            user_type: subject.user_type,
            role_id: subject.role_id.clone(),
            pwd: password_fingerprint(subject.password_hash.as_deref()),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiry.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn subject_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// SHA-256 hex of the stored password hash (empty input when none is set)
pub fn password_fingerprint(password_hash: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password_hash.unwrap_or_default().as_bytes());
    hex::encode(hasher.finalize())
}
