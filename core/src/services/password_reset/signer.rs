//! HS256 signing and verification of reset tokens

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use ms_shared::config::JwtConfig;

use crate::domain::entities::reset_token::PasswordResetClaims;
use crate::errors::TokenError;

/// Turns claims into a compact token and back
pub trait ResetTokenSigner: Send + Sync {
    fn sign(&self, claims: &PasswordResetClaims) -> Result<String, TokenError>;

    /// Verify signature, expiry, issuer and audience, returning the claims
    fn decode(&self, token: &str) -> Result<PasswordResetClaims, TokenError>;
}

pub struct JwtResetTokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtResetTokenSigner {
    pub fn new(secret: &str, issuer: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 5;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(&config.secret, &config.issuer, &config.audience)
    }
}

impl ResetTokenSigner for JwtResetTokenSigner {
    fn sign(&self, claims: &PasswordResetClaims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign reset token");
            TokenError::GenerationFailed
        })
    }

    fn decode(&self, token: &str) -> Result<PasswordResetClaims, TokenError> {
        decode::<PasswordResetClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                _ => TokenError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::subject::{Subject, UserType};

    fn claims(expiry_minutes: i64) -> PasswordResetClaims {
        let subject = Subject::new_bare(UserType::Admin);
        PasswordResetClaims::for_subject(&subject, expiry_minutes, "moreshop", "moreshop-admin")
    }

    #[test]
    fn test_sign_and_decode() {
        let signer = JwtResetTokenSigner::new("secret", "moreshop", "moreshop-admin");
        let original = claims(15);
        let token = signer.sign(&original).unwrap();
        assert_eq!(signer.decode(&token).unwrap(), original);
    }

    #[test]
    fn test_expired_token() {
        let signer = JwtResetTokenSigner::new("secret", "moreshop", "moreshop-admin");
        let token = signer.sign(&claims(-60)).unwrap();
        assert_eq!(signer.decode(&token), Err(TokenError::TokenExpired));
    }

    #[test]
    fn test_wrong_secret_or_audience_is_invalid() {
        let signer = JwtResetTokenSigner::new("secret", "moreshop", "moreshop-admin");
        let token = signer.sign(&claims(15)).unwrap();

        let other_secret = JwtResetTokenSigner::new("other", "moreshop", "moreshop-admin");
        assert_eq!(other_secret.decode(&token), Err(TokenError::InvalidToken));

        let other_audience = JwtResetTokenSigner::new("secret", "moreshop", "storefront");
        assert_eq!(other_audience.decode(&token), Err(TokenError::InvalidToken));

        assert_eq!(signer.decode("not.a.token"), Err(TokenError::InvalidToken));
    }
}
