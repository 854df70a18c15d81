use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

const DEFAULT_EXPIRATION_HOURS: i64 = 24;

/// Session claims issued by the identity provider. `email` identifies the
/// club owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(sub: impl Into<String>, email: impl Into<String>, expiration_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: sub.into(),
            email: email.into(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiration_hours)).timestamp(),
        }
    }
}

/// HS256 tokens signed with the secret shared with the identity provider.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn create_token(&self, sub: &str, email: &str) -> Result<String, AppError> {
        let claims = Claims::new(sub, email, DEFAULT_EXPIRATION_HOURS);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip_and_wrong_secret() {
        let service = JwtService::new("club-secret");
        let token = service.create_token("user-1", "owner@tiger.my").unwrap();

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.email, "owner@tiger.my");
        assert_eq!(claims.sub, "user-1");

        let other = JwtService::new("another-secret");
        assert!(matches!(other.verify_token(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new("club-secret");
        let claims = Claims::new("user-1", "owner@tiger.my", -2);
        let token = encode(&Header::default(), &claims, &service.encoding_key).unwrap();
        assert!(service.verify_token(&token).is_err());
    }
}
