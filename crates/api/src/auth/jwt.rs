use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::AuthConfig;
use crate::error::AppError;

/// Claims carried by the bearer tokens the identity service issues. This
/// service never mints tokens; it only verifies signature and expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub email: String,
    pub role: String,
    pub iat: i64, // Issued at
    pub exp: i64, // Expiration
}

#[derive(Clone)]
pub struct JwtService {
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        }
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn service(secret: &str) -> JwtService {
        JwtService::new(&AuthConfig {
            jwt_secret: secret.to_string(),
        })
    }

    fn token_for(secret: &str, exp_offset_minutes: i64) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            email: "player@example.com".to_string(),
            role: "player".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(exp_offset_minutes)).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn accepts_valid_token() {
        let svc = service("secret-a");
        let claims = svc.verify_token(&token_for("secret-a", 15)).unwrap();
        assert_eq!(claims.role, "player");
    }

    #[test]
    fn rejects_wrong_signature() {
        let svc = service("secret-a");
        assert!(svc.verify_token(&token_for("secret-b", 15)).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let svc = service("secret-a");
        assert!(svc.verify_token(&token_for("secret-a", -5)).is_err());
    }
}
