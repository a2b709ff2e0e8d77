pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::database::models::User;

pub use password::{hash_password, verify_password, PasswordError};

/// Request header carrying the signed token, both ways
pub const TOKEN_HEADER: &str = "x-auth-token";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn for_user(user: &User, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
            exp,
            iat: now.timestamp(),
        }
    }
}

/// Authenticated caller, immutable for the lifetime of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    pub subject: Uuid,
    pub username: String,
    pub is_admin: bool,
}

impl From<Claims> for IdentityClaim {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            username: claims.username,
            is_admin: claims.is_admin,
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT generation error: {0}")]
    Generation(String),

    #[error("Invalid JWT token: {0}")]
    Invalid(String),

    #[error("JWT secret not configured")]
    MissingSecret,
}

/// Issues and verifies HS256 tokens against the server-held secret
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: u64,
}

impl TokenService {
    pub fn new(security: &SecurityConfig) -> Result<Self, TokenError> {
        if security.jwt_secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }
        let secret = security.jwt_secret.as_bytes();
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_hours: security.jwt_expiry_hours,
        })
    }

    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let claims = Claims::for_user(user, self.expiry_hours);
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<IdentityClaim, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        Ok(token_data.claims.into())
    }
}
