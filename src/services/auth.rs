use crate::config::OfammConfig;
use anyhow::{Result, anyhow};
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use thiserror::Error;

pub const TOKEN_ISSUER: &str = "ofamm";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("session expired")]
    Expired,
    #[error("invalid session token")]
    InvalidToken,
    #[error("failed to issue token: {0}")]
    Issue(String),
}

/// The single admin credential plus the signing keys for its session tokens.
pub struct AuthService {
    username: String,
    password: Option<String>,
    password_hash: Option<String>,
    token_ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthService {
    pub fn new(config: &OfammConfig) -> Self {
        if config.jwt_secret.len() < 32 {
            tracing::warn!("JWT_SECRET is shorter than recommended (32 bytes)");
        }
        if config.admin_password.is_none() && config.admin_password_hash.is_none() {
            tracing::warn!("no ADMIN_PASSWORD or ADMIN_PASSWORD_HASH set, admin login is disabled");
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Self {
            username: config.admin_username.clone(),
            password: config.admin_password.clone(),
            password_hash: config.admin_password_hash.clone(),
            token_ttl: Duration::hours(config.token_ttl_hours),
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Checks a login attempt against the configured pair. The hash wins when both are set.
    pub fn verify_credentials(&self, username: &str, password: &str) -> bool {
        let username_ok: bool = username.as_bytes().ct_eq(self.username.as_bytes()).into();

        let password_ok = if let Some(hash) = &self.password_hash {
            match PasswordHash::new(hash) {
                Ok(parsed) => Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok(),
                Err(e) => {
                    tracing::error!(error = %e, "ADMIN_PASSWORD_HASH is not a valid PHC string");
                    false
                }
            }
        } else if let Some(expected) = &self.password {
            password.as_bytes().ct_eq(expected.as_bytes()).into()
        } else {
            false
        };

        username_ok && password_ok
    }

    pub fn issue_token(&self, username: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
            iss: TOKEN_ISSUER.to_string(),
        };
        self.sign(&claims)
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Issue(e.to_string()))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken,
            })
    }
}

/// Hashes a password with argon2id for use as `ADMIN_PASSWORD_HASH`.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("Failed to hash password: {e}"))
}
