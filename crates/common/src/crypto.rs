//! Credential utilities: password hashing and bearer tokens.

use std::{str::FromStr, sync::LazyLock};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AppError, AppResult, config::AuthConfig};

/// Hash a password using Argon2.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash checked when the account does not exist.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("repost-no-such-account").ok());

/// Run one verification against a throwaway hash so that a login for an
/// unknown account takes as long as a wrong password.
pub fn verify_dummy_password(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

/// Reasons a bearer token can be refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token lacks required scope: {0}")]
    InsufficientScope(String),
}

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the token holder.
    pub sub: String,
    /// Expiry as seconds since the epoch.
    pub exp: i64,
    /// Granted scopes.
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Issues and verifies HMAC-signed bearer tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer from the auth configuration.
    ///
    /// Only the HMAC family is accepted since the key is a shared secret.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let algorithm = Algorithm::from_str(&config.jwt_algorithm).map_err(|_| {
            AppError::Config(format!("Unknown jwt_algorithm: {}", config.jwt_algorithm))
        })?;

        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AppError::Config(format!(
                "jwt_algorithm must be HS256, HS384 or HS512, got {}",
                config.jwt_algorithm
            )));
        }
        if config.jwt_secret.is_empty() {
            return Err(AppError::Config("jwt_secret is empty".to_string()));
        }

        let secret = config.jwt_secret.as_bytes();
        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: Duration::seconds(config.token_ttl_secs),
        })
    }

    /// Issue a token for `username` with the configured lifetime.
    pub fn issue(&self, username: &str, scopes: &[&str]) -> AppResult<String> {
        self.issue_with_ttl(username, self.ttl, scopes)
    }

    /// Issue a token for `username` that expires after `ttl`.
    pub fn issue_with_ttl(
        &self,
        username: &str,
        ttl: Duration,
        scopes: &[&str],
    ) -> AppResult<String> {
        let claims = Claims {
            sub: username.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
            scopes: scopes.iter().map(ToString::to_string).collect(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Verify `token` and return its subject.
    ///
    /// Every scope in `required_scopes` must be present in the token.
    pub fn authorize(&self, token: &str, required_scopes: &[&str]) -> Result<String, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            }
        })?;

        if let Some(missing) = required_scopes
            .iter()
            .find(|scope| !data.claims.scopes.iter().any(|s| s == *scope))
        {
            return Err(TokenError::InsufficientScope((*missing).to_string()));
        }

        Ok(data.claims.sub)
    }
}
