//! Bearer token issuance and verification (HS256 JWT).

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;

/// Token claims. The subject is the username; nothing else is encoded.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: &str, ttl_minutes: u32) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(i64::from(ttl_minutes)),
        }
    }

    /// Builds an issuer from config, generating a throwaway secret when none is set.
    #[must_use]
    pub fn from_config(config: &SecurityConfig) -> Self {
        if config.jwt_secret.is_empty() {
            tracing::warn!(
                "No JWT secret configured; using a random one. Tokens will not survive a restart"
            );
            Self::new(&generate_secret(), config.token_ttl_minutes)
        } else {
            Self::new(&config.jwt_secret, config.token_ttl_minutes)
        }
    }

    pub fn issue(&self, username: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to generate token")
    }

    /// Returns the username the token was issued for.
    pub fn verify(&self, token: &str) -> Result<String> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .context("Invalid or expired token")?;
        Ok(data.claims.sub)
    }
}

/// Random 64 character hex string
#[must_use]
pub fn generate_secret() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}
