//! Domain service for authentication.
//!
//! Handles sign-in (which doubles as sign-up on first sight of a username)
//! and bearer token verification.

use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Signs a user in, creating the account with the starting balance
    /// if the username has never been seen. Returns a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if the user exists and the password is wrong.
    async fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError>;

    /// Verifies a bearer token and returns the username it identifies.
    fn verify_token(&self, token: &str) -> Result<String, AuthError>;
}
