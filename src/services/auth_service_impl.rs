//! `SeaORM` implementation of the `AuthService` trait.

use anyhow::Context;
use async_trait::async_trait;
use tokio::task;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::db::repositories::user::{hash_password, verify_password};
use crate::services::auth_service::{AuthError, AuthService};
use crate::services::token::TokenIssuer;

pub struct SeaOrmAuthService {
    store: Store,
    tokens: TokenIssuer,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: TokenIssuer, security: SecurityConfig) -> Self {
        Self {
            store,
            tokens,
            security,
        }
    }

    /// Argon2 is CPU-intensive and would block the async runtime if run directly.
    async fn check_password(&self, password_hash: String, password: &str) -> Result<(), AuthError> {
        let password = password.to_string();
        let is_valid = task::spawn_blocking(move || verify_password(&password_hash, &password))
            .await
            .context("Password verification task panicked")??;

        if is_valid {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    async fn register(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let password = password.to_string();
        let security = self.security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
            .await
            .context("Password hashing task panicked")??;

        let created = self.store.create_user(username, password_hash).await?;
        if created.is_some() {
            info!(user = %username, "Created user");
        }
        Ok(created.is_some())
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let existing = self
            .store
            .get_user_by_username_with_password(username)
            .await?;

        match existing {
            Some((_, password_hash)) => self.check_password(password_hash, password).await?,
            None => {
                // A concurrent request may have created the user between the
                // lookup and the insert; fall back to verifying against it.
                if !self.register(username, password).await? {
                    let (_, password_hash) = self
                        .store
                        .get_user_by_username_with_password(username)
                        .await?
                        .ok_or(AuthError::InvalidCredentials)?;
                    self.check_password(password_hash, password).await?;
                }
            }
        }

        Ok(self.tokens.issue(username)?)
    }

    fn verify_token(&self, token: &str) -> Result<String, AuthError> {
        self.tokens
            .verify(token)
            .map_err(|_| AuthError::InvalidToken)
    }
}
