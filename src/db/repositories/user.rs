use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, sea_query::OnConflict,
};
use std::collections::HashMap;

use crate::config::SecurityConfig;
use crate::constants::STARTING_BALANCE;
use crate::entities::{prelude::*, users};

/// User data returned from repository (without sensitive password hash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub balance: i64,
    pub created_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            balance: model.balance,
            created_at: model.created_at,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// Get user by username together with the stored password hash
    pub async fn get_by_username_with_password(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(|u| {
            let password_hash = u.password_hash.clone();
            (User::from(u), password_hash)
        }))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    /// Inserts a user with the starting balance.
    /// Returns `None` when the username is already taken.
    pub async fn create(&self, username: &str, password_hash: String) -> Result<Option<User>> {
        let model = users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            balance: Set(STARTING_BALANCE),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let inserted = Users::insert(model)
            .on_conflict(
                OnConflict::column(users::Column::Username)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to insert user")?;

        if inserted == 0 {
            return Ok(None);
        }

        self.get_by_username(username).await
    }

    /// Resolves user ids to usernames. Ids with no row are absent from the map.
    pub async fn usernames_by_ids(&self, ids: &[i32]) -> Result<HashMap<i32, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = Users::find()
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await
            .context("Failed to resolve usernames")?;

        Ok(rows.into_iter().map(|u| (u.id, u.username)).collect())
    }
}

/// 16 random bytes from the thread-local CSPRNG, base64-encoded for the PHC string.
fn generate_salt() -> Result<SaltString> {
    use rand::Rng;

    let bytes: [u8; 16] = rand::rng().random();
    SaltString::encode_b64(&bytes).map_err(|e| anyhow::anyhow!("Failed to encode salt: {e}"))
}

/// Hash a password with Argon2id.
///
/// Without a config, the crate's default Argon2 params are used.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = generate_salt()?;

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Check a password against a PHC-format hash. Params are read from the hash itself.
pub fn verify_password(password_hash: &str, password: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
