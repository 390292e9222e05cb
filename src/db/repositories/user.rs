use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set, SqlErr,
};
use tokio::task;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::domain::{AccessToken, Identity};
use crate::entities::{prelude::*, users};

impl From<users::Model> for Identity {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            access_token: AccessToken::new(model.access_token),
            g_auth_verify: model.g_auth_verify,
            created_at: model.created_at,
        }
    }
}

/// Registration input. The password is hashed by the repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Returned inside an `anyhow::Error` when a unique column rejects the insert.
#[derive(Debug, thiserror::Error)]
#[error("Email already registered: {0}")]
pub struct EmailTaken(pub String);

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Creates a user with a freshly generated id and access token.
    pub async fn create(
        &self,
        new_user: NewUser,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<Identity> {
        let password = password.to_string();
        let config = security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let mut model = users::Model {
            id: uuid::Uuid::new_v4().to_string(),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            password_hash,
            g_auth_verify: false,
            access_token: String::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        for attempt in 1..=TOKEN_ISSUE_ATTEMPTS {
            model.access_token = AccessToken::generate(security.token_bytes).into_inner();

            let err = match Users::insert(Self::active_model(&model))
                .exec_without_returning(&self.conn)
                .await
            {
                Ok(_) => {
                    info!("Registered user {}", model.id);
                    return Ok(Identity::from(model));
                }
                Err(err) => err,
            };

            match violated_unique_column(&err) {
                Some(UniqueColumn::Email) => return Err(EmailTaken(model.email).into()),
                Some(UniqueColumn::AccessToken) => {
                    warn!(attempt, "Generated access token already in use, reissuing");
                }
                None => return Err(err).context("Failed to insert user"),
            }
        }

        anyhow::bail!("Could not issue a unique access token after {TOKEN_ISSUE_ATTEMPTS} attempts")
    }

    fn active_model(model: &users::Model) -> users::ActiveModel {
        users::ActiveModel {
            id: Set(model.id.clone()),
            first_name: Set(model.first_name.clone()),
            last_name: Set(model.last_name.clone()),
            email: Set(model.email.clone()),
            password_hash: Set(model.password_hash.clone()),
            g_auth_verify: Set(model.g_auth_verify),
            access_token: Set(model.access_token.clone()),
            created_at: Set(model.created_at.clone()),
        }
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count = Users::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.conn)
            .await
            .context("Failed to count users by email")?;

        Ok(count > 0)
    }

    /// Exact-match lookup of the bearer token.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<Identity>> {
        let user = Users::find()
            .filter(users::Column::AccessToken.eq(token))
            .one(&self.conn)
            .await
            .context("Failed to query user by access token")?;

        Ok(user.map(Identity::from))
    }

    /// Verify password for a user, returning the identity on success.
    /// Note: This uses `spawn_blocking` because Argon2 hashing is CPU-intensive
    /// and would block the async runtime if run directly.
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<Option<Identity>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(None);
        };

        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            let argon2 = Argon2::default();
            Ok::<bool, anyhow::Error>(
                argon2
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid.then(|| Identity::from(user)))
    }
}

/// Fresh tokens drawn before giving up on a registration.
const TOKEN_ISSUE_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UniqueColumn {
    Email,
    AccessToken,
}

/// Which unique column of `users` rejected a write, if any.
fn violated_unique_column(err: &DbErr) -> Option<UniqueColumn> {
    let Some(SqlErr::UniqueConstraintViolation(message)) = err.sql_err() else {
        return None;
    };

    if message.contains("users.access_token") {
        Some(UniqueColumn::AccessToken)
    } else if message.contains("users.email") {
        Some(UniqueColumn::Email)
    } else {
        None
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses default params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

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
