//! Domain service for registration, login and bearer-token authentication.

use thiserror::Error;

use crate::domain::{AccessToken, Identity};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing access token")]
    MissingToken,

    #[error("Invalid access token")]
    InvalidToken,

    #[error("Malformed {0} header")]
    MalformedHeader(&'static str),

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<crate::db::EmailTaken>() {
            Ok(taken) => Self::EmailTaken(taken.0),
            Err(err) => Self::Database(format!("{err:#}")),
        }
    }
}

/// Registration request.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an identity with a salted password hash and a fresh token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Validation`] for an empty email/password or overlong fields
    /// - [`AuthError::EmailTaken`] if the email is already registered
    async fn register(&self, registration: Registration) -> Result<Identity, AuthError>;

    /// Verifies credentials and returns the stored access token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown email or a
    /// wrong password, without saying which.
    async fn login(&self, email: &str, password: &str) -> Result<AccessToken, AuthError>;

    /// Resolves a bearer token to exactly one identity.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MissingToken`] for an empty token
    /// - [`AuthError::InvalidToken`] when no identity holds the token
    async fn authenticate(&self, token: &str) -> Result<Identity, AuthError>;
}
