//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::SecurityConfig;
use crate::db::{NewUser, Store};
use crate::domain::{AccessToken, Identity};
use crate::services::auth_service::{AuthError, AuthService, Registration};

const EMAIL_MAX: usize = 150;
const NAME_MAX: usize = 150;

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    fn validate(registration: &Registration) -> Result<(), AuthError> {
        if registration.email.is_empty() {
            return Err(AuthError::Validation("Email is required".to_string()));
        }
        if registration.password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }

        for (field, value, max) in [
            ("email", &registration.email, EMAIL_MAX),
            ("first_name", &registration.first_name, NAME_MAX),
            ("last_name", &registration.last_name, NAME_MAX),
        ] {
            if value.chars().count() > max {
                return Err(AuthError::Validation(format!(
                    "{field} must be at most {max} characters"
                )));
            }
        }

        Ok(())
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, registration: Registration) -> Result<Identity, AuthError> {
        let registration = Registration {
            email: registration.email.trim().to_string(),
            ..registration
        };
        Self::validate(&registration)?;

        if self.store.email_registered(&registration.email).await? {
            return Err(AuthError::EmailTaken(registration.email));
        }

        let new_user = NewUser {
            email: registration.email,
            first_name: registration.first_name,
            last_name: registration.last_name,
        };

        let identity = self
            .store
            .register_user(new_user, &registration.password, &self.security)
            .await?;

        info!(user_id = %identity.id, "Identity registered");
        Ok(identity)
    }

    async fn login(&self, email: &str, password: &str) -> Result<AccessToken, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let identity = self
            .store
            .verify_user_password(email.trim(), password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        info!(user_id = %identity.id, "Login succeeded");
        Ok(identity.access_token)
    }

    async fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let identity = self.store.find_user_by_token(token).await?;

        identity.ok_or_else(|| {
            debug!("Rejected unknown access token");
            AuthError::InvalidToken
        })
    }
}
