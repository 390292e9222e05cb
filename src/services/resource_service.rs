//! Domain service for owned resources (contacts and cars).
//!
//! Both kinds share one lifecycle, so the service is written once over the
//! [`Resource`] trait.
//!
//! # Ownership
//!
//! Writes are stamped with the caller's token and listings are filtered by
//! it. Lookups by id are **not**: any authenticated caller can read, update or
//! delete any record whose id it knows, and an update hands the record over to
//! the caller. This is the long-standing behavior of the API and is kept
//! deliberately until there is a product decision on tenant isolation.

use thiserror::Error;

use crate::domain::{Identity, ResourceId};
use crate::models::{Resource, ResourceKind};

/// Errors specific to resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("{kind} {id} not found")]
    NotFound { kind: ResourceKind, id: ResourceId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl ResourceError {
    #[must_use]
    pub fn not_found<R: Resource>(id: &ResourceId) -> Self {
        Self::NotFound {
            kind: R::KIND,
            id: id.clone(),
        }
    }
}

impl From<sea_orm::DbErr> for ResourceError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ResourceError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// CRUD over one resource kind on behalf of an authenticated identity.
#[async_trait::async_trait]
pub trait ResourceService<R: Resource>: Send + Sync {
    /// Persists a new record owned by `actor`.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::Validation`] if the fields violate the schema
    /// - [`ResourceError::Database`] on persistence failures
    async fn create(&self, fields: R::Fields, actor: &Identity) -> Result<R, ResourceError>;

    /// Every record stamped with `actor`'s token, in no particular order.
    async fn list_mine(&self, actor: &Identity) -> Result<Vec<R>, ResourceError>;

    /// Looks a record up by id regardless of who owns it.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] if no record has the id.
    async fn get(&self, id: &ResourceId) -> Result<R, ResourceError>;

    /// Replaces every field of the record and re-stamps it to `actor`.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::NotFound`] if no record has the id
    /// - [`ResourceError::Validation`] if the fields violate the schema
    async fn update(
        &self,
        id: &ResourceId,
        fields: R::Fields,
        actor: &Identity,
    ) -> Result<R, ResourceError>;

    /// Hard-deletes the record and returns what was removed.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] if no record has the id.
    async fn delete(&self, id: &ResourceId) -> Result<R, ResourceError>;
}
