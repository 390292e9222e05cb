pub mod car;
pub mod contact;
pub mod user;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{AccessToken, ResourceId};
use crate::models::Resource;

/// Persistence operations shared by every owned resource kind.
#[async_trait]
pub trait ResourceRepository<R: Resource>: Send + Sync {
    async fn insert(&self, record: &R) -> Result<()>;

    async fn list_by_owner(&self, owner: &AccessToken) -> Result<Vec<R>>;

    /// Looks a record up by id alone; ownership is not checked.
    async fn find(&self, id: &ResourceId) -> Result<Option<R>>;

    /// Overwrites every column of the row with the record's id.
    /// Returns `false` when no such row exists.
    async fn replace(&self, record: &R) -> Result<bool>;

    /// Returns `false` when no such row exists.
    async fn remove(&self, id: &ResourceId) -> Result<bool>;
}
