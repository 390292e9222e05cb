use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, Set};
use tracing::debug;

use super::ResourceRepository;
use crate::domain::{AccessToken, ResourceId};
use crate::entities::{contacts, prelude::*};
use crate::models::Contact;

pub struct ContactRepository {
    conn: DatabaseConnection,
}

impl ContactRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: contacts::Model) -> Contact {
        Contact {
            id: ResourceId::new(model.id),
            name: model.name,
            email: model.email,
            phone_number: model.phone_number,
            address: model.address,
            owner_token: AccessToken::new(model.owner_token),
        }
    }

    fn columns(contact: &Contact) -> contacts::ActiveModel {
        contacts::ActiveModel {
            id: NotSet,
            name: Set(contact.name.clone()),
            email: Set(contact.email.clone()),
            phone_number: Set(contact.phone_number.clone()),
            address: Set(contact.address.clone()),
            owner_token: Set(contact.owner_token.as_str().to_string()),
        }
    }
}

#[async_trait]
impl ResourceRepository<Contact> for ContactRepository {
    async fn insert(&self, contact: &Contact) -> Result<()> {
        let mut active = Self::columns(contact);
        active.id = Set(contact.id.as_str().to_string());

        Contacts::insert(active)
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to insert contact")?;

        debug!("Inserted contact {}", contact.id);
        Ok(())
    }

    async fn list_by_owner(&self, owner: &AccessToken) -> Result<Vec<Contact>> {
        let rows = Contacts::find()
            .filter(contacts::Column::OwnerToken.eq(owner.as_str()))
            .all(&self.conn)
            .await
            .context("Failed to list contacts by owner")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    async fn find(&self, id: &ResourceId) -> Result<Option<Contact>> {
        let row = Contacts::find_by_id(id.as_str())
            .one(&self.conn)
            .await
            .context("Failed to query contact by id")?;

        Ok(row.map(Self::map_model))
    }

    async fn replace(&self, contact: &Contact) -> Result<bool> {
        let result = Contacts::update_many()
            .set(Self::columns(contact))
            .filter(contacts::Column::Id.eq(contact.id.as_str()))
            .exec(&self.conn)
            .await
            .context("Failed to update contact")?;

        Ok(result.rows_affected > 0)
    }

    async fn remove(&self, id: &ResourceId) -> Result<bool> {
        let result = Contacts::delete_by_id(id.as_str())
            .exec(&self.conn)
            .await
            .context("Failed to delete contact")?;

        Ok(result.rows_affected > 0)
    }
}
