use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, Set};
use tracing::debug;

use super::ResourceRepository;
use crate::domain::{AccessToken, ResourceId};
use crate::entities::{cars, prelude::*};
use crate::models::Car;

pub struct CarRepository {
    conn: DatabaseConnection,
}

impl CarRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: cars::Model) -> Car {
        Car {
            id: ResourceId::new(model.id),
            make: model.make,
            model: model.model,
            color: model.color,
            year: model.year,
            owner_token: AccessToken::new(model.owner_token),
        }
    }

    fn columns(car: &Car) -> cars::ActiveModel {
        cars::ActiveModel {
            id: NotSet,
            make: Set(car.make.clone()),
            model: Set(car.model.clone()),
            color: Set(car.color.clone()),
            year: Set(car.year),
            owner_token: Set(car.owner_token.as_str().to_string()),
        }
    }
}

#[async_trait]
impl ResourceRepository<Car> for CarRepository {
    async fn insert(&self, car: &Car) -> Result<()> {
        let mut active = Self::columns(car);
        active.id = Set(car.id.as_str().to_string());

        Cars::insert(active)
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to insert car")?;

        debug!("Inserted car {}", car.id);
        Ok(())
    }

    async fn list_by_owner(&self, owner: &AccessToken) -> Result<Vec<Car>> {
        let rows = Cars::find()
            .filter(cars::Column::OwnerToken.eq(owner.as_str()))
            .all(&self.conn)
            .await
            .context("Failed to list cars by owner")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    async fn find(&self, id: &ResourceId) -> Result<Option<Car>> {
        let row = Cars::find_by_id(id.as_str())
            .one(&self.conn)
            .await
            .context("Failed to query car by id")?;

        Ok(row.map(Self::map_model))
    }

    async fn replace(&self, car: &Car) -> Result<bool> {
        let result = Cars::update_many()
            .set(Self::columns(car))
            .filter(cars::Column::Id.eq(car.id.as_str()))
            .exec(&self.conn)
            .await
            .context("Failed to update car")?;

        Ok(result.rows_affected > 0)
    }

    async fn remove(&self, id: &ResourceId) -> Result<bool> {
        let result = Cars::delete_by_id(id.as_str())
            .exec(&self.conn)
            .await
            .context("Failed to delete car")?;

        Ok(result.rows_affected > 0)
    }
}
