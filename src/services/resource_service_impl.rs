//! Repository-backed implementation of the `ResourceService` trait.

use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::ResourceRepository;
use crate::domain::{Identity, ResourceId};
use crate::models::Resource;
use crate::services::resource_service::{ResourceError, ResourceService};

pub struct DefaultResourceService<R: Resource> {
    repo: Arc<dyn ResourceRepository<R>>,
    _kind: PhantomData<fn() -> R>,
}

impl<R: Resource> DefaultResourceService<R> {
    #[must_use]
    pub fn new(repo: Arc<dyn ResourceRepository<R>>) -> Self {
        Self {
            repo,
            _kind: PhantomData,
        }
    }

    async fn load(&self, id: &ResourceId) -> Result<R, ResourceError> {
        self.repo
            .find(id)
            .await?
            .ok_or_else(|| ResourceError::not_found::<R>(id))
    }
}

#[async_trait]
impl<R: Resource> ResourceService<R> for DefaultResourceService<R> {
    async fn create(&self, fields: R::Fields, actor: &Identity) -> Result<R, ResourceError> {
        R::validate(&fields).map_err(ResourceError::Validation)?;

        let record = R::assemble(ResourceId::generate(), fields, actor.access_token.clone());
        self.repo.insert(&record).await?;

        info!(kind = %R::KIND, id = %record.id(), user_id = %actor.id, "Resource created");
        Ok(record)
    }

    async fn list_mine(&self, actor: &Identity) -> Result<Vec<R>, ResourceError> {
        Ok(self.repo.list_by_owner(&actor.access_token).await?)
    }

    async fn get(&self, id: &ResourceId) -> Result<R, ResourceError> {
        self.load(id).await
    }

    async fn update(
        &self,
        id: &ResourceId,
        fields: R::Fields,
        actor: &Identity,
    ) -> Result<R, ResourceError> {
        R::validate(&fields).map_err(ResourceError::Validation)?;

        let existing = self.load(id).await?;
        if existing.owner_token() != &actor.access_token {
            warn!(
                kind = %R::KIND,
                id = %id,
                user_id = %actor.id,
                "Resource reassigned to a different owner on update"
            );
        }

        let record = R::assemble(id.clone(), fields, actor.access_token.clone());
        if !self.repo.replace(&record).await? {
            // Deleted between the lookup and the write.
            return Err(ResourceError::not_found::<R>(id));
        }

        info!(kind = %R::KIND, id = %id, user_id = %actor.id, "Resource updated");
        Ok(record)
    }

    async fn delete(&self, id: &ResourceId) -> Result<R, ResourceError> {
        let existing = self.load(id).await?;

        if !self.repo.remove(id).await? {
            return Err(ResourceError::not_found::<R>(id));
        }

        info!(kind = %R::KIND, id = %id, "Resource deleted");
        Ok(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecurityConfig;
    use crate::db::{NewUser, Store};
    use crate::models::{Car, CarFields, Contact, ContactFields};

    struct Fixture {
        store: Store,
        contacts: DefaultResourceService<Contact>,
        cars: DefaultResourceService<Car>,
    }

    async fn fixture() -> Fixture {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let contacts = DefaultResourceService::new(Arc::new(store.contacts()));
        let cars = DefaultResourceService::new(Arc::new(store.cars()));
        Fixture {
            store,
            contacts,
            cars,
        }
    }

    async fn user(store: &Store, email: &str) -> Identity {
        let security = SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        };
        store
            .register_user(
                NewUser {
                    email: email.to_string(),
                    first_name: String::new(),
                    last_name: String::new(),
                },
                "pw",
                &security,
            )
            .await
            .unwrap()
    }

    fn alice() -> ContactFields {
        ContactFields {
            name: "Alice".to_string(),
            email: Some("a@x.com".to_string()),
            phone_number: Some("555".to_string()),
            address: Some("1 St".to_string()),
        }
    }

    fn corolla(year: i32) -> CarFields {
        CarFields {
            make: Some("Toyota".to_string()),
            model: Some("Corolla".to_string()),
            color: None,
            year: Some(year),
        }
    }

    #[tokio::test]
    async fn create_stamps_owner_and_lists_it() {
        let fx = fixture().await;
        let a = user(&fx.store, "a@x.com").await;

        let contact = fx.contacts.create(alice(), &a).await.unwrap();
        assert_eq!(contact.owner_token, a.access_token);

        let mine = fx.contacts.list_mine(&a).await.unwrap();
        assert_eq!(mine, vec![contact]);
    }

    #[tokio::test]
    async fn list_mine_only_returns_own_records() {
        let fx = fixture().await;
        let a = user(&fx.store, "a@x.com").await;
        let b = user(&fx.store, "b@x.com").await;

        fx.cars.create(corolla(2001), &a).await.unwrap();
        fx.cars.create(corolla(2002), &a).await.unwrap();
        let theirs = fx.cars.create(corolla(2003), &b).await.unwrap();

        let mine = fx.cars.list_mine(&a).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|car| car.owner_token == a.access_token));

        let mut years: Vec<_> = mine.iter().filter_map(|car| car.year).collect();
        years.sort_unstable();
        assert_eq!(years, vec![2001, 2002]);

        assert_eq!(fx.cars.list_mine(&b).await.unwrap(), vec![theirs]);
    }

    // Known gap: lookups by id ignore ownership.
    #[tokio::test]
    async fn get_by_id_crosses_tenants() {
        let fx = fixture().await;
        let a = user(&fx.store, "a@x.com").await;
        let _b = user(&fx.store, "b@x.com").await;

        let contact = fx.contacts.create(alice(), &a).await.unwrap();
        let fetched = fx.contacts.get(&contact.id).await.unwrap();
        assert_eq!(fetched, contact);
    }

    // Known gap: an update by another user takes ownership of the record.
    #[tokio::test]
    async fn update_restamps_owner_to_caller() {
        let fx = fixture().await;
        let a = user(&fx.store, "a@x.com").await;
        let b = user(&fx.store, "b@x.com").await;

        let car = fx.cars.create(corolla(2001), &a).await.unwrap();
        let updated = fx.cars.update(&car.id, corolla(2010), &b).await.unwrap();

        assert_eq!(updated.id, car.id);
        assert_eq!(updated.year, Some(2010));
        assert_eq!(updated.owner_token, b.access_token);
        assert!(fx.cars.list_mine(&a).await.unwrap().is_empty());
        assert_eq!(fx.cars.list_mine(&b).await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found() {
        let fx = fixture().await;
        let a = user(&fx.store, "a@x.com").await;

        let result = fx
            .contacts
            .update(&ResourceId::new("missing".to_string()), alice(), &a)
            .await;
        assert!(matches!(result, Err(ResourceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let fx = fixture().await;
        let a = user(&fx.store, "a@x.com").await;

        let contact = fx.contacts.create(alice(), &a).await.unwrap();
        let deleted = fx.contacts.delete(&contact.id).await.unwrap();
        assert_eq!(deleted, contact);

        assert!(matches!(
            fx.contacts.get(&contact.id).await,
            Err(ResourceError::NotFound { .. })
        ));
        assert!(matches!(
            fx.contacts.delete(&contact.id).await,
            Err(ResourceError::NotFound { .. })
        ));
    }

    // Delete by id does not check the owner; this pins the current behavior.
    #[tokio::test]
    async fn delete_crosses_tenants() {
        let fx = fixture().await;
        let a = user(&fx.store, "a@x.com").await;
        let b = user(&fx.store, "b@x.com").await;

        let contact = fx.contacts.create(alice(), &a).await.unwrap();
        let deleted = fx.contacts.delete(&contact.id).await.unwrap();

        assert_eq!(deleted.owner_token, a.access_token);
        assert!(fx.contacts.list_mine(&a).await.unwrap().is_empty());
        assert!(fx.contacts.list_mine(&b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_fields_never_reach_the_store() {
        let fx = fixture().await;
        let a = user(&fx.store, "a@x.com").await;

        let result = fx.cars.create(corolla(123_456), &a).await;
        assert!(matches!(result, Err(ResourceError::Validation(_))));
        assert!(fx.cars.list_mine(&a).await.unwrap().is_empty());
    }
}
