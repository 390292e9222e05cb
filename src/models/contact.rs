use serde::Deserialize;

use super::{Resource, ResourceKind, check_len, nullable};
use crate::domain::{AccessToken, ResourceId};

pub const NAME_MAX: usize = 150;
pub const EMAIL_MAX: usize = 200;
pub const PHONE_NUMBER_MAX: usize = 20;
pub const ADDRESS_MAX: usize = 200;

/// Body of `POST /contacts` and `PUT /contacts/{id}`.
///
/// All four keys are required; only `name` is non-nullable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactFields {
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub email: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub phone_number: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ResourceId,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub owner_token: AccessToken,
}

impl Resource for Contact {
    const KIND: ResourceKind = ResourceKind::Contact;

    type Fields = ContactFields;

    fn validate(fields: &ContactFields) -> Result<(), String> {
        check_len("name", Some(&fields.name), NAME_MAX)?;
        check_len("email", fields.email.as_deref(), EMAIL_MAX)?;
        check_len("phone_number", fields.phone_number.as_deref(), PHONE_NUMBER_MAX)?;
        check_len("address", fields.address.as_deref(), ADDRESS_MAX)
    }

    fn assemble(id: ResourceId, fields: ContactFields, owner_token: AccessToken) -> Self {
        Self {
            id,
            name: fields.name,
            email: fields.email,
            phone_number: fields.phone_number,
            address: fields.address,
            owner_token,
        }
    }

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn owner_token(&self) -> &AccessToken {
        &self.owner_token
    }
}
