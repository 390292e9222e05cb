use serde::Deserialize;

use super::{Resource, ResourceKind, check_len, nullable};
use crate::domain::{AccessToken, ResourceId};

pub const MAKE_MAX: usize = 150;
pub const MODEL_MAX: usize = 200;
pub const COLOR_MAX: usize = 150;

/// `year` is a NUMERIC(4) column.
pub const YEAR_LIMIT: i32 = 9999;

/// Body of `POST /cars` and `PUT /cars/{id}`. Every column is nullable but
/// every key must be present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CarFields {
    #[serde(deserialize_with = "nullable")]
    pub make: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub model: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub color: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    pub id: ResourceId,
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub year: Option<i32>,
    pub owner_token: AccessToken,
}

impl Resource for Car {
    const KIND: ResourceKind = ResourceKind::Car;

    type Fields = CarFields;

    fn validate(fields: &CarFields) -> Result<(), String> {
        check_len("make", fields.make.as_deref(), MAKE_MAX)?;
        check_len("model", fields.model.as_deref(), MODEL_MAX)?;
        check_len("color", fields.color.as_deref(), COLOR_MAX)?;

        match fields.year {
            Some(year) if !(-YEAR_LIMIT..=YEAR_LIMIT).contains(&year) => Err(format!(
                "year must have at most 4 digits (got {year})"
            )),
            _ => Ok(()),
        }
    }

    fn assemble(id: ResourceId, fields: CarFields, owner_token: AccessToken) -> Self {
        Self {
            id,
            make: fields.make,
            model: fields.model,
            color: fields.color,
            year: fields.year,
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
