use serde::de::DeserializeOwned;
use std::fmt;

use crate::domain::{AccessToken, ResourceId};

/// The kinds of owned records the service manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Contact,
    Car,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contact => f.write_str("Contact"),
            Self::Car => f.write_str("Car"),
        }
    }
}

/// A record owned by an identity through its access token.
///
/// Contacts and cars share the same lifecycle. Implementors only describe
/// their payload and how to build a record from it; ownership stamping, id
/// generation and lookups live in the generic resource service.
pub trait Resource: Clone + Send + Sync + 'static {
    const KIND: ResourceKind;

    /// Request payload for create and update. Every field is replaced on update.
    type Fields: DeserializeOwned + Send + Sync + 'static;

    /// Checks the payload against the storage schema (nullability, lengths).
    fn validate(fields: &Self::Fields) -> Result<(), String>;

    fn assemble(id: ResourceId, fields: Self::Fields, owner_token: AccessToken) -> Self;

    fn id(&self) -> &ResourceId;

    fn owner_token(&self) -> &AccessToken;
}
