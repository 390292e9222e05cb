//! Wire representations.
//!
//! Every outbound type here is a projection: records carry their owner's
//! access token and identities carry a password hash in storage, and neither
//! has a field to land in on the way out.

use serde::{Deserialize, Serialize};

use crate::domain::{Identity, ResourceId};
use crate::models::{Car, Contact, Resource};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Maps a stored record to its external view.
pub trait Projection: Resource {
    type Dto: Serialize + Send + From<Self>;
}

#[derive(Debug, Serialize)]
pub struct ContactDto {
    pub id: ResourceId,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

impl From<Contact> for ContactDto {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.name,
            email: contact.email,
            phone_number: contact.phone_number,
            address: contact.address,
        }
    }
}

impl Projection for Contact {
    type Dto = ContactDto;
}

#[derive(Debug, Serialize)]
pub struct CarDto {
    pub id: ResourceId,
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub year: Option<i32>,
}

impl From<Car> for CarDto {
    fn from(car: Car) -> Self {
        Self {
            id: car.id,
            make: car.make,
            model: car.model,
            color: car.color,
            year: car.year,
        }
    }
}

impl Projection for Car {
    type Dto = CarDto;
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileDto {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: String,
}

impl From<Identity> for ProfileDto {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            email: identity.email,
            first_name: identity.first_name,
            last_name: identity.last_name,
            created_at: identity.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthReadinessChecks {
    pub database: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthReadyResponse {
    pub ready: bool,
    pub checks: HealthReadinessChecks,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccessToken;

    #[test]
    fn contact_projection_drops_owner_token() {
        let contact = Contact {
            id: ResourceId::new("c1".to_string()),
            name: "Alice".to_string(),
            email: Some("a@x.com".to_string()),
            phone_number: None,
            address: Some("1 St".to_string()),
            owner_token: AccessToken::new("secret-token".to_string()),
        };

        let json = serde_json::to_value(ContactDto::from(contact)).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 5);
        assert!(json.get("owner_token").is_none());
        assert!(!json.to_string().contains("secret-token"));
        assert_eq!(json["phone_number"], serde_json::Value::Null);
    }

    #[test]
    fn car_projection_drops_owner_token() {
        let car = Car {
            id: ResourceId::new("c1".to_string()),
            make: Some("Toyota".to_string()),
            model: None,
            color: Some("Blue".to_string()),
            year: Some(2020),
            owner_token: AccessToken::new("secret-token".to_string()),
        };

        let json = serde_json::to_value(CarDto::from(car)).unwrap();
        assert!(json.get("owner_token").is_none());
        assert!(!json.to_string().contains("secret-token"));
        assert_eq!(json["year"], 2020);
    }

    #[test]
    fn profile_never_exposes_token() {
        let identity = Identity {
            id: "u1".to_string(),
            email: "a@x.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            access_token: AccessToken::new("secret-token".to_string()),
            g_auth_verify: false,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
        };

        let json = serde_json::to_string(&ProfileDto::from(identity)).unwrap();
        assert!(!json.contains("secret-token"));
        assert!(!json.contains("password"));
    }
}
