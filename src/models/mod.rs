pub mod car;
pub mod contact;
pub mod resource;

pub use car::{Car, CarFields};
pub use contact::{Contact, ContactFields};
pub use resource::{Resource, ResourceKind};

use serde::{Deserialize, Deserializer};

/// Deserializes an `Option<T>` whose key must be present.
///
/// Plain `Option` fields silently default to `None` when the key is missing;
/// routing through `deserialize_with` makes serde report `missing field`
/// instead, while still accepting an explicit `null`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Rejects strings longer than the backing column allows.
pub(crate) fn check_len(field: &str, value: Option<&str>, max: usize) -> Result<(), String> {
    match value {
        Some(v) if v.chars().count() > max => Err(format!(
            "{field} must be at most {max} characters (got {})",
            v.chars().count()
        )),
        _ => Ok(()),
    }
}
