//! Domain primitives for identities and the resources they own.
//!
//! Tokens and resource ids are both plain strings on the wire and in the
//! database. The newtypes keep them from being mixed up in service code.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// RFC 4648 base64url alphabet.
const URL_SAFE_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Length of a generated resource id. 43 base64url characters carry 256 bits.
pub const RESOURCE_ID_LEN: usize = 43;

/// Opaque bearer secret issued to an identity at registration.
///
/// The token never rotates. It is also the ownership stamp carried by every
/// resource, so whoever holds it can act as (and on behalf of) the identity.
///
/// `Debug` is redacted so tokens do not end up in logs by accident.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Generates a token of `byte_len` random bytes rendered as lowercase hex.
    #[must_use]
    pub fn generate(byte_len: usize) -> Self {
        use std::fmt::Write;

        let mut rng = rand::rng();
        let bytes: Vec<u8> = (0..byte_len).map(|_| rng.random()).collect();

        Self(
            bytes
                .iter()
                .fold(String::with_capacity(byte_len * 2), |mut acc, b| {
                    let _ = write!(acc, "{b:02x}");
                    acc
                }),
        )
    }

    #[must_use]
    pub const fn new(token: String) -> Self {
        Self(token)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Identifier of a contact or car.
///
/// # Examples
///
/// ```rust
/// use phonebook::domain::{ResourceId, RESOURCE_ID_LEN};
///
/// let id = ResourceId::generate();
/// assert_eq!(id.as_str().len(), RESOURCE_ID_LEN);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Generates a fresh URL-safe random id.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let id = (0..RESOURCE_ID_LEN)
            .map(|_| char::from(URL_SAFE_ALPHABET[rng.random_range(0..URL_SAFE_ALPHABET.len())]))
            .collect();
        Self(id)
    }

    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An authenticated principal.
///
/// Carries everything about a user except the password hash, which never
/// leaves the identity repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub access_token: AccessToken,
    pub g_auth_verify: bool,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_is_hex_of_requested_length() {
        let token = AccessToken::generate(24);
        assert_eq!(token.as_str().len(), 48);
        assert!(
            token
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn access_tokens_are_distinct() {
        assert_ne!(AccessToken::generate(24), AccessToken::generate(24));
    }

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("secret".to_string());
        assert_eq!(format!("{token:?}"), "AccessToken(***)");
    }

    #[test]
    fn resource_id_is_url_safe() {
        let id = ResourceId::generate();
        assert_eq!(id.as_str().len(), RESOURCE_ID_LEN);
        assert!(
            id.as_str()
                .bytes()
                .all(|b| URL_SAFE_ALPHABET.contains(&b))
        );
    }

    #[test]
    fn resource_id_serializes_as_plain_string() {
        let id = ResourceId::new("abc-_123".to_string());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc-_123\"");
        let back: ResourceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
