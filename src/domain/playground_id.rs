//! Type-safe playground identifier.
//!
//! [`PlaygroundId`] is a newtype wrapper around [`uuid::Uuid`] (v4) providing
//! type safety so that playground identifiers cannot be confused with other
//! UUIDs (e.g. history record IDs).

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unique identifier for a playground.
///
/// Wraps a UUID v4. Generated once at playground creation time and immutable
/// thereafter. Used as the foreign key on every query-history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PlaygroundId(uuid::Uuid);

impl PlaygroundId {
    /// Creates a new random `PlaygroundId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `PlaygroundId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for PlaygroundId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlaygroundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for PlaygroundId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl From<PlaygroundId> for uuid::Uuid {
    fn from(id: PlaygroundId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        let a = PlaygroundId::new();
        let b = PlaygroundId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_uuid_format() {
        let id = PlaygroundId::new();
        let s = format!("{id}");
        assert_eq!(s.len(), 36); // UUID string length
        assert!(s.contains('-'));
    }

    #[test]
    fn serde_round_trip() {
        let id = PlaygroundId::new();
        let json = serde_json::to_string(&id).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        let deserialized: PlaygroundId = serde_json::from_str(&json).ok().unwrap_or_else(|| {
            panic!("deserialization failed");
        });
        assert_eq!(id, deserialized);
    }

    #[test]
    fn from_uuid_round_trip() {
        let uuid = uuid::Uuid::new_v4();
        let id = PlaygroundId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }
}
