//! Document identifiers.

use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Store-generated document id.
///
/// Wraps a BSON object id; rendered to clients as its 24-digit hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(ObjectId);

/// Error returned when a string is not a valid document id.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid id: {0}")]
pub struct InvalidId(pub String);

impl Id {
    /// Generate a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Underlying BSON object id.
    #[inline]
    #[must_use]
    pub const fn object_id(self) -> ObjectId {
        self.0
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for Id {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl From<Id> for ObjectId {
    fn from(id: Id) -> Self {
        id.0
    }
}

impl FromStr for Id {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s.trim())
            .map(Self)
            .map_err(|_| InvalidId(s.to_string()))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
