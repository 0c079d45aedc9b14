//! Attribute values
//!
//! Provides [`AttrValue`], the closed set of value shapes a node attribute
//! can hold: an opaque scalar/string, or a reference into the node table.
//!
//! The wire format stores every attribute value as a string and encodes
//! table references as decimal strings, so deserialization always yields
//! [`AttrValue::Str`]. [`AttrValue::Index`] is produced by migration rules
//! that synthesize references; it serializes back to the decimal form.

use crate::index::NodeIndex;
use std::fmt::{self, Display, Formatter};

/// A single node attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Scalar or string payload, kept verbatim
    Str(String),

    /// Reference to another entry in the node table
    Index(NodeIndex),
}

impl AttrValue {
    /// Create a string value
    #[inline]
    #[must_use]
    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    /// Create a table reference
    #[inline]
    #[must_use]
    pub fn index(index: NodeIndex) -> Self {
        Self::Index(index)
    }

    /// Borrow the string payload, if this is a string value
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            Self::Index(_) => None,
        }
    }

    /// Interpret this value as a table reference
    ///
    /// Accepts both the typed form and the legacy decimal-string form the
    /// wire uses for references produced before migration.
    #[inline]
    #[must_use]
    pub fn as_index(&self) -> Option<NodeIndex> {
        match self {
            Self::Index(idx) => Some(*idx),
            Self::Str(s) => s.parse().ok(),
        }
    }

    /// Whether this value is a typed table reference
    #[inline]
    #[must_use]
    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }
}

impl Display for AttrValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            Self::Index(idx) => write!(f, "{idx}"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<NodeIndex> for AttrValue {
    fn from(index: NodeIndex) -> Self {
        Self::Index(index)
    }
}

impl serde::Serialize for AttrValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // References serialize as decimal strings, per the wire contract.
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for AttrValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct AttrValueVisitor;

        impl serde::de::Visitor<'_> for AttrValueVisitor {
            type Value = AttrValue;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("a scalar attribute value")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(AttrValue::str(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(AttrValue::str(value.to_string()))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(AttrValue::str(value.to_string()))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(AttrValue::str(value.to_string()))
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(AttrValue::str(value.to_string()))
            }
        }

        deserializer.deserialize_any(AttrValueVisitor)
    }
}
