//! Identifier types.
//!
//! TriMet sends route numbers, stop ids and vehicle ids as JSON numbers,
//! while browser clients tend to send them back as strings. All identifier
//! types accept either form and normalise to the decimal string.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from its textual form.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(IdVisitor).map(Self)
            }
        }
    };
}

string_id!(
    /// A route identifier, e.g. `"100"` for the MAX Blue Line.
    RouteId,
    "RouteId"
);

string_id!(
    /// A stop (TriMet "location") identifier.
    StopId,
    "StopId"
);

string_id!(
    /// A vehicle identifier.
    VehicleId,
    "VehicleId"
);

/// Accepts a JSON string or integer and yields its string form.
struct IdVisitor;

impl Visitor<'_> for IdVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer identifier")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Err(E::invalid_value(de::Unexpected::Str(v), &self));
        }
        Ok(trimmed.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_from_number() {
        let id: RouteId = serde_json::from_str("100").unwrap();
        assert_eq!(id.as_str(), "100");
    }

    #[test]
    fn deserialize_from_string() {
        let id: StopId = serde_json::from_str("\" 8370 \"").unwrap();
        assert_eq!(id, StopId::new("8370"));
    }

    #[test]
    fn number_and_string_forms_are_equal() {
        let a: StopId = serde_json::from_str("8370").unwrap();
        let b: StopId = serde_json::from_str("\"8370\"").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn reject_empty_and_other_types() {
        assert!(serde_json::from_str::<StopId>("\"\"").is_err());
        assert!(serde_json::from_str::<StopId>("null").is_err());
        assert!(serde_json::from_str::<StopId>("1.5").is_err());
        assert!(serde_json::from_str::<StopId>("[1]").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = VehicleId::new("3204");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"3204\"");
    }

    #[test]
    fn display_and_debug() {
        let id = RouteId::new("100");
        assert_eq!(id.to_string(), "100");
        assert_eq!(format!("{:?}", id), "RouteId(100)");
    }
}
