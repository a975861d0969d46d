//! Newtype domain identifiers.
//!
//! Every domain concept that has an identity is represented as a distinct newtype
//! wrapping a primitive. This prevents accidentally interchanging, for example,
//! a Statuspage [`PageId`] with a Front [`AppUid`] even though both are strings
//! under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — String-backed (assigned by Statuspage / Front)
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies the Statuspage page that emitted a webhook.
    PageId
}

string_id! {
    /// Identifies a Front link record returned by `POST /links`.
    LinkId
}

// ---------------------------------------------------------------------------

/// Length of every Front application UID.
pub const APP_UID_LEN: usize = 16;

/// Identifies the Front application whose app triggers receive our events.
///
/// Front application UIDs are exactly [`APP_UID_LEN`] characters long. The
/// value is interpolated into request paths, so `/` is rejected as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppUid(String);

impl AppUid {
    /// Creates an [`AppUid`], returning `None` unless `value` has exactly
    /// [`APP_UID_LEN`] characters and no path separators.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.chars().count() == APP_UID_LEN && !v.contains('/') {
            Some(Self(v))
        } else {
            None
        }
    }

    /// Returns the UID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AppUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers — UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single inbound webhook delivery.
///
/// Generated fresh for every request the listener accepts; recorded on the
/// handling span so all activity from one delivery can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliveryId(Uuid);

impl DeliveryId {
    /// Generates a new random delivery identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_ids_reject_empty_values() {
        assert!(PageId::new("").is_none());
        assert_eq!(PageId::new("kctbh9vrtdwd").unwrap().as_str(), "kctbh9vrtdwd");
    }

    #[test]
    fn app_uid_requires_exact_length() {
        assert!(AppUid::new("abcdef0123456789").is_some());
        assert!(AppUid::new("abcdef012345678").is_none());
        assert!(AppUid::new("abcdef01234567890").is_none());
        assert!(AppUid::new("abcdef01234567/9").is_none());
    }

    #[test]
    fn delivery_ids_are_unique() {
        assert_ne!(DeliveryId::new_random(), DeliveryId::new_random());
    }
}
