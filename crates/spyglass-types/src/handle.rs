//! Opaque element handles.
//!
//! A [`Handle`] identifies one live UI node for the lifetime of a single
//! inspector endpoint. Handles are assigned on first observation and are
//! never reused within a session; clients must treat them as opaque,
//! session-scoped tokens and never parse them.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque, session-scoped identifier for a live UI node (e.g. `elem_1f`).
///
/// Uses `Arc<str>` internally so cloning is an atomic increment instead of
/// a heap allocation; handles are cloned on every tree walk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle(Arc<str>);

impl Handle {
    /// Wrap a raw handle token.
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self(token.into())
    }

    /// The canonical token for the `n`-th element observed in a session.
    pub fn element(n: u64) -> Self {
        Self(format!("elem_{n:x}").into())
    }

    /// Borrow as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Handle {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Handle {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for Handle {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Handle {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl std::borrow::Borrow<str> for Handle {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Serialize for Handle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Handle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Handle::new(s))
    }
}
