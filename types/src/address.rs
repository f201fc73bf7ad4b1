//! Account identity used by the ledgers and the reward engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An account identifier: a staker, the reward funder, or the engine's own
/// custody account.
///
/// Addresses are opaque strings; no checksum or prefix is enforced.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An address is well-formed when it is non-empty and has no surrounding whitespace.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0.trim() == self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_raw_string() {
        assert_eq!(Address::new("alice").to_string(), "alice");
    }

    #[test]
    fn validity() {
        assert!(Address::new("pool").is_valid());
        assert!(!Address::new("").is_valid());
        assert!(!Address::new(" bob").is_valid());
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Address::new("carol")).unwrap();
        assert_eq!(json, "\"carol\"");
    }
}
