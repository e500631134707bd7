//! Entity identity shared by every programme node.
//!
//! # Invariants
//! - Numeric wire ids are canonicalized to their decimal string, so `7` and
//!   `"7"` name the same node.
//! - Placeholder values (`""`, `"undefined"`, `"null"`) never reach the tree:
//!   the normalizer drops them and command preconditions reject them.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const PLACEHOLDER_IDS: &[&str] = &["", "undefined", "null"];

/// Opaque identifier of a programme node or speaker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wraps a caller-supplied id without validation.
    ///
    /// Use [`EntityId::parse`] for untrusted input; commands re-check
    /// [`EntityId::is_placeholder`] before any remote call.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Parses a wire id, returning `None` for placeholder values.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if is_placeholder(trimmed) {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether this id is empty or a stringified missing value.
    pub fn is_placeholder(&self) -> bool {
        is_placeholder(self.0.trim())
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER_IDS
        .iter()
        .any(|placeholder| value.eq_ignore_ascii_case(placeholder))
}

#[cfg(test)]
mod tests {
    use super::EntityId;

    #[test]
    fn parse_rejects_placeholders() {
        assert_eq!(EntityId::parse("  "), None);
        assert_eq!(EntityId::parse("undefined"), None);
        assert_eq!(EntityId::parse("NULL"), None);
    }

    #[test]
    fn parse_trims_and_keeps_value() {
        let id = EntityId::parse(" day-1 ").expect("non-placeholder id should parse");
        assert_eq!(id.as_str(), "day-1");
    }

    #[test]
    fn numeric_ids_match_their_string_form() {
        assert_eq!(EntityId::from(42_u64), EntityId::from("42"));
    }

    #[test]
    fn unchecked_placeholder_is_detected() {
        assert!(EntityId::new("undefined").is_placeholder());
        assert!(!EntityId::new("evt-9").is_placeholder());
    }
}
