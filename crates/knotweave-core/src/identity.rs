//! Canonical identity of a `(unit, state)` pair.
//!
//! Identities are human-readable and independent of insertion order:
//!
//! ```text
//! unit|name1=bool1,name2=bool2,...
//! ```
//!
//! with variable names in lexicographic order. Downstream consumers and test
//! fixtures pin these exact strings.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::StateVector;

/// Canonical node identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Encode `unit` and `state` canonically.
    pub fn canonical(unit: &str, state: &StateVector) -> Self {
        let mut id = String::with_capacity(unit.len() + 1 + state.len() * 16);
        id.push_str(unit);
        id.push('|');
        // StateVector iterates in name order.
        for (i, (name, value)) in state.iter().enumerate() {
            if i > 0 {
                id.push(',');
            }
            id.push_str(name);
            id.push('=');
            id.push_str(if value { "true" } else { "false" });
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The unit part of the identity.
    pub fn unit_name(&self) -> &str {
        self.0.split_once('|').map_or(self.0.as_str(), |(unit, _)| unit)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_sorted_state() {
        let state = StateVector::new()
            .with("has_room_key", true)
            .with("global_quest_active", false);
        let id = NodeId::canonical("room1", &state);
        assert_eq!(
            id.as_str(),
            "room1|global_quest_active=false,has_room_key=true"
        );
        assert_eq!(id.unit_name(), "room1");
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let a = StateVector::new().with("x", true).with("y", false);
        let b = StateVector::new().with("y", false).with("x", true);
        assert_eq!(NodeId::canonical("u", &a), NodeId::canonical("u", &b));
    }

    #[test]
    fn unit_or_value_change_changes_identity() {
        let s = StateVector::new().with("x", true);
        let flipped = StateVector::new().with("x", false);
        assert_ne!(NodeId::canonical("u", &s), NodeId::canonical("v", &s));
        assert_ne!(NodeId::canonical("u", &s), NodeId::canonical("u", &flipped));
    }

    #[test]
    fn empty_state() {
        let id = NodeId::canonical("index", &StateVector::new());
        assert_eq!(id.to_string(), "index|");
    }
}
