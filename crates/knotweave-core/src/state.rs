//! Boolean state vectors, variable classes, and the transition rule.
//!
//! Every declared variable belongs to exactly one [`VarClass`]. The class is
//! resolved once into a [`VarTable`] before exploration starts, so the
//! monotonicity and purge rules are a plain match on the tag.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SyntaxError;

/// Mutation discipline of a state variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VarClass {
    /// Free to flip in either direction.
    Global,
    /// Monotonic: once true, stays true.
    Flag,
    /// Scene-scoped: reset to false on every scene change.
    Local,
}

impl fmt::Display for VarClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarClass::Global => write!(f, "global"),
            VarClass::Flag => write!(f, "flag"),
            VarClass::Local => write!(f, "local"),
        }
    }
}

/// Variable names as declared in a script header, one set per class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declarations {
    /// Plain variables, freely set and cleared.
    pub global: BTreeSet<String>,
    /// Variables that can be set but never cleared.
    pub flag: BTreeSet<String>,
    /// Variables reset to false on every scene change.
    pub local: BTreeSet<String>,
}

impl Declarations {
    /// Create an empty declaration set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` with the given class.
    pub fn declare(&mut self, name: impl Into<String>, class: VarClass) {
        let name = name.into();
        match class {
            VarClass::Global => self.global.insert(name),
            VarClass::Flag => self.flag.insert(name),
            VarClass::Local => self.local.insert(name),
        };
    }

    /// Builder-style [`declare`](Self::declare).
    pub fn with(mut self, name: impl Into<String>, class: VarClass) -> Self {
        self.declare(name, class);
        self
    }

    /// Names that appear in more than one class set, sorted.
    pub fn overlaps(&self) -> Vec<&str> {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for name in self.global.iter().chain(&self.flag).chain(&self.local) {
            *seen.entry(name.as_str()).or_default() += 1;
        }
        seen.into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name)
            .collect()
    }

    /// Total number of distinct declared names.
    pub fn len(&self) -> usize {
        self.global
            .iter()
            .chain(&self.flag)
            .chain(&self.local)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// True when nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.flag.is_empty() && self.local.is_empty()
    }
}

/// A full assignment of boolean values to variable names.
///
/// Ordered by name, so iteration and serialization are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateVector(BTreeMap<String, bool>);

impl StateVector {
    /// Create an empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `name`; absent names read as false.
    pub fn get(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    /// Whether `name` has an entry at all.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Set `name` to `value`.
    pub fn set(&mut self, name: impl Into<String>, value: bool) {
        self.0.insert(name.into(), value);
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: bool) -> Self {
        self.set(name, value);
        self
    }

    /// Iterate `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, bool)> for StateVector {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A single assignment `name = value` carried by a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    /// Variable to assign.
    pub name: String,
    /// Value assigned to it.
    pub value: bool,
}

impl Mutation {
    pub fn new(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

impl FromStr for Mutation {
    type Err = SyntaxError;

    /// Parse `name = true|false`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| SyntaxError::MissingAssignment(s.trim().to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(SyntaxError::EmptyName(s.trim().to_string()));
        }
        Ok(Self::new(name, parse_bool(value)?))
    }
}

/// Parse a `true` / `false` literal, ignoring surrounding whitespace.
pub(crate) fn parse_bool(s: &str) -> Result<bool, SyntaxError> {
    match s.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(SyntaxError::BadLiteral(other.to_string())),
    }
}

/// Per-variable class lookup, resolved once per build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarTable {
    classes: BTreeMap<String, VarClass>,
}

impl VarTable {
    /// Resolve declarations into one class per name.
    ///
    /// A name declared in several sets takes the first of flag, local,
    /// global.
    pub fn new(decls: &Declarations) -> Self {
        let mut classes = BTreeMap::new();
        for (set, class) in [
            (&decls.global, VarClass::Global),
            (&decls.local, VarClass::Local),
            (&decls.flag, VarClass::Flag),
        ] {
            for name in set {
                classes.insert(name.clone(), class);
            }
        }
        Self { classes }
    }

    /// Class of `name`. Undeclared names behave as globals.
    pub fn class_of(&self, name: &str) -> VarClass {
        self.classes.get(name).copied().unwrap_or(VarClass::Global)
    }

    /// Whether `name` was declared in any class.
    pub fn is_declared(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Every declared name with its class, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, VarClass)> {
        self.classes.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Names of all local-class variables.
    pub fn locals(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, class)| *class == VarClass::Local)
            .map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The entry state: every declared variable false.
    pub fn initial_state(&self) -> StateVector {
        self.classes.keys().map(|name| (name.clone(), false)).collect()
    }

    /// Apply `mutations` in order to a copy of `state`.
    ///
    /// Clearing a flag is ignored, so a flag that is true before or becomes
    /// true anywhere in the list stays true. Undeclared names are recorded.
    pub fn apply(&self, state: &StateVector, mutations: &[Mutation]) -> StateVector {
        let mut next = state.clone();
        for m in mutations {
            if self.class_of(&m.name) == VarClass::Flag && !m.value {
                continue;
            }
            next.set(m.name.clone(), m.value);
        }
        next
    }

    /// Force every local variable in `state` to false.
    pub fn purge_locals(&self, state: &mut StateVector) {
        for name in self.locals() {
            state.set(name, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> VarTable {
        let decls = Declarations::new()
            .with("door_open", VarClass::Global)
            .with("met_king", VarClass::Flag)
            .with("holding_torch", VarClass::Local);
        VarTable::new(&decls)
    }

    #[test]
    fn initial_state_is_all_false() {
        let state = table().initial_state();
        assert_eq!(state.len(), 3);
        assert!(state.iter().all(|(_, v)| !v));
        assert!(state.contains("met_king"));
    }

    #[test]
    fn global_overwrites_both_ways() {
        let t = table();
        let s = t.apply(&t.initial_state(), &[Mutation::new("door_open", true)]);
        assert!(s.get("door_open"));
        let s = t.apply(&s, &[Mutation::new("door_open", false)]);
        assert!(!s.get("door_open"));
    }

    #[test]
    fn flag_cannot_be_cleared() {
        let t = table();
        let s = t.apply(&t.initial_state(), &[Mutation::new("met_king", true)]);
        let s = t.apply(&s, &[Mutation::new("met_king", false)]);
        assert!(s.get("met_king"));
    }

    #[test]
    fn flag_rule_holds_regardless_of_order() {
        let t = table();
        let set_then_clear = t.apply(
            &t.initial_state(),
            &[Mutation::new("met_king", true), Mutation::new("met_king", false)],
        );
        let clear_then_set = t.apply(
            &t.initial_state(),
            &[Mutation::new("met_king", false), Mutation::new("met_king", true)],
        );
        assert!(set_then_clear.get("met_king"));
        assert!(clear_then_set.get("met_king"));
    }

    #[test]
    fn apply_does_not_touch_input() {
        let t = table();
        let start = t.initial_state();
        let _ = t.apply(&start, &[Mutation::new("door_open", true)]);
        assert!(!start.get("door_open"));
    }

    #[test]
    fn undeclared_mutation_is_recorded() {
        let t = table();
        let s = t.apply(&t.initial_state(), &[Mutation::new("stray", true)]);
        assert!(s.get("stray"));
        assert_eq!(s.len(), 4);
        assert!(!t.is_declared("stray"));
    }

    #[test]
    fn purge_resets_only_locals() {
        let t = table();
        let mut s = t.apply(
            &t.initial_state(),
            &[
                Mutation::new("door_open", true),
                Mutation::new("met_king", true),
                Mutation::new("holding_torch", true),
            ],
        );
        t.purge_locals(&mut s);
        assert!(s.get("door_open"));
        assert!(s.get("met_king"));
        assert!(!s.get("holding_torch"));
    }

    #[test]
    fn overlapping_declarations_prefer_flag_then_local() {
        let decls = Declarations::new()
            .with("a", VarClass::Global)
            .with("a", VarClass::Flag)
            .with("b", VarClass::Global)
            .with("b", VarClass::Local)
            .with("c", VarClass::Local)
            .with("c", VarClass::Flag);
        assert_eq!(decls.overlaps(), vec!["a", "b", "c"]);
        assert_eq!(decls.len(), 3);

        let t = VarTable::new(&decls);
        assert_eq!(t.class_of("a"), VarClass::Flag);
        assert_eq!(t.class_of("b"), VarClass::Local);
        assert_eq!(t.class_of("c"), VarClass::Flag);
        assert_eq!(t.class_of("unknown"), VarClass::Global);
    }

    #[test]
    fn parse_mutation() {
        let m: Mutation = " has_key =  true ".parse().unwrap();
        assert_eq!(m, Mutation::new("has_key", true));
        assert_eq!(m.to_string(), "has_key = true");

        assert!(matches!(
            "has_key".parse::<Mutation>(),
            Err(SyntaxError::MissingAssignment(_))
        ));
        assert!(matches!(
            "= true".parse::<Mutation>(),
            Err(SyntaxError::EmptyName(_))
        ));
        assert!(matches!(
            "has_key = yes".parse::<Mutation>(),
            Err(SyntaxError::BadLiteral(_))
        ));
    }

    #[test]
    fn state_vector_serializes_as_map() {
        let s = StateVector::new().with("b", true).with("a", false);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"a":false,"b":true}"#);
    }
}
