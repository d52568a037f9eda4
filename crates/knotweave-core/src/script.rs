//! The unit model: what a parser hands to the graph builder.
//!
//! A [`Script`] is immutable input for one compilation. Units are keyed by
//! name; text blocks and choices keep their declaration order, which the
//! builder relies on for first-match text selection and edge order.

use std::collections::BTreeMap;

use crate::condition::Condition;
use crate::state::{Declarations, Mutation, StateVector};

/// Where a choice leads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Destination {
    /// Jump to another unit (or explicitly to the same one).
    Unit(String),
    /// Intra-unit jump tag, kept as written (`.tag`). Only annotates the
    /// edge: the active unit does not change.
    Anchor(String),
    /// No destination: a state-only transition within the unit.
    #[default]
    Stay,
}

/// A conditional piece of body text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextBlock {
    /// When this block is shown.
    pub condition: Condition,
    /// Text, possibly spanning several lines.
    pub content: String,
}

impl TextBlock {
    /// An unconditional block.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            condition: Condition::always(),
            content: content.into(),
        }
    }

    /// A block shown only when `condition` holds.
    pub fn when(condition: Condition, content: impl Into<String>) -> Self {
        Self {
            condition,
            content: content.into(),
        }
    }
}

/// A player choice offered by a unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Choice {
    /// Text shown to the reader.
    pub label: String,
    /// When this choice is offered.
    pub condition: Condition,
    /// State changes, applied left to right.
    pub mutations: Vec<Mutation>,
    /// Where the choice leads.
    pub destination: Destination,
}

impl Choice {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Only offer this choice when `condition` holds.
    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    /// Append a mutation.
    pub fn set(mut self, name: impl Into<String>, value: bool) -> Self {
        self.mutations.push(Mutation::new(name, value));
        self
    }

    /// Lead to the named unit.
    pub fn to(mut self, unit: impl Into<String>) -> Self {
        self.destination = Destination::Unit(unit.into());
        self
    }

    /// Mark as a local-anchor jump.
    pub fn anchor(mut self, tag: impl Into<String>) -> Self {
        self.destination = Destination::Anchor(tag.into());
        self
    }

    /// Anchor tag, if this is a local-anchor jump.
    pub fn anchor_tag(&self) -> Option<&str> {
        match &self.destination {
            Destination::Anchor(tag) => Some(tag),
            _ => None,
        }
    }
}

/// A named, addressable block of content and choices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Unit {
    /// Unique name, the target of `-> name`.
    pub name: String,
    /// Scene label; the empty string is the unnamed scene.
    pub scene: String,
    /// Text blocks in source order; the first match wins.
    pub body: Vec<TextBlock>,
    /// Choices in source order.
    pub choices: Vec<Choice>,
    /// Marked `END`.
    pub is_end: bool,
}

impl Unit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_scene(mut self, scene: impl Into<String>) -> Self {
        self.scene = scene.into();
        self
    }

    pub fn with_text(mut self, block: TextBlock) -> Self {
        self.body.push(block);
        self
    }

    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Mark as an end-of-path unit.
    pub fn end(mut self) -> Self {
        self.is_end = true;
        self
    }

    /// Content of the first text block whose condition holds, or `""`.
    pub fn content_for(&self, state: &StateVector) -> &str {
        self.body
            .iter()
            .find(|block| block.condition.evaluate(state))
            .map(|block| block.content.as_str())
            .unwrap_or("")
    }
}

/// A parsed story: header metadata, variable declarations, and units.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script {
    /// Header `// key: value` pairs that are not declarations.
    pub metadata: BTreeMap<String, String>,
    /// Declared variable names by class.
    pub declarations: Declarations,
    units: BTreeMap<String, Unit>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit, returning the one it replaced, if any.
    pub fn add_unit(&mut self, unit: Unit) -> Option<Unit> {
        self.units.insert(unit.name.clone(), unit)
    }

    /// Builder-style [`add_unit`](Self::add_unit).
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.add_unit(unit);
        self
    }

    pub fn with_declarations(mut self, declarations: Declarations) -> Self {
        self.declarations = declarations;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn unit(&self, name: &str) -> Option<&Unit> {
        self.units.get(name)
    }

    pub fn contains_unit(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    /// Units in name order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}
