//! Core semantic model for the knotweave story compiler.
//!
//! A story is a set of named units (knots), each holding conditional text
//! and conditional choices over a vector of boolean state variables. This
//! crate turns that model into the graph of story states that can actually
//! occur during play:
//!
//! - **State model:** [`StateVector`], the three variable classes
//!   ([`VarClass`]) and the copy-on-write transition rule ([`VarTable::apply`]).
//! - **Conditions:** conjunctions of `name == bool` / `name != bool`
//!   comparisons ([`Condition`]).
//! - **Unit model:** [`Script`], [`Unit`], [`TextBlock`], [`Choice`]: the
//!   shape handed over by a parser.
//! - **Graph builder:** breadth-first exploration of `(unit, state)` pairs
//!   from the entry unit ([`GraphBuilder`]), deduplicated by [`NodeId`].

pub mod analysis;
pub mod condition;
pub mod error;
pub mod graph;
pub mod identity;
pub mod script;
pub mod state;

pub use analysis::{lint, GraphStats, Lint, Severity};
pub use condition::{Comparison, CompareOp, Condition};
pub use error::{GraphError, SyntaxError};
pub use graph::{build_graph, GraphBuilder, StoryEdge, StoryGraph, StoryNode};
pub use identity::NodeId;
pub use script::{Choice, Destination, Script, TextBlock, Unit};
pub use state::{Declarations, Mutation, StateVector, VarClass, VarTable};

/// Name of the unit every story starts in.
pub const ENTRY_UNIT: &str = "index";
