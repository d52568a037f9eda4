//! Summary statistics and authoring lints for a compiled story.
//!
//! Lints never fail a compilation; they point at content an author most
//! likely did not intend (units nobody can reach, paths that stop without
//! an ending).

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::StoryGraph;
use crate::script::Script;
use crate::state::VarTable;

/// Severity of a lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Likely an authoring mistake.
    Warning,
    /// Harmless but worth knowing.
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A single authoring issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lint {
    /// How serious the issue is.
    pub severity: Severity,
    /// Unit the lint is about.
    pub unit: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Lint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}] {}", self.severity, self.unit, self.message)
    }
}

/// Size of a compiled graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Reachable `(unit, state)` pairs.
    pub nodes: usize,
    /// Transitions across all nodes.
    pub edges: usize,
    /// Nodes of `END` units.
    pub end_nodes: usize,
    /// Units with at least one reachable node.
    pub units_reached: usize,
    /// Units declared in the script.
    pub units_total: usize,
}

impl GraphStats {
    pub fn of(script: &Script, graph: &StoryGraph) -> Self {
        let reached: BTreeSet<&str> = graph.nodes.values().map(|n| n.knot_name.as_str()).collect();
        Self {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            end_nodes: graph.nodes.values().filter(|n| n.is_end).count(),
            units_reached: reached.len(),
            units_total: script.unit_count(),
        }
    }
}

/// Collect lints for `graph`, compiled from `script`.
///
/// Ordered by severity, then unit name.
pub fn lint(script: &Script, graph: &StoryGraph) -> Vec<Lint> {
    let mut lints = Vec::new();
    let vars = VarTable::new(&script.declarations);
    let reached: BTreeSet<&str> = graph.nodes.values().map(|n| n.knot_name.as_str()).collect();

    for unit in script.units() {
        if !reached.contains(unit.name.as_str()) {
            lints.push(Lint {
                severity: Severity::Warning,
                unit: unit.name.clone(),
                message: "unit is never reached".into(),
            });
        }

        let mut undeclared = BTreeSet::new();
        for block in &unit.body {
            undeclared.extend(block.condition.names().filter(|n| !vars.is_declared(n)));
        }
        for choice in &unit.choices {
            undeclared.extend(choice.condition.names().filter(|n| !vars.is_declared(n)));
            undeclared.extend(
                choice
                    .mutations
                    .iter()
                    .map(|m| m.name.as_str())
                    .filter(|n| !vars.is_declared(n)),
            );
        }
        for name in undeclared {
            lints.push(Lint {
                severity: Severity::Warning,
                unit: unit.name.clone(),
                message: format!("variable '{name}' is not declared (reads as false)"),
            });
        }

        if unit.is_end && !unit.choices.is_empty() {
            lints.push(Lint {
                severity: Severity::Note,
                unit: unit.name.clone(),
                message: format!("end unit still offers {} choice(s)", unit.choices.len()),
            });
        }
    }

    for (id, node) in graph.nodes() {
        if !node.is_end && node.edges.is_empty() {
            lints.push(Lint {
                severity: Severity::Warning,
                unit: node.knot_name.clone(),
                message: format!("dead end: node '{id}' has no choices and is not an ending"),
            });
        }
    }

    lints.sort_by(|a, b| (a.severity, &a.unit).cmp(&(b.severity, &b.unit)));
    lints
}
