//! Reachable-state story graph and its breadth-first builder.
//!
//! Exploration starts from the entry unit with every declared variable
//! false. Each `(unit, state)` pair becomes one [`StoryNode`], created the
//! first time it is reached and keyed by its canonical [`NodeId`]. Nodes are
//! registered before any edge points at them, so the finished graph has no
//! dangling edges.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{GraphError, Result};
use crate::identity::NodeId;
use crate::script::{Destination, Script, Unit};
use crate::state::{StateVector, VarTable};
use crate::ENTRY_UNIT;

/// A transition offered by a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryEdge {
    /// Choice label.
    pub text: String,
    /// Canonical id of the node this choice leads to.
    pub target_node_id: NodeId,
    /// Anchor tag, only for local-anchor jumps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stitch: Option<String>,
}

/// One reachable `(unit, state)` pair with its resolved content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryNode {
    /// Unit this node was resolved from.
    pub knot_name: String,
    /// Scene of that unit; empty when it has none.
    pub scene: String,
    /// Value of every variable in this node.
    pub state: StateVector,
    /// Text of the first text block whose condition holds.
    pub content: String,
    /// Outgoing transitions, in choice order.
    pub edges: Vec<StoryEdge>,
    /// Whether the unit is marked `END`.
    pub is_end: bool,
    /// Anchor tag of the jump that first reached this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stitch: Option<String>,
}

impl StoryNode {
    /// Resolve `unit` in `state`: pick the first matching text block.
    pub fn resolve(unit: &Unit, state: StateVector, stitch: Option<&str>) -> Self {
        Self {
            knot_name: unit.name.clone(),
            scene: unit.scene.clone(),
            content: unit.content_for(&state).to_string(),
            state,
            edges: Vec::new(),
            is_end: unit.is_end,
            stitch: stitch.map(str::to_string),
        }
    }

    /// Canonical identity of this node.
    pub fn id(&self) -> NodeId {
        NodeId::canonical(&self.knot_name, &self.state)
    }
}

/// The compiled story: every reachable node plus header metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryGraph {
    /// Header key/value pairs, copied from the script.
    pub metadata: BTreeMap<String, String>,
    /// Every reachable node, keyed by canonical id.
    pub nodes: BTreeMap<NodeId, StoryNode>,
}

impl StoryGraph {
    pub fn node(&self, id: &str) -> Option<&StoryNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in identity order.
    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &StoryNode)> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.edges.len()).sum()
    }

    /// Edge targets that are not nodes of this graph.
    pub fn dangling_edges(&self) -> Vec<(&NodeId, &StoryEdge)> {
        self.nodes
            .iter()
            .flat_map(|(id, node)| node.edges.iter().map(move |e| (id, e)))
            .filter(|(_, e)| !self.nodes.contains_key(&e.target_node_id))
            .collect()
    }
}

/// Breadth-first builder for a [`StoryGraph`].
///
/// ```rust
/// use knotweave_core::{Choice, Condition, Declarations, GraphBuilder, Script, Unit, VarClass};
///
/// let script = Script::new()
///     .with_declarations(Declarations::new().with("has_key", VarClass::Global))
///     .with_unit(
///         Unit::new("index")
///             .with_choice(Choice::new("Get key").set("has_key", true))
///             .with_choice(
///                 Choice::new("Open door")
///                     .when(Condition::always().is("has_key", true))
///                     .to("victory"),
///             ),
///     )
///     .with_unit(Unit::new("victory").end());
///
/// let graph = GraphBuilder::new(&script).build().unwrap();
/// assert_eq!(graph.node_count(), 3);
/// assert!(graph.contains("victory|has_key=true"));
/// ```
pub struct GraphBuilder<'a> {
    script: &'a Script,
    entry: String,
}

impl<'a> GraphBuilder<'a> {
    /// Builder over `script`, starting at [`ENTRY_UNIT`].
    pub fn new(script: &'a Script) -> Self {
        Self {
            script,
            entry: ENTRY_UNIT.to_string(),
        }
    }

    /// Start from a different unit.
    pub fn entry(mut self, name: impl Into<String>) -> Self {
        self.entry = name.into();
        self
    }

    /// Explore every reachable state.
    ///
    /// Fails without a partial result if the entry unit is missing or a
    /// reachable choice leads to an unknown unit.
    pub fn build(&self) -> Result<StoryGraph> {
        let vars = VarTable::new(&self.script.declarations);
        let entry = self
            .script
            .unit(&self.entry)
            .ok_or_else(|| GraphError::MissingEntry(self.entry.clone()))?;

        let mut nodes: BTreeMap<NodeId, StoryNode> = BTreeMap::new();
        let mut queue: VecDeque<(NodeId, &'a Unit)> = VecDeque::new();

        let root = StoryNode::resolve(entry, vars.initial_state(), None);
        let root_id = root.id();
        debug!(node = %root_id, "entry node");
        nodes.insert(root_id.clone(), root);
        queue.push_back((root_id, entry));

        while let Some((id, unit)) = queue.pop_front() {
            let state = match nodes.get(&id) {
                Some(node) => node.state.clone(),
                None => continue,
            };

            let mut edges = Vec::new();
            for choice in &unit.choices {
                if !choice.condition.evaluate(&state) {
                    continue;
                }

                let mut next_state = vars.apply(&state, &choice.mutations);

                // An anchor only annotates the edge; without mutations it
                // goes nowhere, like a bare choice.
                let target_name = match &choice.destination {
                    Destination::Unit(name) => name.as_str(),
                    Destination::Anchor(_) | Destination::Stay if !choice.mutations.is_empty() => {
                        unit.name.as_str()
                    }
                    Destination::Anchor(_) | Destination::Stay => continue,
                };
                let target = self
                    .script
                    .unit(target_name)
                    .ok_or_else(|| GraphError::UnknownTarget {
                        unit: unit.name.clone(),
                        choice: choice.label.clone(),
                        target: target_name.to_string(),
                    })?;

                if target.scene != unit.scene {
                    vars.purge_locals(&mut next_state);
                }

                let next = StoryNode::resolve(target, next_state, choice.anchor_tag());
                let next_id = next.id();

                edges.push(StoryEdge {
                    text: choice.label.clone(),
                    target_node_id: next_id.clone(),
                    stitch: choice.anchor_tag().map(str::to_string),
                });

                if !nodes.contains_key(&next_id) {
                    debug!(from = %id, node = %next_id, "discovered node");
                    nodes.insert(next_id.clone(), next);
                    queue.push_back((next_id, target));
                }
            }

            if let Some(node) = nodes.get_mut(&id) {
                node.edges.extend(edges);
            }
        }

        let graph = StoryGraph {
            metadata: self.script.metadata.clone(),
            nodes,
        };
        info!(
            entry = %self.entry,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "story graph built"
        );
        Ok(graph)
    }
}

/// Build the graph of `script` from [`ENTRY_UNIT`].
pub fn build_graph(script: &Script) -> Result<StoryGraph> {
    GraphBuilder::new(script).build()
}
