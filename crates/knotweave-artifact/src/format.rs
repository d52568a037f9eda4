//! JSON layout of a compiled story.
//!
//! ```text
//! {
//!   "metadata": { "<key>": "<value>", ... },
//!   "graph": {
//!     "nodes": {
//!       "<unit|a=false,b=true>": {
//!         "knotName", "scene", "state", "content",
//!         "edges": [ { "text", "targetNodeId", "stitch"? } ],
//!         "isEnd", "stitch"?
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Maps are ordered, so the same graph always serializes to the same bytes.

use std::collections::BTreeMap;

use knotweave_core::{NodeId, StoryGraph, StoryNode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Owned artifact, as read back from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    pub graph: GraphSection,
}

/// The `graph` object of an artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSection {
    pub nodes: BTreeMap<NodeId, StoryNode>,
}

impl From<StoryGraph> for Artifact {
    fn from(graph: StoryGraph) -> Self {
        Self {
            metadata: graph.metadata,
            graph: GraphSection { nodes: graph.nodes },
        }
    }
}

impl From<Artifact> for StoryGraph {
    fn from(artifact: Artifact) -> Self {
        StoryGraph {
            metadata: artifact.metadata,
            nodes: artifact.graph.nodes,
        }
    }
}

#[derive(Serialize)]
struct ArtifactRef<'a> {
    metadata: &'a BTreeMap<String, String>,
    graph: GraphSectionRef<'a>,
}

#[derive(Serialize)]
struct GraphSectionRef<'a> {
    nodes: &'a BTreeMap<NodeId, StoryNode>,
}

/// Serialize `graph` as an artifact; `pretty` indents by two spaces.
pub fn to_json(graph: &StoryGraph, pretty: bool) -> Result<String> {
    let artifact = ArtifactRef {
        metadata: &graph.metadata,
        graph: GraphSectionRef {
            nodes: &graph.nodes,
        },
    };
    let json = if pretty {
        serde_json::to_string_pretty(&artifact)?
    } else {
        serde_json::to_string(&artifact)?
    };
    Ok(json)
}

/// Read an artifact back into a graph.
pub fn from_json(json: &str) -> Result<StoryGraph> {
    let artifact: Artifact = serde_json::from_str(json)?;
    Ok(artifact.into())
}

/// SHA-256 of `bytes` as lowercase hex.
pub fn digest(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use knotweave_core::{build_graph, Choice, Script, Unit};

    use super::*;

    fn graph() -> StoryGraph {
        let script = Script::new()
            .with_metadata("title", "Tiny")
            .with_unit(
                Unit::new("index")
                    .with_choice(Choice::new("Look").set("looked", true).anchor(".look"))
                    .with_choice(Choice::new("Go").to("end")),
            )
            .with_unit(Unit::new("end").end());
        build_graph(&script).unwrap()
    }

    #[test]
    fn layout_matches_reference_shape() {
        let json = to_json(&graph(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metadata"]["title"], "Tiny");

        let index = &value["graph"]["nodes"]["index|"];
        assert_eq!(index["knotName"], "index");
        assert_eq!(index["scene"], "");
        assert_eq!(index["content"], "");
        assert_eq!(index["isEnd"], false);
        assert!(index.get("stitch").is_none());
        assert_eq!(index["edges"][0]["stitch"], ".look");
        assert_eq!(index["edges"][0]["targetNodeId"], "index|looked=true");
        assert!(index["edges"][1].get("stitch").is_none());
        assert_eq!(index["edges"][1]["targetNodeId"], "end|");
        assert_eq!(value["graph"]["nodes"]["end|"]["isEnd"], true);
    }

    #[test]
    fn pretty_output_reads_back() {
        let original = graph();
        let json = to_json(&original, true).unwrap();
        assert!(json.contains("\n  \"graph\""));
        assert_eq!(from_json(&json).unwrap(), original);
    }

    #[test]
    fn digest_is_stable_hex() {
        let json = to_json(&graph(), true).unwrap();
        let a = digest(json.as_bytes());
        assert_eq!(a.len(), 64);
        assert_eq!(a, digest(to_json(&graph(), true).unwrap().as_bytes()));
        assert_ne!(a, digest(b"something else"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(from_json("{ not json").is_err());
        assert!(from_json(r#"{ "metadata": {} }"#).is_err());
    }
}
