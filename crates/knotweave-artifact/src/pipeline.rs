//! Compile pipeline: script text -> unit model -> story graph.

use knotweave_core::{GraphBuilder, Script, StoryGraph, ENTRY_UNIT};
use knotweave_parse::parse_script;
use tracing::info;

use crate::error::Result;
use crate::format::to_json;

/// Output of a successful compilation: the parsed script alongside its graph.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub script: Script,
    pub graph: StoryGraph,
}

/// Compile `source`, starting at the `index` unit.
pub fn compile(source: &str) -> Result<StoryGraph> {
    Ok(compile_with_entry(source, ENTRY_UNIT)?.graph)
}

/// Compile `source`, starting at `entry`.
pub fn compile_with_entry(source: &str, entry: &str) -> Result<Compilation> {
    // Stage 1: text -> unit model
    let script = parse_script(source)?;

    // Stage 2: reachable-state exploration
    let graph = GraphBuilder::new(&script).entry(entry).build()?;

    info!(
        units = script.unit_count(),
        nodes = graph.node_count(),
        "compiled script"
    );
    Ok(Compilation { script, graph })
}

/// Compile `source` straight to artifact JSON.
pub fn compile_to_json(source: &str, pretty: bool) -> Result<String> {
    to_json(&compile(source)?, pretty)
}
