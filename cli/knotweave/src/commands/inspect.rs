//! `knotweave inspect`: browse the compiled graph.

use anyhow::{bail, Result};
use knotweave_core::{StoryGraph, StoryNode};

use crate::manifest::CompileSettings;

/// List every node, or show the node with id `node`.
pub fn run(settings: &CompileSettings, node: Option<&str>, format: Option<&str>) -> Result<()> {
    let compilation = super::load(settings)?;
    let graph = &compilation.graph;

    match (node, format) {
        (Some(id), Some("json")) => {
            let found = find(graph, id)?;
            println!("{}", serde_json::to_string_pretty(found)?);
        }
        (Some(id), _) => print!("{}", render_node(id, find(graph, id)?)),
        (None, Some("json")) => println!("{}", serde_json::to_string_pretty(&graph.nodes)?),
        (None, _) => print!("{}", render_listing(graph)),
    }

    Ok(())
}

fn find<'g>(graph: &'g StoryGraph, id: &str) -> Result<&'g StoryNode> {
    match graph.node(id) {
        Some(node) => Ok(node),
        None => bail!("no node '{id}' in the compiled graph"),
    }
}

fn render_listing(graph: &StoryGraph) -> String {
    let mut out = String::new();
    for (id, node) in graph.nodes() {
        let marker = if node.is_end { " [end]" } else { "" };
        out.push_str(&format!("{id}{marker}\n"));
        for edge in &node.edges {
            out.push_str(&format!("  -> {}  \"{}\"\n", edge.target_node_id, edge.text));
        }
    }
    out.push_str(&format!(
        "\n{} node(s), {} edge(s)\n",
        graph.node_count(),
        graph.edge_count()
    ));
    out
}

fn render_node(id: &str, node: &StoryNode) -> String {
    let mut out = format!("node:  {id}\n");
    out.push_str(&format!("unit:  {}\n", node.knot_name));
    if !node.scene.is_empty() {
        out.push_str(&format!("scene: {}\n", node.scene));
    }
    if let Some(stitch) = &node.stitch {
        out.push_str(&format!("stitch: {stitch}\n"));
    }
    if node.is_end {
        out.push_str("end:   yes\n");
    }
    out.push_str("state:\n");
    for (name, value) in node.state.iter() {
        out.push_str(&format!("  {name} = {value}\n"));
    }
    out.push_str("content:\n");
    for line in node.content.lines() {
        out.push_str(&format!("  {line}\n"));
    }
    out.push_str("choices:\n");
    for edge in &node.edges {
        out.push_str(&format!("  \"{}\" -> {}\n", edge.text, edge.target_node_id));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::SAMPLE_STORY;

    fn settings(dir: &std::path::Path) -> CompileSettings {
        let script = dir.join("story.kw");
        std::fs::write(&script, SAMPLE_STORY).unwrap();
        CompileSettings {
            script,
            entry: "index".into(),
            output: None,
            pretty: true,
        }
    }

    #[test]
    fn listing_shows_every_node_and_edge() {
        let graph = knotweave_artifact::compile(SAMPLE_STORY).unwrap();
        let text = render_listing(&graph);
        assert!(text.contains("index|has_key=false\n  -> index|has_key=true  \"Lift the rug.\""));
        assert!(text.contains("outside|has_key=true [end]"));
        assert!(text.contains("3 node(s), 2 edge(s)"));
    }

    #[test]
    fn single_node_view() {
        let graph = knotweave_artifact::compile(SAMPLE_STORY).unwrap();
        let id = "index|has_key=true";
        let text = render_node(id, graph.node(id).unwrap());
        assert!(text.contains("unit:  index"));
        assert!(text.contains("  has_key = true"));
        assert!(text.contains("The key is cold in your hand."));
        assert!(text.contains("\"Unlock the door.\" -> outside|has_key=true"));
    }

    #[test]
    fn unknown_node_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&settings(dir.path()), Some("index|has_key=maybe"), None).unwrap_err();
        assert!(err.to_string().contains("no node"));
        run(&settings(dir.path()), Some("index|has_key=false"), Some("json")).unwrap();
        run(&settings(dir.path()), None, Some("json")).unwrap();
    }
}
