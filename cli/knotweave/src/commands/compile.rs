//! `knotweave compile`: script to JSON artifact.

use std::fs;

use anyhow::{Context, Result};
use knotweave_artifact::{digest, to_json};
use tracing::info;

use crate::manifest::CompileSettings;

/// Compile the configured script and write the artifact.
///
/// With no output path the JSON goes to stdout and nothing else is printed
/// there, so the command can be piped.
pub fn run(settings: &CompileSettings) -> Result<()> {
    let compilation = super::load(settings)?;
    let graph = &compilation.graph;
    let json = to_json(graph, settings.pretty).context("serializing artifact")?;

    match &settings.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(path, &json).with_context(|| format!("writing {}", path.display()))?;

            println!(
                "Compiled {} -> {}",
                settings.script.display(),
                path.display()
            );
            println!("  Nodes:  {}", graph.node_count());
            println!("  Edges:  {}", graph.edge_count());
            println!("  SHA256: {}", digest(json.as_bytes()));
        }
        None => {
            info!(
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                "writing artifact to stdout"
            );
            println!("{json}");
        }
    }

    Ok(())
}
