//! `knotweave check`: compile, then report statistics and lints.

use anyhow::{Context, Result};
use knotweave_artifact::{digest, to_json};
use knotweave_core::{lint, GraphStats, Lint, Severity};
use serde::Serialize;

use crate::manifest::CompileSettings;

/// Result of checking one script.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub stats: GraphStats,
    pub lints: Vec<Lint>,
    /// SHA-256 of the pretty-printed artifact.
    pub digest: String,
}

impl CheckReport {
    pub fn warnings(&self) -> usize {
        self.lints
            .iter()
            .filter(|l| l.severity == Severity::Warning)
            .count()
    }
}

/// Compile the configured script without writing anything.
pub fn analyze(settings: &CompileSettings) -> Result<CheckReport> {
    let compilation = super::load(settings)?;
    let json = to_json(&compilation.graph, true).context("serializing artifact")?;
    Ok(CheckReport {
        stats: GraphStats::of(&compilation.script, &compilation.graph),
        lints: lint(&compilation.script, &compilation.graph),
        digest: digest(json.as_bytes()),
    })
}

/// Check the configured script. Lints are reported but never fail the run.
pub fn run(settings: &CompileSettings, format: Option<&str>) -> Result<()> {
    let report = analyze(settings)?;

    if format == Some("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let stats = &report.stats;
    println!("--- {} ---", settings.script.display());
    println!("  Nodes:   {}", stats.nodes);
    println!("  Edges:   {}", stats.edges);
    println!("  Endings: {}", stats.end_nodes);
    println!("  Units:   {}/{} reached", stats.units_reached, stats.units_total);
    println!("  SHA256:  {}", report.digest);

    if !report.lints.is_empty() {
        println!();
        for lint in &report.lints {
            println!("{lint}");
        }
    }
    println!();
    println!("ok ({} warning(s))", report.warnings());

    Ok(())
}
