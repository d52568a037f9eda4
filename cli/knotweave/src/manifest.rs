//! `knotweave.toml` manifest parsing and compile settings.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use knotweave_core::ENTRY_UNIT;
use serde::{Deserialize, Serialize};

/// File name searched for by [`KnotweaveManifest::find_and_load`].
pub const MANIFEST_FILE: &str = "knotweave.toml";

/// The top-level manifest of a story project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnotweaveManifest {
    /// Project metadata (required).
    pub project: ProjectConfig,
    /// Compiler defaults.
    #[serde(default)]
    pub compile: CompileConfig,
}

/// Project metadata section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// Compile section: defaults for every command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompileConfig {
    /// Script path, relative to the manifest.
    #[serde(default = "default_script")]
    pub script: String,
    /// Unit to start exploring from.
    #[serde(default = "default_entry")]
    pub entry: String,
    /// Artifact path, relative to the manifest. Stdout when absent.
    #[serde(default)]
    pub output: Option<String>,
    /// Indent the JSON artifact.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_script() -> String {
    "story.kw".to_string()
}

fn default_entry() -> String {
    ENTRY_UNIT.to_string()
}

fn default_pretty() -> bool {
    true
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            script: default_script(),
            entry: default_entry(),
            output: None,
            pretty: default_pretty(),
        }
    }
}

impl KnotweaveManifest {
    /// Search upward from `start_dir` for a `knotweave.toml`, parse it, and
    /// return it with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: KnotweaveManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing knotweave.toml")
    }

    /// Manifest written by `knotweave init`.
    pub fn template(name: &str) -> String {
        format!(
            r#"[project]
name = "{name}"
version = "0.1.0"

[compile]
script = "story.kw"
entry = "index"
output = "out/story.json"
pretty = true
"#
        )
    }
}

/// Fully resolved inputs of one command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileSettings {
    pub script: PathBuf,
    pub entry: String,
    pub output: Option<PathBuf>,
    pub pretty: bool,
}

/// Command-line values that override the manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides<'a> {
    pub script: Option<&'a str>,
    pub entry: Option<&'a str>,
    pub output: Option<&'a str>,
    pub compact: bool,
}

/// Merge command-line overrides with the manifest found at `project_dir`.
///
/// Paths given on the command line are relative to `cwd`; paths from the
/// manifest are relative to the manifest's directory.
pub fn resolve_settings(
    cwd: &Path,
    manifest: Option<(&KnotweaveManifest, &Path)>,
    overrides: Overrides<'_>,
) -> Result<CompileSettings> {
    let defaults = manifest.map(|(m, dir)| (&m.compile, dir));

    let script = match (overrides.script, defaults) {
        (Some(path), _) => cwd.join(path),
        (None, Some((compile, dir))) => dir.join(&compile.script),
        (None, None) => {
            bail!("no script given and no {MANIFEST_FILE} found (run `knotweave init` first)")
        }
    };

    let entry = overrides
        .entry
        .map(str::to_string)
        .or_else(|| defaults.map(|(compile, _)| compile.entry.clone()))
        .unwrap_or_else(default_entry);

    let output = match (overrides.output, defaults) {
        (Some(path), _) => Some(cwd.join(path)),
        (None, Some((compile, dir))) => compile.output.as_ref().map(|p| dir.join(p)),
        (None, None) => None,
    };

    let pretty = !overrides.compact && defaults.map_or(true, |(compile, _)| compile.pretty);

    Ok(CompileSettings {
        script,
        entry,
        output,
        pretty,
    })
}
