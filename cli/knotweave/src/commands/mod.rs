//! CLI command implementations.

pub mod check;
pub mod compile;
pub mod init;
pub mod inspect;

use std::fs;

use anyhow::{Context, Result};
use knotweave_artifact::{compile_with_entry, Compilation};

use crate::manifest::CompileSettings;

/// Read the configured script and compile it from the configured entry.
pub(crate) fn load(settings: &CompileSettings) -> Result<Compilation> {
    let path = &settings.script;
    let source =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    compile_with_entry(&source, &settings.entry)
        .with_context(|| format!("compiling {}", path.display()))
}
