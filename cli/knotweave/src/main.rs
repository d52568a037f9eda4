//! knotweave CLI: compile branching stories into state graphs.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use manifest::{resolve_settings, CompileSettings, KnotweaveManifest, Overrides, MANIFEST_FILE};

#[derive(Parser)]
#[command(name = "knotweave", version, about = "Branching-story compiler")]
struct Cli {
    /// More log output (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new story project
    Init {
        /// Project name
        name: String,
    },
    /// Compile a script into a JSON story graph
    Compile {
        /// Script file (default: from knotweave.toml)
        script: Option<String>,
        /// Artifact path (default: from knotweave.toml, else stdout)
        #[arg(short, long)]
        output: Option<String>,
        /// Emit single-line JSON
        #[arg(long)]
        compact: bool,
        /// Entry unit (default: index)
        #[arg(long)]
        entry: Option<String>,
    },
    /// Compile and report statistics and lints without writing output
    Check {
        /// Script file (default: from knotweave.toml)
        script: Option<String>,
        /// Entry unit (default: index)
        #[arg(long)]
        entry: Option<String>,
        /// Report format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Inspect the nodes of a compiled graph
    Inspect {
        /// Script file (default: from knotweave.toml)
        script: Option<String>,
        /// Show a single node, e.g. "index|has_key=false"
        #[arg(long)]
        node: Option<String>,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
        /// Entry unit (default: index)
        #[arg(long)]
        entry: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise the level comes from `-v`/`-q`.
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { name } => commands::init::run(&name),

        Commands::Compile {
            script,
            output,
            compact,
            entry,
        } => {
            let settings = settings(
                &cwd,
                Overrides {
                    script: script.as_deref(),
                    entry: entry.as_deref(),
                    output: output.as_deref(),
                    compact,
                },
            )?;
            commands::compile::run(&settings)
        }

        Commands::Check {
            script,
            entry,
            format,
        } => {
            let settings = settings(
                &cwd,
                Overrides {
                    script: script.as_deref(),
                    entry: entry.as_deref(),
                    ..Overrides::default()
                },
            )?;
            commands::check::run(&settings, format.as_deref())
        }

        Commands::Inspect {
            script,
            node,
            format,
            entry,
        } => {
            let settings = settings(
                &cwd,
                Overrides {
                    script: script.as_deref(),
                    entry: entry.as_deref(),
                    ..Overrides::default()
                },
            )?;
            commands::inspect::run(&settings, node.as_deref(), format.as_deref())
        }
    }
}

/// Resolve command settings against the nearest manifest, if any.
fn settings(cwd: &Path, overrides: Overrides<'_>) -> anyhow::Result<CompileSettings> {
    let (manifest, project_dir) = load_manifest_optional(cwd)?;
    if let (Some(m), Some(dir)) = (&manifest, &project_dir) {
        info!(
            project = %m.project.name,
            version = %m.project.version,
            dir = %dir.display(),
            "using {MANIFEST_FILE}"
        );
    }
    let found = manifest.as_ref().zip(project_dir.as_deref());
    resolve_settings(cwd, found, overrides)
}

/// Try to load a manifest from the current directory upward. Returns (None, None) if not found.
fn load_manifest_optional(
    cwd: &Path,
) -> anyhow::Result<(Option<KnotweaveManifest>, Option<PathBuf>)> {
    match KnotweaveManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((Some(manifest), Some(dir))),
        None => Ok((None, None)),
    }
}
