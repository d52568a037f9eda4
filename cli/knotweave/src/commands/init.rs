//! `knotweave init`: project scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::manifest::{KnotweaveManifest, MANIFEST_FILE};

/// Starter story written into new projects.
pub const SAMPLE_STORY: &str = r#"// title: The Locked Door
// STATES: has_key

=== index ===
- {has_key == false} A heavy door blocks the way. Something glints under the rug.
- {has_key == true} A heavy door blocks the way. The key is cold in your hand.
* {has_key == false} Lift the rug. ~ has_key = true
* {has_key == true} Unlock the door. -> outside

=== outside ===
Fresh air at last.
END
"#;

/// Create a new story project named `name` in the current directory.
pub fn run(name: &str) -> Result<()> {
    let project_dir = Path::new(name);
    create_project(project_dir, name)
}

pub(crate) fn create_project(project_dir: &Path, name: &str) -> Result<()> {
    if project_dir.exists() {
        bail!("directory '{}' already exists", project_dir.display());
    }

    fs::create_dir_all(project_dir.join("out")).context("creating out/ directory")?;

    fs::write(
        project_dir.join(MANIFEST_FILE),
        KnotweaveManifest::template(name),
    )
    .with_context(|| format!("writing {MANIFEST_FILE}"))?;

    fs::write(project_dir.join("story.kw"), SAMPLE_STORY).context("writing story.kw")?;

    fs::write(project_dir.join(".gitignore"), "out/\n").context("writing .gitignore")?;

    println!("Created project '{name}'");
    println!("  {name}/{MANIFEST_FILE}");
    println!("  {name}/story.kw");
    println!("  {name}/out/");
    println!("  {name}/.gitignore");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_project_structure() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("test-init-project");

        create_project(&project_path, "test-init-project").unwrap();

        assert!(project_path.join(MANIFEST_FILE).is_file());
        assert!(project_path.join("story.kw").is_file());
        assert!(project_path.join("out").is_dir());
        assert!(project_path.join(".gitignore").is_file());
    }

    #[test]
    fn init_generates_valid_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("valid-manifest");
        create_project(&project_path, "valid-manifest").unwrap();

        let (manifest, found) = KnotweaveManifest::find_and_load(&project_path)
            .unwrap()
            .unwrap();
        assert_eq!(found, project_path);
        assert_eq!(manifest.project.name, "valid-manifest");
        assert_eq!(manifest.compile.script, "story.kw");
    }

    #[test]
    fn sample_story_compiles() {
        let graph = knotweave_artifact::compile(SAMPLE_STORY).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert!(graph.contains("outside|has_key=true"));
    }

    #[test]
    fn init_refuses_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("existing");
        std::fs::create_dir(&project_path).unwrap();

        let err = create_project(&project_path, "existing").unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
