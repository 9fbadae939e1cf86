use std::fs;
use std::path::{Path, PathBuf};

use dialoguer::Confirm;

use dvwgen_core::{Artifact, ArtifactKind};

fn subdir(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::OptionSets => "OptionSets",
        ArtifactKind::Entity => "Entities",
    }
}

/// Write one artifact under the output root as a single whole-file write.
///
/// When the target exists and `overwrite` is not set, asks before replacing
/// it; declining returns `Ok(None)` and the run continues with the next
/// artifact.
pub fn write_artifact(
    out_root: &Path,
    artifact: &Artifact,
    overwrite: bool,
) -> Result<Option<PathBuf>, String> {
    let dir = out_root.join(subdir(artifact.kind));
    fs::create_dir_all(&dir).map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;

    let path = dir.join(&artifact.file_name);
    if path.exists() && !overwrite {
        let confirmed = Confirm::new()
            .with_prompt(format!("File exists: {}. Overwrite?", path.display()))
            .default(false)
            .interact()
            .map_err(|e| format!("Failed to read confirmation: {e}"))?;
        if !confirmed {
            return Ok(None);
        }
    }

    fs::write(&path, &artifact.content)
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    Ok(Some(path))
}
