//! Output of a run: project manifest, auxiliary files, blanked app manifest

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use super::templates::AuxFile;
use crate::error::{Result, fs::write_failed};

/// Contents the Drupal root's own composer.json is replaced with
pub const BLANK_MANIFEST: &str = "{\n}";

/// Everything the `Written` phase puts on disk
#[derive(Debug)]
pub struct OutputPlan<'a> {
    pub workspace: &'a Path,
    pub app_path: &'a Path,
    pub manifest: &'a Value,
    pub aux_files: &'a [AuxFile],
    pub blank_app_manifest: bool,
}

/// Encode a manifest with a four-space indent and a trailing newline
pub fn manifest_to_string(manifest: &Value) -> Result<String> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    manifest
        .serialize(&mut serializer)
        .map_err(|e| write_failed("composer.json", e.to_string()))?;
    let mut text = String::from_utf8(buffer)
        .map_err(|e| write_failed("composer.json", e.to_string()))?;
    text.push('\n');
    Ok(text)
}

/// Create `dir` if needed; an existing entry at that path is not an error
fn ensure_dir(dir: &Path) -> Result<()> {
    match std::fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(write_failed(dir.display().to_string(), e.to_string())),
    }
}

/// Create `relative` below `base` one component at a time
fn ensure_dirs(base: &Path, relative: &str) -> Result<PathBuf> {
    let mut current = base.to_path_buf();
    for component in Path::new(relative).components() {
        current.push(component);
        ensure_dir(&current)?;
    }
    Ok(current)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    debug!("Writing {}", path.display());
    std::fs::write(path, contents)
        .map_err(|e| write_failed(path.display().to_string(), e.to_string()))
}

/// Write every output of a run and return the paths written, in order
pub fn write_outputs(plan: &OutputPlan<'_>) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for aux in plan.aux_files {
        let dir = ensure_dirs(plan.workspace, aux.dir)?;
        let path = dir.join(&aux.file_name);
        write_file(&path, &aux.contents)?;
        written.push(path);
    }

    let manifest_path = plan.workspace.join("composer.json");
    write_file(&manifest_path, &manifest_to_string(plan.manifest)?)?;
    written.push(manifest_path);

    if plan.blank_app_manifest {
        let app_manifest = plan.app_path.join("composer.json");
        write_file(&app_manifest, BLANK_MANIFEST)?;
        written.push(app_manifest);
    }

    Ok(written)
}
