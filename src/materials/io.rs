use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{PipelineError, PipelineResult};
use crate::models::MaterialAssignment;
use crate::scene::SceneNode;

use super::apply::apply_assignments;
use super::extract::extract_assignments;

/// Serialise assignments as JSON indented with four spaces.
pub fn assignments_to_json(assignments: &[MaterialAssignment]) -> serde_json::Result<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    assignments.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write assignments to a shader file.
pub fn write_assignments(path: &Path, assignments: &[MaterialAssignment]) -> PipelineResult<()> {
    let json = assignments_to_json(assignments).map_err(|source| PipelineError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Read assignments from a shader file. A missing file is an error.
pub fn read_assignments(path: &Path) -> PipelineResult<Vec<MaterialAssignment>> {
    if !path.is_file() {
        return Err(PipelineError::MissingShaderFile(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| PipelineError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Capture the material assignments under `root` and write them to `path`.
pub fn export_shaders<N: SceneNode>(
    root: &N,
    processing_nodes: &[String],
    path: &Path,
) -> PipelineResult<Vec<MaterialAssignment>> {
    let assignments = extract_assignments(root, processing_nodes);
    write_assignments(path, &assignments)?;
    log::info!(
        "exported {} material assignment(s) to {}",
        assignments.len(),
        path.display()
    );
    Ok(assignments)
}

/// Read the assignments stored at `path` and apply them under `root`.
pub fn import_shaders<N: SceneNode>(root: &mut N, path: &Path) -> PipelineResult<usize> {
    let assignments = read_assignments(path)?;
    let applied = apply_assignments(root, &assignments)?;
    log::info!(
        "applied {applied} of {} material assignment(s) from {}",
        assignments.len(),
        path.display()
    );
    Ok(applied)
}
