//! MaterialX publishing of the look development done on generated assets.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};
use crate::publish::{next_version, scan_versions, version_folder};
use crate::scene::{ParmValue, SceneNode};

/// Processing node holding the MaterialX exporter.
pub const EXPORT_NETWORK: &str = "EXPORT_MTLX";
/// Exporter node inside [`EXPORT_NETWORK`].
pub const EXPORT_OUTPUT: &str = "output";

/// One MaterialX file to write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MtlxExportJob {
    /// Object path handed to the exporter, relative to the object level.
    pub object_path: String,
    /// Destination `.mtlx` file.
    pub output_file: String,
}

/// MaterialX files to write into a freshly allocated publish version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MtlxExportPlan {
    /// Version folder receiving the files.
    pub version_dir: String,
    /// One job per generated asset node.
    pub jobs: Vec<MtlxExportJob>,
}

/// Publish directory matching a work-area scene directory.
///
/// `<root>/shows/<project>/assets/<type>/<asset>/<area>/<step>` maps to
/// `<root>/shows/<project>/assets/<type>/<asset>/publishs/<step>`.
pub fn materialx_publish_dir(scene_dir: &str) -> PipelineResult<String> {
    let normalised = scene_dir.replace('\\', "/");
    let segments: Vec<&str> = normalised.trim_end_matches('/').split('/').collect();

    let shows = segments
        .iter()
        .position(|segment| *segment == "shows")
        .filter(|index| *index > 0)
        .ok_or_else(|| PipelineError::InvalidScenePath(scene_dir.to_string()))?;

    let asset_end = shows + 4;
    let step = shows + 6;
    if segments.len() <= step
        || segments[shows + 2] != "assets"
        || segments[shows + 1..=step].iter().any(|segment| segment.is_empty())
    {
        return Err(PipelineError::InvalidScenePath(scene_dir.to_string()));
    }

    let mut publish: Vec<&str> = segments[..=asset_end].to_vec();
    publish.push("publishs");
    publish.push(segments[step]);
    Ok(publish.join("/"))
}

/// Work out where the MaterialX files of every generated asset under `node` go.
pub fn plan_materialx_export<N: SceneNode>(
    node: &N,
    scene_dir: &str,
    processing_nodes: &[String],
    version_prefix: &str,
) -> PipelineResult<MtlxExportPlan> {
    let publish_dir = materialx_publish_dir(scene_dir)?;
    let version = next_version(scan_versions(Path::new(&publish_dir), version_prefix)?)?;
    let version_dir = format!("{publish_dir}/{}", version_folder(version_prefix, version));

    let jobs = node
        .child_names()
        .into_iter()
        .filter(|name| !processing_nodes.contains(name))
        .map(|name| MtlxExportJob {
            object_path: format!("{}/{}", node.name(), name),
            output_file: format!("{version_dir}/{name}.mtlx"),
        })
        .collect();

    Ok(MtlxExportPlan { version_dir, jobs })
}

/// Create the version folder and run the exporter once per job.
pub fn run_materialx_export<N: SceneNode>(
    node: &mut N,
    plan: &MtlxExportPlan,
) -> PipelineResult<()> {
    fs::create_dir_all(&plan.version_dir).map_err(|source| PipelineError::Write {
        path: plan.version_dir.clone().into(),
        source,
    })?;

    let node_name = node.name().to_string();
    let exporter = node
        .child_mut(EXPORT_NETWORK)
        .and_then(|network| network.child_mut(EXPORT_OUTPUT))
        .ok_or_else(|| {
            PipelineError::NodeNotFound(format!("{node_name}/{EXPORT_NETWORK}/{EXPORT_OUTPUT}"))
        })?;

    for job in &plan.jobs {
        exporter.set_parm("vobject", ParmValue::from(job.object_path.as_str()))?;
        exporter.set_parm("ar_materialx_file", ParmValue::from(job.output_file.as_str()))?;
        exporter.press_button("execute")?;
        log::info!("exported {} to {}", job.object_path, job.output_file);
    }

    Ok(())
}
