use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};
use crate::publish::{TokenMap, substitute_tokens};

use super::naming::{
    asset_name_and_instance, asset_type_from_reference, is_controller, strip_copy_number,
};
use super::scene::{AttrValue, MayaScene};

/// `AbcExport2` job exporting the SRT roots with the set-dress attributes.
pub const ALEMBIC_JOB_TEMPLATE: &str = concat!(
    "AbcExport2 -j \"-frameRange <startFrame> <endFrame>",
    " -attr assetName -attr assetInstance -attr mayaReferencePath -attr assetType",
    " -attr animatedAsset -uvWrite -worldSpace -writeUVSets -dataFormat ogawa",
    " -root <objectList> -file <filePath>\"",
);

/// Suffix of the transform placing a referenced asset in the set.
pub const SRT_GLOBAL: &str = "main_SRT_global";
/// Suffix of the asset-local transform under [`SRT_GLOBAL`].
pub const SRT_LOCAL: &str = "main_SRT_local";

/// A rig with more controllers than this is exported as animated.
const STATIC_CONTROLLER_LIMIT: usize = 2;

/// Settings of one export pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    /// First exported frame.
    pub start_frame: i64,
    /// Last exported frame.
    pub end_frame: i64,
    /// Destination Alembic file.
    pub file_path: String,
    /// Asset type of objects that are not referenced.
    pub default_asset_type: String,
}

/// Set-dress attributes of one exported asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAttributes {
    /// Shape receiving the attributes.
    pub shape: String,
    /// Asset name parsed from the namespace.
    pub asset_name: String,
    /// Asset instance parsed from the namespace.
    pub asset_instance: u32,
    /// Reference file without its copy number.
    pub maya_reference_path: Option<String>,
    /// Asset type folder of the reference.
    pub asset_type: String,
    /// Whether the rig carries animation controllers.
    pub animated_asset: bool,
}

impl AssetAttributes {
    /// Attribute names and values in the order they are written.
    pub fn values(&self) -> Vec<(&'static str, AttrValue)> {
        let mut values = vec![
            ("assetName", AttrValue::String(self.asset_name.clone())),
            ("assetInstance", AttrValue::Int(i64::from(self.asset_instance))),
        ];
        if let Some(path) = &self.maya_reference_path {
            values.push(("mayaReferencePath", AttrValue::String(path.clone())));
        }
        values.push(("assetType", AttrValue::String(self.asset_type.clone())));
        values.push(("animatedAsset", AttrValue::Int(i64::from(self.animated_asset))));
        values
    }
}

/// Everything an export pass over the selection decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPlan {
    /// First exported frame.
    pub start_frame: i64,
    /// Last exported frame.
    pub end_frame: i64,
    /// Destination Alembic file.
    pub file_path: String,
    /// Long names of the global SRT transforms exported as roots.
    pub roots: Vec<String>,
    /// Attributes per asset, in selection order.
    pub assets: Vec<AssetAttributes>,
}

impl ExportPlan {
    /// Alembic export job for the plan, `None` when nothing qualifies for export.
    pub fn alembic_job(&self) -> Option<String> {
        if self.roots.is_empty() {
            return None;
        }

        let mut tokens = TokenMap::new();
        tokens.insert("startFrame".into(), self.start_frame.to_string());
        tokens.insert("endFrame".into(), self.end_frame.to_string());
        tokens.insert("objectList".into(), self.roots.join(" -root "));
        tokens.insert("filePath".into(), self.file_path.clone());
        Some(substitute_tokens(ALEMBIC_JOB_TEMPLATE, &tokens))
    }
}

/// Walk the selection once and decide what to export and how to tag it.
///
/// Selected objects whose namespace lacks the global/local SRT pair are skipped, and each
/// namespace is exported once however many of its objects are selected.
pub fn plan_export<S: MayaScene>(
    scene: &S,
    settings: &ExportSettings,
) -> PipelineResult<ExportPlan> {
    let selection = scene.selection();
    if selection.is_empty() {
        return Err(PipelineError::NothingSelected);
    }

    let mut roots = Vec::new();
    let mut locals = Vec::new();
    let mut seen = BTreeSet::new();
    for selected in &selection {
        let namespace = selected.split(':').next().unwrap_or(selected);
        if !seen.insert(namespace) {
            continue;
        }
        let global = format!("{namespace}:{SRT_GLOBAL}");
        let local = format!("{namespace}:{SRT_LOCAL}");
        if !(scene.exists(&global) && scene.exists(&local)) {
            log::debug!("skipping {selected}: no SRT pair in namespace {namespace}");
            continue;
        }
        roots.push(scene.long_name(&global).unwrap_or(global));
        locals.push(local);
    }

    let mut assets = Vec::with_capacity(locals.len());
    for local in &locals {
        let shape = scene
            .shapes(local)
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::MissingShape(local.clone()))?;
        let long_name = scene.long_name(local).unwrap_or_else(|| local.clone());
        let (asset_name, asset_instance) = asset_name_and_instance(&long_name)?;

        let maya_reference_path = scene
            .reference_file(&shape)
            .map(|path| strip_copy_number(&path).to_string());
        let asset_type = match maya_reference_path.as_deref() {
            Some(path) => asset_type_from_reference(path).map(str::to_string).unwrap_or_else(|| {
                log::warn!(
                    "reference {path} is outside the asset layout, using {}",
                    settings.default_asset_type
                );
                settings.default_asset_type.clone()
            }),
            None => settings.default_asset_type.clone(),
        };

        let controllers = scene
            .descendants(local)
            .iter()
            .filter(|name| is_controller(name))
            .count();

        assets.push(AssetAttributes {
            shape,
            asset_name,
            asset_instance,
            maya_reference_path,
            asset_type,
            animated_asset: controllers > STATIC_CONTROLLER_LIMIT,
        });
    }

    Ok(ExportPlan {
        start_frame: settings.start_frame,
        end_frame: settings.end_frame,
        file_path: settings.file_path.clone(),
        roots,
        assets,
    })
}

/// Write the planned attributes onto their shapes.
pub fn apply_export_plan<S: MayaScene>(scene: &mut S, plan: &ExportPlan) -> PipelineResult<()> {
    for asset in &plan.assets {
        for (attribute, value) in asset.values() {
            scene.set_attribute(&asset.shape, attribute, value)?;
        }
    }
    Ok(())
}
