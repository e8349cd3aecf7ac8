//! Set-dress cache import onto the set-dress node and its generated asset loaders.

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::materials::{apply_assignments, extract_assignments};
use crate::models::{AssetRecord, AssetRequest, SetDressPoint};
use crate::publish::AssetResolver;
use crate::scene::{ParmValue, SceneNode};

/// Operator type of the generated per-asset loader nodes.
pub const LOADER_NODE_TYPE: &str = "loadAsset";
/// Geometry the loaders read their point transforms from.
pub const SET_DRESS_GEOMETRY: &str = "../IMPORT_SET_DRESS/OUT";

/// Drives a set-dress node: per-asset parameters, loader children and their materials.
#[derive(Debug, Clone)]
pub struct SetDressImporter {
    resolver: AssetResolver,
    processing_nodes: Vec<String>,
    default_step: String,
}

impl SetDressImporter {
    /// Create an importer from the pipeline configuration.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            resolver: AssetResolver::new(config.to_layout()),
            processing_nodes: config.processing_nodes.clone(),
            default_step: config.default_step.clone(),
        }
    }

    /// Resolver used for the asset lookups.
    pub fn resolver(&self) -> &AssetResolver {
        &self.resolver
    }

    /// Load the assets listed by a set-dress cache into `node`.
    ///
    /// Every point is resolved before the node is touched, so a failed lookup leaves the
    /// existing loaders and their materials as they were. Material assignments of the
    /// generated assets are captured and re-applied once the loaders exist again.
    pub fn import_set_dress<N: SceneNode>(
        &self,
        node: &mut N,
        points: &[SetDressPoint],
    ) -> PipelineResult<Vec<AssetRecord>> {
        check_point_numbers(points)?;
        let records = self.resolve_points(node, points)?;

        let assignments = extract_assignments(node, &self.processing_nodes);
        if !assignments.is_empty() {
            self.clear_assets(node)?;
        }

        let cache_path = node.eval_string("setDressingCachePath");
        node.set_parm("cachePath", ParmValue::from(cache_path))?;
        node.set_parm("assets", ParmValue::Int(points.len() as i64))?;

        for (point, record) in points.iter().zip(&records) {
            let id = point.number;
            let instance = record.padded_instance();
            node.set_parm(&format!("assetType{id}"), ParmValue::from(record.asset_type.as_str()))?;
            node.set_parm(&format!("assetName{id}"), ParmValue::from(record.asset_name.as_str()))?;
            node.set_parm(&format!("assetInstance{id}"), ParmValue::from(instance))?;
            node.set_parm(&format!("assetVersion{id}"), ParmValue::from(record.version.as_str()))?;
            node.set_parm(
                &format!("assetPath{id}"),
                ParmValue::from(record.resolved_path.as_str()),
            )?;
        }

        let created = self.load_assets(node)?;
        log::info!("imported {} asset(s), created {created} loader(s)", records.len());

        if !assignments.is_empty() {
            apply_assignments(node, &assignments)?;
        }

        Ok(records)
    }

    fn resolve_points<N: SceneNode>(
        &self,
        node: &N,
        points: &[SetDressPoint],
    ) -> PipelineResult<Vec<AssetRecord>> {
        points
            .iter()
            .map(|point| {
                let step = match node.eval_string(&format!("assetStep{}", point.number)) {
                    step if step.trim().is_empty() => self.default_step.clone(),
                    step => step,
                };
                self.resolver.resolve(&AssetRequest {
                    asset_type: point.asset_type.clone(),
                    asset_name: point.asset_name.clone(),
                    asset_instance: point.asset_instance,
                    asset_step: step,
                })
            })
            .collect()
    }

    /// Create a loader child for every listed asset that does not have one yet.
    pub fn load_assets<N: SceneNode>(&self, node: &mut N) -> PipelineResult<usize> {
        let count = node.eval_int("assets").unwrap_or(0).max(0);
        let mut created = 0;

        for index in 0..count {
            let node_name = format!(
                "{}_{}",
                node.eval_string(&format!("assetName{index}")),
                node.eval_string(&format!("assetInstance{index}"))
            );
            if node.child(&node_name).is_some() {
                continue;
            }

            let loader = node.create_child(LOADER_NODE_TYPE, &node_name)?;
            loader.set_parm(
                "alembicFile",
                ParmValue::parent_reference(&format!("assetPath{index}")),
            )?;
            loader.set_parm("setDressGeometry", ParmValue::from(SET_DRESS_GEOMETRY))?;
            loader.set_parm(
                "assetInstance",
                ParmValue::parent_reference(&format!("assetInstance{index}")),
            )?;
            let display = ParmValue::parent_reference(&format!("assetDisplay{index}"));
            loader.set_parm("viewportlod", display.clone())?;
            loader.set_parm("viewportlod2", display)?;
            created += 1;
        }

        node.layout_children();
        Ok(created)
    }

    /// Destroy every generated child, keeping the processing nodes.
    pub fn clear_assets<N: SceneNode>(&self, node: &mut N) -> PipelineResult<usize> {
        let generated: Vec<String> = node
            .child_names()
            .into_iter()
            .filter(|name| !self.processing_nodes.contains(name))
            .collect();

        for name in &generated {
            node.destroy_child(name)?;
        }
        Ok(generated.len())
    }
}

/// Points index the per-asset parameters, which are read back as `0..assets`.
fn check_point_numbers(points: &[SetDressPoint]) -> PipelineResult<()> {
    let mut numbers: Vec<usize> = points.iter().map(|point| point.number).collect();
    numbers.sort_unstable();
    if numbers.iter().enumerate().any(|(index, number)| index != *number) {
        return Err(PipelineError::InvalidPointNumbers {
            count: points.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::SPLIT_MATERIAL_NODE;
    use crate::publish::LocatorPolicy;
    use crate::scene::MemoryNode;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn config_in(root: &TempDir) -> PipelineConfig {
        let root = root.path().to_string_lossy().replace('\\', "/");
        PipelineConfig {
            asset_folder_template: format!(
                "{root}/<drive>/shows/<project>/assets/<assetType>/<asset>/publishs/<step>"
            ),
            locator_policy: LocatorPolicy::ExactlyOne,
            ..PipelineConfig::default()
        }
    }

    fn set_dress_node() -> MemoryNode {
        MemoryNode::new("setDress", "SET_DRESS")
            .with_template(
                MemoryNode::new(LOADER_NODE_TYPE, "")
                    .with_child(MemoryNode::new("alembic", "alembic1"))
                    .with_child(MemoryNode::new("attribwrangle", "attribwrangle1"))
                    .with_child(MemoryNode::new("output", "OUT")),
            )
            .with_parm("setDressingCachePath", "/caches/layout_v003.abc")
            .with_child(MemoryNode::new("alembic", "IMPORT_SET_DRESS"))
            .with_child(MemoryNode::new("ropnet", "EXPORT_MTLX"))
    }

    fn point(number: usize, name: &str, instance: u32) -> SetDressPoint {
        SetDressPoint {
            number,
            asset_name: name.into(),
            asset_instance: instance,
            asset_type: "Prop".into(),
        }
    }

    #[test]
    fn import_populates_parameters_and_loaders() {
        let temp = tempdir().expect("failed to create temp dir");
        let importer = SetDressImporter::from_config(&config_in(&temp));
        let publish = importer.resolver().publish_path("Prop", "chair", "lookdev");
        fs::create_dir_all(format!("{publish}/v002/caches")).unwrap();
        fs::write(format!("{publish}/v002/caches/chair.abc"), b"abc").unwrap();

        let mut node = set_dress_node().with_parm("assetStep0", "lookdev");
        let records = importer
            .import_set_dress(&mut node, &[point(0, "chair", 1), point(1, "lamp", 12)])
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(node.eval_string("cachePath"), "/caches/layout_v003.abc");
        assert_eq!(node.eval_int("assets"), Some(2));
        assert_eq!(node.eval_string("assetInstance1"), "012");
        assert_eq!(node.eval_string("assetVersion0"), "002");
        assert_eq!(
            node.eval_string("assetPath0"),
            format!("{publish}/v002/caches/chair.abc")
        );
        assert_eq!(node.eval_string("assetVersion1"), "000");
        assert_eq!(records[1].asset_step, "modeling");

        let loader = node.child("chair_001").expect("loader should be created");
        assert_eq!(loader.kind, LOADER_NODE_TYPE);
        assert_eq!(
            loader.parm("alembicFile"),
            Some(ParmValue::parent_reference("assetPath0"))
        );
        assert_eq!(loader.eval_string("setDressGeometry"), SET_DRESS_GEOMETRY);
        assert!(node.child("lamp_012").is_some());
        assert!(node.laid_out);
    }

    #[test]
    fn load_assets_skips_existing_loaders() {
        let importer = SetDressImporter::from_config(&PipelineConfig::default());
        let mut node = set_dress_node()
            .with_parm("assets", 2_i64)
            .with_parm("assetName0", "chair")
            .with_parm("assetInstance0", "001")
            .with_parm("assetName1", "lamp")
            .with_parm("assetInstance1", "002")
            .with_child(MemoryNode::new(LOADER_NODE_TYPE, "chair_001"));

        assert_eq!(importer.load_assets(&mut node).unwrap(), 1);
        assert_eq!(node.child_names().len(), 4);
    }

    #[test]
    fn clear_assets_keeps_processing_nodes() {
        let importer = SetDressImporter::from_config(&PipelineConfig::default());
        let mut node = set_dress_node()
            .with_child(MemoryNode::new(LOADER_NODE_TYPE, "chair_001"))
            .with_child(MemoryNode::new(LOADER_NODE_TYPE, "lamp_002"));

        assert_eq!(importer.clear_assets(&mut node).unwrap(), 2);
        assert_eq!(node.child_names(), vec!["IMPORT_SET_DRESS", "EXPORT_MTLX"]);
    }

    #[test]
    fn reimport_preserves_material_assignments() {
        let temp = tempdir().expect("failed to create temp dir");
        let importer = SetDressImporter::from_config(&config_in(&temp));
        let mut node = set_dress_node();
        importer.import_set_dress(&mut node, &[point(0, "table", 2)]).unwrap();

        let loader = node.child_mut("table_002").unwrap();
        assert!(loader.child(SPLIT_MATERIAL_NODE).is_none());
        loader.children.push(
            MemoryNode::new("material", SPLIT_MATERIAL_NODE)
                .with_parm("num_materials", 1_i64)
                .with_parm("group1", "top")
                .with_parm("shop_materialpath1", "/mat/glass"),
        );

        importer.import_set_dress(&mut node, &[point(0, "table", 2)]).unwrap();

        let loader = node.child("table_002").expect("loader should be recreated");
        let material = loader
            .child(SPLIT_MATERIAL_NODE)
            .expect("split material should be restored");
        assert_eq!(material.eval_string("group1"), "top");
        assert_eq!(material.eval_string("shop_materialpath1"), "/mat/glass");
        assert_eq!(
            loader.child("OUT").unwrap().inputs.get(&0).map(String::as_str),
            Some(SPLIT_MATERIAL_NODE)
        );
    }

    #[test]
    fn failed_reimport_keeps_loaders_and_materials() {
        let temp = tempdir().expect("failed to create temp dir");
        let importer = SetDressImporter::from_config(&config_in(&temp));
        let mut node = set_dress_node();
        importer.import_set_dress(&mut node, &[point(0, "table", 2)]).unwrap();
        node.child_mut("table_002").unwrap().children.push(
            MemoryNode::new("material", SPLIT_MATERIAL_NODE)
                .with_parm("num_materials", 1_i64)
                .with_parm("group1", "top")
                .with_parm("shop_materialpath1", "/mat/glass"),
        );
        let before = node.clone();

        let publish = importer.resolver().publish_path("Prop", "table", "modeling");
        fs::create_dir_all(format!("{publish}/v001/caches")).unwrap();
        fs::write(format!("{publish}/v001/caches/table.abc"), b"abc").unwrap();
        fs::write(format!("{publish}/v001/caches/table_old.abc"), b"abc").unwrap();

        let err = importer
            .import_set_dress(&mut node, &[point(0, "table", 2)])
            .unwrap_err();
        assert!(matches!(err, PipelineError::AmbiguousCache { count: 2, .. }));
        assert_eq!(node, before);
    }

    #[test]
    fn rejects_points_not_numbered_from_zero() {
        let importer = SetDressImporter::from_config(&PipelineConfig::default());
        for points in [
            vec![point(5, "chair", 1)],
            vec![point(0, "chair", 1), point(0, "lamp", 2)],
            vec![point(0, "chair", 1), point(2, "lamp", 2)],
        ] {
            let mut node = set_dress_node();
            let err = importer.import_set_dress(&mut node, &points).unwrap_err();
            assert!(matches!(err, PipelineError::InvalidPointNumbers { .. }));
            assert_eq!(node, set_dress_node());
        }
    }

    #[test]
    fn accepts_points_in_any_order() {
        let temp = tempdir().expect("failed to create temp dir");
        let importer = SetDressImporter::from_config(&config_in(&temp));
        let mut node = set_dress_node();

        importer
            .import_set_dress(&mut node, &[point(1, "lamp", 2), point(0, "chair", 1)])
            .unwrap();
        assert_eq!(node.eval_string("assetName1"), "lamp");
        assert!(node.child("chair_001").is_some());
        assert!(node.child("lamp_002").is_some());
    }
}
