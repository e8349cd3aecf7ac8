use crate::error::{PipelineError, PipelineResult};
use crate::models::MaterialAssignment;
use crate::scene::{ParmValue, SceneNode};

use super::extract::SPLIT_MATERIAL_NODE;

/// Node feeding the split material node inside an asset.
const MATERIAL_INPUT_NODE: &str = "attribwrangle1";
/// Output node of an asset network.
const OUTPUT_NODE: &str = "OUT";

/// Re-apply material assignments onto the matching children of `root`.
///
/// Assignments naming objects that do not exist are skipped. Returns how many objects were
/// updated.
pub fn apply_assignments<N: SceneNode>(
    root: &mut N,
    assignments: &[MaterialAssignment],
) -> PipelineResult<usize> {
    let mut applied = 0;

    for assignment in assignments {
        let Some(target) = root.child_mut(&assignment.obj) else {
            log::debug!("no node named {} to assign materials to", assignment.obj);
            continue;
        };

        let slot_count = i64::try_from(assignment.materials.len()).unwrap_or(i64::MAX);
        for (index, binding) in assignment.materials.iter().enumerate() {
            if binding.is_whole_object() {
                target.set_parm(
                    "shop_materialpath",
                    ParmValue::from(binding.sop_materialpath.as_str()),
                )?;
                continue;
            }

            let material = ensure_split_material(target)?;
            let slot = index + 1;
            material.set_parm("num_materials", ParmValue::Int(slot_count))?;
            material.set_parm(&format!("group{slot}"), ParmValue::from(binding.paths.as_str()))?;
            material.set_parm(
                &format!("shop_materialpath{slot}"),
                ParmValue::from(binding.sop_materialpath.as_str()),
            )?;
        }

        applied += 1;
    }

    Ok(applied)
}

/// Return the split material node of an asset, creating and wiring it when missing.
fn ensure_split_material<N: SceneNode>(target: &mut N) -> PipelineResult<&mut N> {
    let target_name = target.name().to_string();
    if target.child(SPLIT_MATERIAL_NODE).is_none() {
        target.allow_editing_of_contents();
        target
            .create_child("material", SPLIT_MATERIAL_NODE)?
            .set_input(0, MATERIAL_INPUT_NODE)?;
        target
            .child_mut(OUTPUT_NODE)
            .ok_or_else(|| PipelineError::NodeNotFound(format!("{target_name}/{OUTPUT_NODE}")))?
            .set_input(0, SPLIT_MATERIAL_NODE)?;
        target.layout_children();
    }

    target
        .child_mut(SPLIT_MATERIAL_NODE)
        .ok_or_else(|| PipelineError::NodeNotFound(format!("{target_name}/{SPLIT_MATERIAL_NODE}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::extract_assignments;
    use crate::models::MaterialBinding;
    use crate::scene::MemoryNode;

    fn binding(paths: &str, material: &str) -> MaterialBinding {
        MaterialBinding {
            paths: paths.into(),
            sop_materialpath: material.into(),
        }
    }

    fn bare_asset(name: &str) -> MemoryNode {
        MemoryNode::new("loadAsset", name)
            .with_child(MemoryNode::new("alembic", "alembic1"))
            .with_child(MemoryNode::new("attribwrangle", MATERIAL_INPUT_NODE))
            .with_child(MemoryNode::new("output", OUTPUT_NODE))
    }

    #[test]
    fn creates_one_material_node_for_split_assignments() {
        let mut root = MemoryNode::new("subnet", "SET_DRESS").with_child(bare_asset("table_002"));
        let assignment = MaterialAssignment {
            obj: "table_002".into(),
            materials: vec![
                binding("legs", "/mat/metal"),
                binding("top", "/mat/glass"),
                binding("drawer", "/mat/wood"),
            ],
        };

        let applied = apply_assignments(&mut root, &[assignment]).unwrap();
        assert_eq!(applied, 1);

        let target = root.child("table_002").unwrap();
        let materials: Vec<&MemoryNode> = target
            .children
            .iter()
            .filter(|child| child.kind == "material")
            .collect();
        assert_eq!(materials.len(), 1);

        let material = materials[0];
        assert_eq!(material.name, SPLIT_MATERIAL_NODE);
        assert_eq!(material.eval_int("num_materials"), Some(3));
        assert_eq!(material.eval_string("group1"), "legs");
        assert_eq!(material.eval_string("group3"), "drawer");
        assert_eq!(material.eval_string("shop_materialpath2"), "/mat/glass");
        assert_eq!(material.inputs.get(&0).map(String::as_str), Some(MATERIAL_INPUT_NODE));
        assert_eq!(
            target.child(OUTPUT_NODE).unwrap().inputs.get(&0).map(String::as_str),
            Some(SPLIT_MATERIAL_NODE)
        );
        assert!(target.editable);
        assert!(target.laid_out);
    }

    #[test]
    fn whole_object_binding_sets_asset_parameter() {
        let mut root = MemoryNode::new("subnet", "SET_DRESS")
            .with_child(MemoryNode::new("loadAsset", "chair_001").locked());
        let assignment = MaterialAssignment {
            obj: "chair_001".into(),
            materials: vec![binding("#", "/mat/wood")],
        };

        apply_assignments(&mut root, &[assignment]).unwrap();
        let target = root.child("chair_001").unwrap();
        assert_eq!(target.eval_string("shop_materialpath"), "/mat/wood");
        assert!(target.child(SPLIT_MATERIAL_NODE).is_none());
    }

    #[test]
    fn unknown_objects_are_skipped() {
        let mut root = MemoryNode::new("subnet", "SET_DRESS");
        let assignment = MaterialAssignment {
            obj: "ghost_001".into(),
            materials: vec![binding("#", "/mat/wood")],
        };
        assert_eq!(apply_assignments(&mut root, &[assignment]).unwrap(), 0);
    }

    #[test]
    fn missing_output_node_is_reported() {
        let mut root = MemoryNode::new("subnet", "SET_DRESS")
            .with_child(MemoryNode::new("loadAsset", "crate_004"));
        let assignment = MaterialAssignment {
            obj: "crate_004".into(),
            materials: vec![binding("lid", "/mat/wood")],
        };

        let err = apply_assignments(&mut root, &[assignment]).unwrap_err();
        assert!(matches!(err, PipelineError::NodeNotFound(_)));
    }

    #[test]
    fn extract_apply_extract_is_stable() {
        let processing = vec!["IMPORT_SET_DRESS".to_string()];
        let mut root = MemoryNode::new("subnet", "SET_DRESS")
            .with_child(MemoryNode::new("alembic", "IMPORT_SET_DRESS"))
            .with_child(
                MemoryNode::new("loadAsset", "chair_001")
                    .locked()
                    .with_parm("shop_materialpath", "/mat/wood"),
            )
            .with_child(bare_asset("table_002"));
        apply_assignments(&mut root, &[MaterialAssignment {
            obj: "table_002".into(),
            materials: vec![binding("legs", "/mat/metal"), binding("top", "/mat/glass")],
        }])
        .unwrap();

        let first = extract_assignments(&root, &processing);
        let snapshot = root.clone();
        apply_assignments(&mut root, &first).unwrap();
        let second = extract_assignments(&root, &processing);

        assert_eq!(first, second);
        assert_eq!(root, snapshot);
    }
}
