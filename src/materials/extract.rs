use crate::models::{MaterialAssignment, MaterialBinding, WHOLE_OBJECT_PATHS};
use crate::scene::SceneNode;

/// Name of the material node holding per-group assignments inside an asset node.
pub const SPLIT_MATERIAL_NODE: &str = "material1";

/// Material layout found on an asset node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialShape {
    /// One material on the whole object, set on the locked asset itself.
    WholeObject(MaterialBinding),
    /// Materials bound per primitive group through the split material node.
    Split(Vec<MaterialBinding>),
}

impl MaterialShape {
    fn into_bindings(self) -> Vec<MaterialBinding> {
        match self {
            Self::WholeObject(binding) => vec![binding],
            Self::Split(bindings) => bindings,
        }
    }
}

/// Work out how materials are assigned on an asset node.
///
/// Returns `None` when the node is neither a locked asset nor carries a split material node.
pub fn classify_material<N: SceneNode>(node: &N) -> Option<MaterialShape> {
    if node.is_locked_asset() {
        return Some(MaterialShape::WholeObject(MaterialBinding {
            paths: WHOLE_OBJECT_PATHS.to_string(),
            sop_materialpath: node.eval_string("shop_materialpath"),
        }));
    }

    let material = node.child(SPLIT_MATERIAL_NODE)?;
    let count = material.eval_int("num_materials").unwrap_or(0).max(0);
    let bindings = (1..=count)
        .map(|slot| MaterialBinding {
            paths: material.eval_string(&format!("group{slot}")),
            sop_materialpath: material.eval_string(&format!("shop_materialpath{slot}")),
        })
        .collect();
    Some(MaterialShape::Split(bindings))
}

/// Collect the material assignments of every generated asset under `root`.
///
/// Processing nodes are skipped. Nodes whose material layout cannot be classified are
/// reported and left out so the rest of the batch is still captured.
pub fn extract_assignments<N: SceneNode>(
    root: &N,
    processing_nodes: &[String],
) -> Vec<MaterialAssignment> {
    let mut assignments = Vec::new();

    for name in root.child_names() {
        if processing_nodes.contains(&name) {
            continue;
        }
        let Some(child) = root.child(&name) else {
            continue;
        };

        match classify_material(child) {
            Some(shape) => assignments.push(MaterialAssignment {
                obj: name,
                materials: shape.into_bindings(),
            }),
            None => log::error!("failed to get material for {name}"),
        }
    }

    assignments
}
