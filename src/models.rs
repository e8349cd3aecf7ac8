//! Data structures exchanged between the resolver, the scene helpers and the CLI.

use serde::{Deserialize, Serialize};

/// `paths` value marking a material bound to a whole object rather than to groups.
pub const WHOLE_OBJECT_PATHS: &str = "#";

/// Asset to resolve against the publish layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRequest {
    /// Asset category such as `Prop` or `Set`.
    pub asset_type: String,
    /// Asset name as published.
    pub asset_name: String,
    /// Instance number of the asset within the set dressing.
    pub asset_instance: u32,
    /// Pipeline step whose publish should be used.
    pub asset_step: String,
}

/// Outcome of resolving one asset against the publish layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    /// Asset category such as `Prop` or `Set`.
    pub asset_type: String,
    /// Asset name as published.
    pub asset_name: String,
    /// Instance number of the asset within the set dressing.
    pub asset_instance: u32,
    /// Pipeline step the publish was looked up for.
    pub asset_step: String,
    /// Publish directory the versions were scanned in.
    pub publish_path: String,
    /// Selected version suffix, `"000"` when nothing was published.
    pub version: String,
    /// Cache file name found in the version directory.
    pub file_name: Option<String>,
    /// Cache file path, or the caches directory when no file was found.
    pub resolved_path: String,
}

impl AssetRecord {
    /// Instance number formatted the way node names and parameters expect it.
    pub fn padded_instance(&self) -> String {
        format!("{:03}", self.asset_instance)
    }
}

/// One material binding of an object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MaterialBinding {
    /// Primitive groups the material applies to, or `"#"` for the whole object.
    pub paths: String,
    /// Path of the material node.
    pub sop_materialpath: String,
}

impl MaterialBinding {
    /// Returns `true` when the binding covers the whole object.
    pub fn is_whole_object(&self) -> bool {
        self.paths == WHOLE_OBJECT_PATHS
    }
}

/// All material bindings of one generated asset node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MaterialAssignment {
    /// Name of the asset node.
    pub obj: String,
    /// Bindings in material slot order.
    pub materials: Vec<MaterialBinding>,
}

/// Per-point attributes carried by a set-dress cache.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDressPoint {
    /// Point number, used to index the per-asset parameters.
    pub number: usize,
    /// Asset name attribute.
    pub asset_name: String,
    /// Asset instance attribute.
    pub asset_instance: u32,
    /// Asset type attribute.
    pub asset_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_round_trip_through_json() {
        let assignments = vec![
            MaterialAssignment {
                obj: "chair_001".into(),
                materials: vec![MaterialBinding {
                    paths: WHOLE_OBJECT_PATHS.into(),
                    sop_materialpath: "/mat/wood".into(),
                }],
            },
            MaterialAssignment {
                obj: "table_002".into(),
                materials: vec![
                    MaterialBinding {
                        paths: "legs".into(),
                        sop_materialpath: "/mat/metal".into(),
                    },
                    MaterialBinding {
                        paths: "top".into(),
                        sop_materialpath: "/mat/glass".into(),
                    },
                ],
            },
        ];

        let json = serde_json::to_string_pretty(&assignments).unwrap();
        let parsed: Vec<MaterialAssignment> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, assignments);
    }

    #[test]
    fn parses_the_shader_file_format() {
        let parsed: Vec<MaterialAssignment> = serde_json::from_str(
            r##"[{"obj": "lamp_003", "materials": [{"paths": "#", "sop_materialpath": "/mat/brass"}]}]"##,
        )
        .unwrap();

        assert_eq!(parsed[0].obj, "lamp_003");
        assert!(parsed[0].materials[0].is_whole_object());
    }

    #[test]
    fn pads_instance_numbers() {
        let record = AssetRecord {
            asset_type: "Prop".into(),
            asset_name: "chair".into(),
            asset_instance: 7,
            asset_step: "modeling".into(),
            publish_path: String::new(),
            version: "000".into(),
            file_name: None,
            resolved_path: String::new(),
        };
        assert_eq!(record.padded_instance(), "007");
    }
}
