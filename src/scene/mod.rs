//! Host scene graph seen as named nodes carrying named parameters.
//!
//! The pipeline never inspects host internals: it reads and writes parameters, creates and
//! destroys children and wires inputs, all by name. [`SceneNode`] captures exactly those
//! capabilities so a DCC binding and the in-memory [`MemoryNode`] are interchangeable.

mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PipelineResult;

pub use memory::MemoryNode;

/// Value stored in a node parameter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ParmValue {
    /// Integer parameter, also used for toggles and multiparm counts.
    Int(i64),
    /// String parameter.
    String(String),
    /// Channel reference to another parameter, relative to the node holding it.
    Reference {
        /// Path of the referenced parameter.
        reference: String,
    },
}

impl ParmValue {
    /// Reference to the parameter `parm` on the parent node.
    pub fn parent_reference(parm: &str) -> Self {
        Self::Reference {
            reference: format!("../{parm}"),
        }
    }

    /// Integer view of the value, parsing strings when needed.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::String(value) => value.trim().parse().ok(),
            Self::Reference { .. } => None,
        }
    }
}

impl fmt::Display for ParmValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
            Self::Reference { reference } => write!(f, "chs(\"{reference}\")"),
        }
    }
}

impl From<&str> for ParmValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParmValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ParmValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Capabilities the pipeline needs from a host node.
pub trait SceneNode: Sized {
    /// Node name, unique among its siblings.
    fn name(&self) -> &str;

    /// Returns `true` for a locked digital asset, whose material is set on the asset itself.
    fn is_locked_asset(&self) -> bool;

    /// Current value of a parameter.
    fn parm(&self, name: &str) -> Option<ParmValue>;

    /// Set a parameter value.
    fn set_parm(&mut self, name: &str, value: ParmValue) -> PipelineResult<()>;

    /// Names of the direct children, in creation order.
    fn child_names(&self) -> Vec<String>;

    /// Direct child by name.
    fn child(&self, name: &str) -> Option<&Self>;

    /// Mutable direct child by name.
    fn child_mut(&mut self, name: &str) -> Option<&mut Self>;

    /// Create a child node of the given type.
    fn create_child(&mut self, kind: &str, name: &str) -> PipelineResult<&mut Self>;

    /// Destroy a child node and everything under it.
    fn destroy_child(&mut self, name: &str) -> PipelineResult<()>;

    /// Connect the sibling named `source` to input `index`.
    fn set_input(&mut self, index: usize, source: &str) -> PipelineResult<()>;

    /// Unlock the contents of a digital asset so children can be edited.
    fn allow_editing_of_contents(&mut self);

    /// Arrange the children in the network view.
    fn layout_children(&mut self);

    /// Trigger a button parameter.
    fn press_button(&mut self, name: &str) -> PipelineResult<()>;

    /// Parameter evaluated as a string, empty when it does not exist.
    fn eval_string(&self, name: &str) -> String {
        self
            .parm(name)
            .map(|value| value.to_string())
            .unwrap_or_default()
    }

    /// Parameter evaluated as an integer.
    fn eval_int(&self, name: &str) -> Option<i64> {
        self.parm(name).and_then(|value| value.as_int())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_values_as_strings() {
        assert_eq!(ParmValue::from("a").to_string(), "a");
        assert_eq!(ParmValue::from(3_i64).to_string(), "3");
        assert_eq!(
            ParmValue::parent_reference("assetPath0").to_string(),
            "chs(\"../assetPath0\")"
        );
    }

    #[test]
    fn parses_integers_from_strings() {
        assert_eq!(ParmValue::from(" 4 ").as_int(), Some(4));
        assert_eq!(ParmValue::from("four").as_int(), None);
    }

    #[test]
    fn deserializes_untagged_values() {
        let values: Vec<ParmValue> =
            serde_json::from_str(r#"[3, "/mat/wood", {"reference": "../assetPath1"}]"#).unwrap();
        assert_eq!(values, vec![
            ParmValue::Int(3),
            ParmValue::String("/mat/wood".into()),
            ParmValue::parent_reference("assetPath1"),
        ]);
    }
}
