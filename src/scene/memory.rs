//! In-memory scene graph used by the CLI snapshots and the tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::scene::{ParmValue, SceneNode};

/// Node of an in-memory scene graph, serialisable as a JSON snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MemoryNode {
    /// Node name.
    pub name: String,
    /// Operator type the node was created with.
    pub kind: String,
    /// Whether the node is a locked digital asset.
    pub locked: bool,
    /// Whether the contents were unlocked for editing.
    pub editable: bool,
    /// Parameter values by name.
    pub parms: BTreeMap<String, ParmValue>,
    /// Input connections by input index, naming sibling nodes.
    pub inputs: BTreeMap<usize, String>,
    /// Child nodes in creation order.
    pub children: Vec<MemoryNode>,
    /// Buttons pressed on the node, oldest first.
    pub pressed: Vec<String>,
    /// Whether the children were laid out since the last structural change.
    pub laid_out: bool,
    /// Default contents of children created with a given operator type.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub templates: BTreeMap<String, MemoryNode>,
}

impl MemoryNode {
    /// Create an empty node.
    pub fn new(kind: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            ..Self::default()
        }
    }

    /// Builder helper adding a parameter.
    pub fn with_parm(mut self, name: &str, value: impl Into<ParmValue>) -> Self {
        self.parms.insert(name.to_string(), value.into());
        self
    }

    /// Builder helper adding a child.
    pub fn with_child(mut self, child: MemoryNode) -> Self {
        self.children.push(child);
        self
    }

    /// Builder helper registering the default contents of an operator type.
    pub fn with_template(mut self, template: MemoryNode) -> Self {
        self.templates.insert(template.kind.clone(), template);
        self
    }

    /// Builder helper marking the node as a locked digital asset.
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Load a scene snapshot from a JSON file.
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| PipelineError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the scene snapshot as prettified JSON.
    pub fn save(&self, path: &Path) -> PipelineResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| PipelineError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| PipelineError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl SceneNode for MemoryNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_locked_asset(&self) -> bool {
        self.locked
    }

    fn parm(&self, name: &str) -> Option<ParmValue> {
        self.parms.get(name).cloned()
    }

    fn set_parm(&mut self, name: &str, value: ParmValue) -> PipelineResult<()> {
        self.parms.insert(name.to_string(), value);
        Ok(())
    }

    fn child_names(&self) -> Vec<String> {
        self.children.iter().map(|child| child.name.clone()).collect()
    }

    fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.name == name)
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut Self> {
        self.children.iter_mut().find(|child| child.name == name)
    }

    fn create_child(&mut self, kind: &str, name: &str) -> PipelineResult<&mut Self> {
        if self.child(name).is_some() {
            return Err(PipelineError::NodeExists(format!("{}/{}", self.name, name)));
        }
        let mut child = self.templates.get(kind).cloned().unwrap_or_default();
        child.name = name.to_string();
        child.kind = kind.to_string();
        self.laid_out = false;
        self.children.push(child);
        let index = self.children.len() - 1;
        Ok(&mut self.children[index])
    }

    fn destroy_child(&mut self, name: &str) -> PipelineResult<()> {
        let before = self.children.len();
        self.children.retain(|child| child.name != name);
        if self.children.len() == before {
            return Err(PipelineError::NodeNotFound(format!("{}/{}", self.name, name)));
        }
        Ok(())
    }

    fn set_input(&mut self, index: usize, source: &str) -> PipelineResult<()> {
        self.inputs.insert(index, source.to_string());
        Ok(())
    }

    fn allow_editing_of_contents(&mut self) {
        self.editable = true;
    }

    fn layout_children(&mut self) {
        self.laid_out = true;
    }

    fn press_button(&mut self, name: &str) -> PipelineResult<()> {
        self.pressed.push(name.to_string());
        Ok(())
    }
}
