use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// Value of a custom attribute written on an exported shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// `long` attribute.
    Int(i64),
    /// `string` attribute.
    String(String),
}

/// Capabilities the exporter needs from a Maya scene.
pub trait MayaScene {
    /// Currently selected objects.
    fn selection(&self) -> Vec<String>;

    /// Returns `true` when an object with that name exists.
    fn exists(&self, name: &str) -> bool;

    /// Full DAG path of an object.
    fn long_name(&self, name: &str) -> Option<String>;

    /// Shape nodes under a transform.
    fn shapes(&self, transform: &str) -> Vec<String>;

    /// Every descendant of an object.
    fn descendants(&self, name: &str) -> Vec<String>;

    /// File of the reference an object was loaded from, if any.
    fn reference_file(&self, name: &str) -> Option<String>;

    /// Current value of a custom attribute.
    fn attribute(&self, name: &str, attribute: &str) -> Option<AttrValue>;

    /// Set a custom attribute, adding it first when the object does not have it.
    fn set_attribute(
        &mut self,
        name: &str,
        attribute: &str,
        value: AttrValue,
    ) -> PipelineResult<()>;
}

/// Object stored in a [`MemoryMayaScene`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MayaObject {
    /// Full DAG path, defaults to `|<name>`.
    pub long_name: Option<String>,
    /// Shape nodes under the object.
    pub shapes: Vec<String>,
    /// Every descendant of the object.
    pub descendants: Vec<String>,
    /// Reference file the object was loaded from.
    pub reference_file: Option<String>,
    /// Custom attributes.
    pub attributes: BTreeMap<String, AttrValue>,
}

/// In-memory Maya scene, serialisable as a JSON snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MemoryMayaScene {
    /// Selected object names.
    pub selection: Vec<String>,
    /// Objects by name.
    pub objects: BTreeMap<String, MayaObject>,
}

impl MemoryMayaScene {
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

impl MayaScene for MemoryMayaScene {
    fn selection(&self) -> Vec<String> {
        self.selection.clone()
    }

    fn exists(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    fn long_name(&self, name: &str) -> Option<String> {
        let object = self.objects.get(name)?;
        Some(object.long_name.clone().unwrap_or_else(|| format!("|{name}")))
    }

    fn shapes(&self, transform: &str) -> Vec<String> {
        self.objects
            .get(transform)
            .map(|object| object.shapes.clone())
            .unwrap_or_default()
    }

    fn descendants(&self, name: &str) -> Vec<String> {
        self.objects
            .get(name)
            .map(|object| object.descendants.clone())
            .unwrap_or_default()
    }

    fn reference_file(&self, name: &str) -> Option<String> {
        self.objects.get(name)?.reference_file.clone()
    }

    fn attribute(&self, name: &str, attribute: &str) -> Option<AttrValue> {
        self.objects.get(name)?.attributes.get(attribute).cloned()
    }

    fn set_attribute(
        &mut self,
        name: &str,
        attribute: &str,
        value: AttrValue,
    ) -> PipelineResult<()> {
        let object = self
            .objects
            .get_mut(name)
            .ok_or_else(|| PipelineError::NodeNotFound(name.to_string()))?;
        object.attributes.insert(attribute.to_string(), value);
        Ok(())
    }
}
