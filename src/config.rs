//! Pipeline configuration loader describing the studio publish layout.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::project::PublishLayout;
use crate::publish::LocatorPolicy;

/// File name searched for when discovering configuration in a directory.
pub const DEFAULT_CONFIG_FILE: &str = "setdress.config.json";

/// Discoverable configuration describing where publishes live and how they are named.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Drive letter substituted for `<drive>`.
    pub drive: String,
    /// Project code substituted for `<project>`.
    pub project: String,
    /// Template of the publish directory of one asset step.
    pub asset_folder_template: String,
    /// Prefix of version folder names.
    pub version_prefix: String,
    /// Directory inside a version folder holding the cache file.
    pub caches_dir: String,
    /// Shader assignment file written next to the scene file.
    pub shaders_file: String,
    /// Children of the set-dress node that are never generated assets.
    pub processing_nodes: Vec<String>,
    /// Step used when a point has no step parameter set.
    pub default_step: String,
    /// Asset type used for objects that are not referenced.
    pub default_asset_type: String,
    /// How a version cache directory is reduced to one file.
    pub locator_policy: LocatorPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            drive: "O".into(),
            project: "IZES".into(),
            asset_folder_template: "<drive>:/shows/<project>/assets/<assetType>/<asset>/publishs/<step>"
                .into(),
            version_prefix: "v".into(),
            caches_dir: "caches".into(),
            shaders_file: "shaders.json".into(),
            processing_nodes: vec!["IMPORT_SET_DRESS".into(), "EXPORT_MTLX".into()],
            default_step: "modeling".into(),
            default_asset_type: "Prop".into(),
            locator_policy: LocatorPolicy::ExactlyOne,
        }
    }
}

impl PipelineConfig {
    /// Attempt to load configuration from the provided directory.
    ///
    /// A missing or unparsable file yields the default studio layout.
    pub fn discover(dir: &Path) -> Self {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        match Self::from_path(&candidate) {
            Some(config) => {
                log::debug!("loaded pipeline config from {}", candidate.display());
                config
            }
            None => Self::default(),
        }
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&content) {
            Ok(config) => Some(config),
            Err(err) => {
                log::warn!("ignoring invalid config {}: {}", path.display(), err);
                None
            }
        }
    }

    /// Convert the configuration into an owned layout description.
    pub fn into_layout(self) -> PublishLayout {
        PublishLayout {
            drive: self.drive,
            project: self.project,
            asset_folder_template: self.asset_folder_template,
            version_prefix: self.version_prefix,
            caches_dir: self.caches_dir,
            locator_policy: self.locator_policy,
        }
    }

    /// Borrowing conversion into a layout, cloning the underlying strings.
    pub fn to_layout(&self) -> PublishLayout {
        self.clone().into_layout()
    }

    /// Location of the shader assignment file for a scene file.
    pub fn shaders_file_for(&self, scene_file: &Path) -> PathBuf {
        scene_file
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&self.shaders_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discover_falls_back_to_defaults() {
        let temp = tempdir().expect("failed to create temp dir");
        let config = PipelineConfig::discover(temp.path());
        assert_eq!(config.drive, "O");
        assert_eq!(config.project, "IZES");
        assert_eq!(config.locator_policy, LocatorPolicy::ExactlyOne);
    }

    #[test]
    fn discover_reads_partial_overrides() {
        let temp = tempdir().expect("failed to create temp dir");
        fs::write(
            temp.path().join(DEFAULT_CONFIG_FILE),
            r#"{"project": "KITE", "locator_policy": "first_entry"}"#,
        )
        .expect("failed to write config");

        let config = PipelineConfig::discover(temp.path());
        assert_eq!(config.project, "KITE");
        assert_eq!(config.drive, "O");
        assert_eq!(config.locator_policy, LocatorPolicy::FirstEntry);
    }

    #[test]
    fn invalid_config_is_ignored() {
        let temp = tempdir().expect("failed to create temp dir");
        fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();
        let config = PipelineConfig::discover(temp.path());
        assert_eq!(config.shaders_file, "shaders.json");
    }

    #[test]
    fn shaders_file_sits_next_to_scene() {
        let config = PipelineConfig::default();
        let path = config.shaders_file_for(Path::new("/work/shot/layout.hip"));
        assert_eq!(path, PathBuf::from("/work/shot/shaders.json"));
    }
}
