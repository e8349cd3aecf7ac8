//! Owned description of the publish layout used by the resolver.

use crate::publish::{LocatorPolicy, TokenMap};

/// Studio layout parameters needed to locate published asset caches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishLayout {
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
    /// How a version cache directory is reduced to one file.
    pub locator_policy: LocatorPolicy,
}

impl PublishLayout {
    /// Token values for one asset step, including the layout-wide drive and project.
    pub fn tokens(&self, asset_type: &str, asset: &str, step: &str) -> TokenMap {
        let mut tokens = TokenMap::new();
        tokens.insert("drive".into(), self.drive.clone());
        tokens.insert("project".into(), self.project.clone());
        tokens.insert("assetType".into(), asset_type.into());
        tokens.insert("asset".into(), asset.into());
        tokens.insert("step".into(), step.into());
        tokens
    }

    /// Directory holding the cache of a given version inside a publish directory.
    pub fn caches_path(&self, publish_path: &str, version: &str) -> String {
        format!(
            "{}/{}{}/{}",
            publish_path.trim_end_matches('/'),
            self.version_prefix,
            version,
            self.caches_dir
        )
    }
}

impl Default for PublishLayout {
    fn default() -> Self {
        crate::config::PipelineConfig::default().into_layout()
    }
}
