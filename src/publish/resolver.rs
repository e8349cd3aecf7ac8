use std::path::Path;

use crate::error::PipelineResult;
use crate::models::{AssetRecord, AssetRequest};
use crate::project::PublishLayout;

use super::locator::locate_single_file;
use super::template::{substitute_tokens, unresolved_tokens};
use super::versions::latest_published_version;

/// Resolves assets to the cache file of their latest publish.
#[derive(Debug, Clone, Default)]
pub struct AssetResolver {
    layout: PublishLayout,
}

impl AssetResolver {
    /// Create a resolver for the provided layout.
    pub fn new(layout: PublishLayout) -> Self {
        Self { layout }
    }

    /// Layout the resolver substitutes into.
    pub fn layout(&self) -> &PublishLayout {
        &self.layout
    }

    /// Publish directory of one asset step.
    pub fn publish_path(&self, asset_type: &str, asset_name: &str, step: &str) -> String {
        let tokens = self.layout.tokens(asset_type, asset_name, step);
        let path = substitute_tokens(&self.layout.asset_folder_template, &tokens);
        let leftover = unresolved_tokens(&path);
        if !leftover.is_empty() {
            log::warn!("publish template left placeholders {leftover:?} in {path}");
        }
        path
    }

    /// Find the latest version of an asset step and the cache file it holds.
    ///
    /// An asset that was never published resolves to version `"000"` and the caches
    /// directory of that version, mirroring what artists see on disk.
    pub fn resolve(&self, request: &AssetRequest) -> PipelineResult<AssetRecord> {
        let publish_path =
            self.publish_path(&request.asset_type, &request.asset_name, &request.asset_step);
        let version =
            latest_published_version(Path::new(&publish_path), &self.layout.version_prefix)?;
        let caches_path = self.layout.caches_path(&publish_path, &version);
        let file_name = locate_single_file(Path::new(&caches_path), self.layout.locator_policy)?;

        let resolved_path = match &file_name {
            Some(name) => format!("{caches_path}/{name}"),
            None => {
                log::warn!(
                    "no cache published for {} {} ({})",
                    request.asset_name,
                    request.asset_step,
                    caches_path
                );
                caches_path
            }
        };

        log::debug!(
            "resolved {}_{:03} to {}",
            request.asset_name,
            request.asset_instance,
            resolved_path
        );

        Ok(AssetRecord {
            asset_type: request.asset_type.clone(),
            asset_name: request.asset_name.clone(),
            asset_instance: request.asset_instance,
            asset_step: request.asset_step.clone(),
            publish_path,
            version,
            file_name,
            resolved_path,
        })
    }
}
