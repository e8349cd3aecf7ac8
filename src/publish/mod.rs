//! Publish-path resolution for versioned asset caches.
//!
//! A publish directory is produced from a token template, its `v###` folders are scanned and
//! compared numerically, and the cache file of the latest version is located. Each concern
//! lives in its own submodule so the pieces can be reused on their own, e.g. the template
//! substitution also renders the Alembic export job.

mod locator;
mod resolver;
mod template;
mod versions;

pub use locator::{LocatorPolicy, locate_single_file};
pub use resolver::AssetResolver;
pub use template::{TokenMap, substitute_tokens, unresolved_tokens};
pub use versions::{
    SENTINEL_VERSION, VersionToken, latest_published_version, latest_version, next_version,
    scan_versions, version_folder,
};
