//! Houdini-side set-dress tooling: cache import, generated asset loaders and MaterialX publishing.

mod import;
mod mtlx;

pub use import::{LOADER_NODE_TYPE, SET_DRESS_GEOMETRY, SetDressImporter};
pub use mtlx::{
    EXPORT_NETWORK, EXPORT_OUTPUT, MtlxExportJob, MtlxExportPlan, materialx_publish_dir,
    plan_materialx_export, run_materialx_export,
};
