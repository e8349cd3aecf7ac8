//! Maya-side set-dress export.
//!
//! A single pass over the selection produces an immutable [`ExportPlan`]: the SRT roots to
//! cache, the custom attributes each referenced asset gets, and the Alembic job string.
//! Writing the attributes back goes through the [`MayaScene`] trait.

mod naming;
mod plan;
mod scene;

pub use naming::{
    asset_name_and_instance, asset_type_from_reference, is_controller, strip_copy_number,
};
pub use plan::{
    ALEMBIC_JOB_TEMPLATE, AssetAttributes, ExportPlan, ExportSettings, SRT_GLOBAL, SRT_LOCAL,
    apply_export_plan, plan_export,
};
pub use scene::{AttrValue, MayaObject, MayaScene, MemoryMayaScene};
