//! Material assignment capture and re-application for generated asset nodes.

mod apply;
mod extract;
mod io;

pub use apply::apply_assignments;
pub use extract::{MaterialShape, SPLIT_MATERIAL_NODE, classify_material, extract_assignments};
pub use io::{
    assignments_to_json, export_shaders, import_shaders, read_assignments, write_assignments,
};
