use crate::error::{PipelineError, PipelineResult};

/// Split a namespaced object name into asset name and instance number.
///
/// The first path component of a long name carries the reference namespace, e.g.
/// `|chair_basic_003:main_SRT_global|chair_basic_003:main_SRT_local` yields
/// `("chair_basic", 3)`.
pub fn asset_name_and_instance(long_name: &str) -> PipelineResult<(String, u32)> {
    let invalid = || PipelineError::InvalidNamespace(long_name.to_string());

    let top = long_name
        .split('|')
        .find(|segment| !segment.is_empty())
        .ok_or_else(invalid)?;
    let namespace = top.split(':').next().unwrap_or(top);
    let (name, instance) = namespace.rsplit_once('_').ok_or_else(invalid)?;
    if name.is_empty() {
        return Err(invalid());
    }
    let instance = instance.parse().map_err(|_| invalid())?;

    Ok((name.to_string(), instance))
}

/// Drop the `{n}` copy number Maya appends to references loaded more than once.
pub fn strip_copy_number(reference_path: &str) -> &str {
    reference_path
        .split_once('{')
        .map_or(reference_path, |(path, _)| path)
}

/// Asset type folder of a referenced asset scene, e.g. `Prop` in
/// `O:/shows/IZES/assets/Prop/chair/...`.
pub fn asset_type_from_reference(reference_path: &str) -> Option<&str> {
    reference_path
        .split('/')
        .nth(4)
        .filter(|segment| !segment.is_empty())
}

/// Returns `true` for rig controllers, i.e. descendants that are neither shapes nor groups.
pub fn is_controller(name: &str) -> bool {
    !name.contains("Shape") && !name.contains("GRP")
}
