use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// How a version cache directory is reduced to a single file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorPolicy {
    /// Take whatever entry the directory listing yields first.
    FirstEntry,
    /// Require the directory to hold exactly one entry.
    #[default]
    ExactlyOne,
}

/// Return the name of the cache file stored in `dir`.
///
/// A missing or empty directory yields `Ok(None)`. With [`LocatorPolicy::ExactlyOne`] a
/// directory holding several entries is reported as [`PipelineError::AmbiguousCache`].
pub fn locate_single_file(dir: &Path, policy: LocatorPolicy) -> PipelineResult<Option<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(PipelineError::Io {
                path: dir.to_path_buf(),
                source: err,
            });
        }
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PipelineError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        names.push(entry.file_name().to_string_lossy().to_string());
        if policy == LocatorPolicy::FirstEntry {
            break;
        }
    }

    match (policy, names.len()) {
        (_, 0) => Ok(None),
        (LocatorPolicy::ExactlyOne, count) if count > 1 => Err(PipelineError::AmbiguousCache {
            path: dir.to_path_buf(),
            count,
        }),
        _ => Ok(names.into_iter().next()),
    }
}
