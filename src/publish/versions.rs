use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};

/// Version reported when a publish directory holds no usable version folder.
pub const SENTINEL_VERSION: &str = "000";

/// Version suffix of a version folder together with its numeric value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionToken {
    raw: String,
    number: u32,
}

impl VersionToken {
    /// Parse a folder suffix such as `"007"`. Returns `None` for anything but ASCII digits.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let number = raw.parse().ok()?;
        Some(Self {
            raw: raw.to_string(),
            number,
        })
    }

    fn sentinel() -> Self {
        Self {
            raw: SENTINEL_VERSION.to_string(),
            number: 0,
        }
    }

    /// Suffix exactly as found on disk.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Numeric value used for ordering.
    pub fn number(&self) -> u32 {
        self.number
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// List the suffixes of the version folders found directly under `publish_path`.
///
/// A missing directory simply has no versions. Entries that are not directories or do not
/// start with `prefix` are ignored; the suffix itself is returned unvalidated. Suffixes are
/// ordered by numeric value, non-numeric ones first.
pub fn scan_versions(publish_path: &Path, prefix: &str) -> PipelineResult<Vec<String>> {
    let entries = match fs::read_dir(publish_path) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            log::debug!("publish path {} does not exist", publish_path.display());
            return Ok(Vec::new());
        }
        Err(err) => {
            return Err(PipelineError::Io {
                path: publish_path.to_path_buf(),
                source: err,
            });
        }
    };

    let mut versions = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PipelineError::Io {
            path: publish_path.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_ok_and(|ft| ft.is_dir()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(suffix) = name.strip_prefix(prefix) {
            versions.push(suffix.to_string());
        }
    }

    versions.sort_by_key(|suffix| {
        let number = VersionToken::parse(suffix).map(|token| token.number);
        (number, suffix.clone())
    });
    log::debug!(
        "found {} version folder(s) in {}",
        versions.len(),
        publish_path.display()
    );
    Ok(versions)
}

/// Pick the numerically greatest version, or [`SENTINEL_VERSION`] when there is none.
///
/// Ties keep the first token seen. Suffixes that are not plain digits are skipped.
pub fn latest_version<I, S>(versions: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    latest_token(versions).raw
}

/// Number following the latest version, used when allocating a new publish.
pub fn next_version<I, S>(versions: I) -> PipelineResult<u32>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let latest = latest_token(versions);
    latest
        .number
        .checked_add(1)
        .ok_or(PipelineError::VersionOverflow(latest.raw))
}

/// Folder name of a version number, zero padded to three digits.
pub fn version_folder(prefix: &str, number: u32) -> String {
    format!("{prefix}{number:03}")
}

/// Scan `publish_path` and return its latest version.
pub fn latest_published_version(publish_path: &Path, prefix: &str) -> PipelineResult<String> {
    Ok(latest_version(scan_versions(publish_path, prefix)?))
}

fn latest_token<I, S>(versions: I) -> VersionToken
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut latest = VersionToken::sentinel();
    for raw in versions {
        let raw = raw.as_ref();
        match VersionToken::parse(raw) {
            Some(token) if token.number > latest.number => latest = token,
            Some(_) => {}
            None => log::warn!("skipping non-numeric version folder suffix {raw:?}"),
        }
    }
    latest
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_digit_suffixes() {
        let token = VersionToken::parse("042").expect("digits should parse");
        assert_eq!(token.as_str(), "042");
        assert_eq!(token.number(), 42);
        assert_eq!(token.to_string(), "042");
        assert_eq!(VersionToken::parse("4a"), None);
    }

    #[test]
    fn compares_versions_numerically() {
        assert_eq!(latest_version(["9", "10"]), "10");
        assert_eq!(latest_version(["099", "100"]), "100");
        assert_eq!(latest_version(["010", "002", "001"]), "010");
    }

    #[test]
    fn empty_set_yields_sentinel() {
        assert_eq!(latest_version(Vec::<String>::new()), SENTINEL_VERSION);
    }

    #[test]
    fn first_seen_wins_on_equal_values() {
        assert_eq!(latest_version(["7", "007"]), "7");
        assert_eq!(latest_version(["007", "7"]), "007");
    }

    #[test]
    fn non_numeric_suffixes_are_skipped() {
        assert_eq!(latest_version(["003", "ersions", "+9", ""]), "003");
        assert_eq!(latest_version(["old"]), SENTINEL_VERSION);
    }

    #[test]
    fn allocates_next_version() {
        assert_eq!(next_version(["001", "004"]).unwrap(), 5);
        assert_eq!(next_version(Vec::<&str>::new()).unwrap(), 1);
        assert_eq!(version_folder("v", 5), "v005");
        assert_eq!(version_folder("v", 1234), "v1234");
    }

    #[test]
    fn last_representable_version_has_no_successor() {
        assert_eq!(next_version(["4294967294"]).unwrap(), u32::MAX);
        assert!(matches!(
            next_version(["001", "4294967295"]),
            Err(PipelineError::VersionOverflow(version)) if version == "4294967295"
        ));
    }

    #[test]
    fn scans_version_directories_only() {
        let temp = tempdir().expect("failed to create temp dir");
        let root = temp.path();
        for name in ["v001", "v002", "v010", "work", "_v003"] {
            fs::create_dir_all(root.join(name)).unwrap();
        }
        fs::write(root.join("v099"), b"not a folder").unwrap();

        let versions = scan_versions(root, "v").unwrap();
        assert_eq!(versions, vec!["001", "002", "010"]);
        assert_eq!(latest_version(&versions), "010");
    }

    #[test]
    fn scanned_versions_are_listed_in_numeric_order() {
        let temp = tempdir().expect("failed to create temp dir");
        for name in ["v9", "v10", "v1", "vold"] {
            fs::create_dir_all(temp.path().join(name)).unwrap();
        }

        assert_eq!(scan_versions(temp.path(), "v").unwrap(), vec!["old", "1", "9", "10"]);
    }

    #[test]
    fn missing_directory_has_no_versions() {
        let temp = tempdir().expect("failed to create temp dir");
        let missing = temp.path().join("publishs/modeling");

        assert!(scan_versions(&missing, "v").unwrap().is_empty());
        assert_eq!(latest_published_version(&missing, "v").unwrap(), "000");
    }
}
