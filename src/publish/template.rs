use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

/// Mapping from placeholder name (without brackets) to its replacement value.
pub type TokenMap = BTreeMap<String, String>;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<([A-Za-z][A-Za-z0-9_]*)>").expect("invalid placeholder regex")
    })
}

/// Replace every `<name>` placeholder whose name appears in `tokens`.
///
/// Placeholders without a mapping are left in place. Names are matched literally, so the
/// order in which tokens are applied has no effect on the result.
pub fn substitute_tokens(template: &str, tokens: &TokenMap) -> String {
    tokens
        .iter()
        .fold(template.to_string(), |resolved, (name, value)| {
            resolved.replace(&format!("<{name}>"), value)
        })
}

/// Names of the placeholders still present in `value`, in order of appearance.
pub fn unresolved_tokens(value: &str) -> Vec<String> {
    placeholder_pattern()
        .captures_iter(value)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}
