//! Built-in statement catalogs embedded in the binary
//!
//! Lets users pass `--catalog sparkify` instead of a file path.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in catalog YAML definitions
pub static BUILTIN_CATALOGS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert("sparkify", include_str!("../../catalogs/sparkify.yaml"));
    m
});

/// Get a built-in catalog by name
pub fn get_builtin(name: &str) -> Option<&'static str> {
    BUILTIN_CATALOGS.get(name).copied()
}

/// List all built-in catalog names, sorted
pub fn list_builtin() -> Vec<&'static str> {
    let mut names: Vec<_> = BUILTIN_CATALOGS.keys().copied().collect();
    names.sort_unstable();
    names
}
