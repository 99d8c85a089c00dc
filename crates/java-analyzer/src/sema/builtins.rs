//! Types every compilation unit sees without an import.

use once_cell::sync::Lazy;
use std::collections::HashSet;

static IMPLICIT_TYPES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "Boolean",
        "Byte",
        "CharSequence",
        "Character",
        "Class",
        "Comparable",
        "Deprecated",
        "Double",
        "Error",
        "Exception",
        "Float",
        "FunctionalInterface",
        "IllegalArgumentException",
        "IllegalStateException",
        "IndexOutOfBoundsException",
        "Integer",
        "Iterable",
        "Long",
        "Math",
        "NullPointerException",
        "Number",
        "Object",
        "Override",
        "Runnable",
        "RuntimeException",
        "SafeVarargs",
        "Short",
        "String",
        "StringBuilder",
        "SuppressWarnings",
        "System",
        "Thread",
        "Throwable",
        "UnsupportedOperationException",
        "Void",
    ]
    .into_iter()
    .collect()
});

pub fn is_implicit_type(name: &str) -> bool {
    IMPLICIT_TYPES.contains(name)
}

/// Alphabetical, for deterministic completion output.
pub fn implicit_type_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = IMPLICIT_TYPES.iter().copied().collect();
    names.sort();
    names
}
