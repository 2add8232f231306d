//! Field addressing: dotted paths into nested records and single-`*`
//! wildcard expansion over array-valued segments.

use serde_json::Value;

use crate::Record;

/// Resolves a dotted path against the record.
///
/// Plain names resolve directly. Dotted names walk nested objects one
/// segment at a time; numeric segments index into arrays (this is what
/// makes expanded wildcard names like `users.1.email` resolvable). Any
/// missing segment, or a non-container in the middle of the path, yields
/// `None`.
pub(crate) fn resolve<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    if !path.contains('.') {
        return record.get(path);
    }

    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = record.get(first)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Whether the path contains a wildcard segment.
pub(crate) fn has_wildcard(path: &str) -> bool {
    path.split('.').any(|segment| segment == "*")
}

/// Expands a wildcard path into one concrete path per element of the
/// addressed array, substituting the element index for the `*` segment.
///
/// The prefix before the wildcard must resolve to an array; otherwise the
/// expansion is empty and the field contributes no evaluations at all
/// (`users.*.email` against a record without `users` is vacuously fine —
/// require the array itself if its presence matters). Only the first
/// wildcard segment is expanded.
pub(crate) fn expand_wildcard(record: &Record, path: &str) -> Vec<String> {
    let Some(star) = path.split('.').position(|segment| segment == "*") else {
        return vec![path.to_string()];
    };

    let segments: Vec<&str> = path.split('.').collect();
    let prefix = segments[..star].join(".");
    let suffix = segments[star + 1..].join(".");

    let Some(Value::Array(items)) = resolve(record, &prefix) else {
        return Vec::new();
    };

    (0..items.len())
        .map(|index| {
            if suffix.is_empty() {
                format!("{prefix}.{index}")
            } else {
                format!("{prefix}.{index}.{suffix}")
            }
        })
        .collect()
}
