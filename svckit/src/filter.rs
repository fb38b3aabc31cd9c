// svckit/src/filter.rs
//
// Client-side search over a record kind's designated text fields

use crate::resource::Resource;

/// Lower-cased search term; `None` when the term is blank and the
/// collection should pass through unfiltered.
pub fn normalize_term(term: &str) -> Option<String> {
    if term.trim().is_empty() {
        None
    } else {
        Some(term.to_lowercase())
    }
}

pub fn matches<R: Resource>(record: &R, needle: &str) -> bool {
    record
        .searchable()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Keeps, in order, every record with at least one searchable field
/// containing `term` (case-insensitive).
pub fn filter_records<R: Resource>(records: &[R], term: &str) -> Vec<R> {
    match normalize_term(term) {
        None => records.to_vec(),
        Some(needle) => records
            .iter()
            .filter(|record| matches(*record, &needle))
            .cloned()
            .collect(),
    }
}
