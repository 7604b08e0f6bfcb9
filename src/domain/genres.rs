//! Genre list mutation.
//!
//! The single canonical implementation of genre add/remove, called from
//! the content service. Matching is case-insensitive; stored casing wins.

fn matches(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

/// Append each candidate genre that has no case-insensitive match in the
/// list so far. Existing order is preserved; new entries go to the end in
/// input order. The first occurrence of a casing wins.
pub fn merge(existing: &[String], additions: &[String]) -> Vec<String> {
    let mut merged = existing.to_vec();
    for candidate in additions {
        if !merged.iter().any(|genre| matches(genre, candidate)) {
            merged.push(candidate.clone());
        }
    }
    merged
}

/// Drop every entry that case-insensitively matches any removal
/// candidate. Survivor order is preserved; unknown candidates are a
/// no-op.
pub fn strip(existing: &[String], removals: &[String]) -> Vec<String> {
    existing
        .iter()
        .filter(|genre| !removals.iter().any(|removal| matches(genre, removal)))
        .cloned()
        .collect()
}
