//! Deterministic ordering helpers.
//!
//! Report content must be identical for identical inputs, so every list that
//! is derived from a collection goes through one of these helpers instead of
//! relying on hash iteration order.

use std::collections::BTreeSet;

/// Drop repeats while keeping the first occurrence of each item in place.
pub fn dedup_first_seen<T, I>(items: I) -> Vec<T>
where
    T: Ord + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = BTreeSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Sort warnings and drop duplicates so report output does not depend on the
/// order in which sub-analyses ran.
pub fn normalize_warnings(warnings: &mut Vec<String>) {
    warnings.sort();
    warnings.dedup();
}
