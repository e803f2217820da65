//! Missing-record detection (set difference over identifiers).

use std::collections::HashSet;
use std::hash::Hash;

/// Distinct identifiers present in `source` but absent from `target`.
///
/// Result order is the order of first appearance in `source`; duplicates in
/// either input are tolerated.
pub fn find_missing<'a, T>(
    source: impl IntoIterator<Item = &'a T>,
    target: impl IntoIterator<Item = &'a T>,
) -> Vec<T>
where
    T: Eq + Hash + Clone + 'a,
{
    let target: HashSet<&T> = target.into_iter().collect();
    let mut seen: HashSet<&T> = HashSet::new();

    source
        .into_iter()
        .filter(|id| !target.contains(id) && seen.insert(*id))
        .cloned()
        .collect()
}
