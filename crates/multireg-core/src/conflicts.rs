//! Detection of packages assigned to more than one registry group.

use crate::project::RegistryGroup;
use indexmap::IndexMap;

/// Return every package name that occurs more than once across all groups.
///
/// Names come back in first-seen order. An empty result means every package
/// is routed through exactly one registry.
#[must_use]
pub fn find_duplicate_packages(groups: &[RegistryGroup]) -> Vec<String> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();

    for name in groups.iter().flat_map(|g| g.packages.iter()) {
        *counts.entry(name.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(name, _)| name.to_string())
        .collect()
}
