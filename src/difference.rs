//! One-way differences between two commit maps.

use serde::Serialize;

use crate::commit_map::CommitMap;

/// Commits whose fingerprint exists on only one side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Difference {
    /// Hashes from the first map missing in the second, in the first map's order.
    pub only_in_a: Vec<String>,
    /// Hashes from the second map missing in the first, in the second map's order.
    pub only_in_b: Vec<String>,
}

impl Difference {
    pub fn is_empty(&self) -> bool {
        self.only_in_a.is_empty() && self.only_in_b.is_empty()
    }
}

/// Compute what each map has that the other does not.
pub fn diff(a: &CommitMap, b: &CommitMap) -> Difference {
    Difference {
        only_in_a: missing_from(a, b),
        only_in_b: missing_from(b, a),
    }
}

fn missing_from(source: &CommitMap, other: &CommitMap) -> Vec<String> {
    source
        .iter()
        .filter(|(key, _)| !other.contains_key(key))
        .map(|(_, id)| id.to_string())
        .collect()
}
