//! Expansion guard for the breadth-first graph walk.
//!
//! Exclusions are path-dependent: the same `(coordinate, version)` pair
//! reached under a different inherited exclusion set has a different
//! effective child list and must be expanded again. The guard therefore
//! keys on the pair plus a fingerprint of the exclusion context, while
//! metadata fetches stay memoized per pair.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashSet};
use std::hash::{Hash, Hasher};

use jbasis_core::dependency::Coordinate;

/// Tracks which expansion contexts have already been walked.
#[derive(Debug, Default)]
pub struct ExpansionGuard {
    seen: HashSet<(String, u64)>,
}

impl ExpansionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a context as expanded. Returns `false` if an identical
    /// (coordinate, version, exclusions) context was walked before.
    pub fn first_visit(
        &mut self,
        coordinate: &Coordinate,
        version: &str,
        exclusions: &BTreeSet<Coordinate>,
    ) -> bool {
        let key = format!("{}:{version}", coordinate.key());
        self.seen.insert((key, fingerprint(exclusions)))
    }
}

fn fingerprint(exclusions: &BTreeSet<Coordinate>) -> u64 {
    // BTreeSet iteration is ordered, so the hash is stable per set.
    let mut hasher = DefaultHasher::new();
    for excl in exclusions {
        excl.hash(&mut hasher);
    }
    hasher.finish()
}
