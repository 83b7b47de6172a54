use std::fmt;

use serde::{Deserialize, Serialize};

/// The version-independent identity of a library: `groupId` + `artifactId`.
///
/// Two coordinates are equal iff both fields match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
}

impl Coordinate {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    /// `group:artifact` identifier.
    pub fn key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// Whether this coordinate, used as an exclusion, covers `target`.
    ///
    /// An exclusion with `artifact_id == "*"` excludes every artifact
    /// in its group.
    pub fn covers(&self, target: &Coordinate) -> bool {
        self.group_id == target.group_id
            && (self.artifact_id == "*" || self.artifact_id == target.artifact_id)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// A requested dependency: a coordinate pinned to a version, with
/// exclusions that apply to its entire transitive subtree.
///
/// Exclusions are coordinate-level, never version-specific, and are
/// de-duplicated at construction. The value is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub coordinate: Coordinate,
    pub version: String,
    #[serde(default)]
    exclusions: Vec<Coordinate>,
}

impl Dependency {
    pub fn new(coordinate: Coordinate, version: impl Into<String>) -> Self {
        Self {
            coordinate,
            version: version.into(),
            exclusions: Vec::new(),
        }
    }

    /// Build a dependency with subtree exclusions, dropping duplicates
    /// while preserving first-seen order.
    pub fn with_exclusions(
        coordinate: Coordinate,
        version: impl Into<String>,
        exclusions: impl IntoIterator<Item = Coordinate>,
    ) -> Self {
        let mut deduped: Vec<Coordinate> = Vec::new();
        for excl in exclusions {
            if !deduped.contains(&excl) {
                deduped.push(excl);
            }
        }
        Self {
            coordinate,
            version: version.into(),
            exclusions: deduped,
        }
    }

    /// Parse `"group:artifact:version"` shorthand.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() == 3 && parts.iter().all(|p| !p.is_empty()) {
            Some(Self::new(Coordinate::new(parts[0], parts[1]), parts[2]))
        } else {
            None
        }
    }

    pub fn exclusions(&self) -> &[Coordinate] {
        &self.exclusions
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.coordinate, self.version)
    }
}
