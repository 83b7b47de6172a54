//! The immutable output of a resolution run: the conflict-free artifact
//! set with materialized file locations, plus caller-supplied local paths.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dependency::Coordinate;
use jbasis_util::errors::BasisError;

/// One artifact in a resolved basis.
///
/// Plain values precede the `introduced_by` table so the TOML encoding
/// stays valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasisArtifact {
    pub group: String,
    pub artifact: String,
    pub version: String,
    /// Local file backing this artifact.
    pub file: PathBuf,
    /// The dependent that first introduced this artifact during
    /// resolution; absent for root dependencies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduced_by: Option<Coordinate>,
}

impl BasisArtifact {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.group.clone(), self.artifact.clone())
    }
}

/// A resolved dependency basis.
///
/// Artifacts appear exactly once per coordinate, in resolution discovery
/// order. The value is plain data: it owns no OS resources, may be shared
/// freely across threads, and is safe to persist and reload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedBasis {
    #[serde(default)]
    pub extra_paths: Vec<PathBuf>,
    #[serde(default)]
    pub artifacts: Vec<BasisArtifact>,
}

impl ResolvedBasis {
    pub fn new(artifacts: Vec<BasisArtifact>, extra_paths: Vec<PathBuf>) -> Self {
        Self {
            artifacts,
            extra_paths,
        }
    }

    /// All paths of this basis in classpath order: extra local paths
    /// first, in caller order, then artifact files in discovery order.
    ///
    /// Ordering matters: some runtime classloaders resolve a class name
    /// to whichever path appears first.
    pub fn ordered_paths(&self) -> Vec<PathBuf> {
        let mut paths = self.extra_paths.clone();
        paths.extend(self.artifacts.iter().map(|a| a.file.clone()));
        paths
    }

    /// The ordered paths joined with the platform path-list separator,
    /// ready to pass as a `-classpath`/`--module-path` argument.
    pub fn join_path_string(&self) -> String {
        join_paths(&self.ordered_paths())
    }

    /// Resolved version for a coordinate, if it is part of this basis.
    pub fn version_of(&self, coordinate: &Coordinate) -> Option<&str> {
        self.artifacts
            .iter()
            .find(|a| a.group == coordinate.group_id && a.artifact == coordinate.artifact_id)
            .map(|a| a.version.as_str())
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Load a previously persisted basis from a TOML file.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(BasisError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Decode a basis from its TOML form.
    pub fn from_toml_str(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            BasisError::Metadata {
                message: format!("Failed to decode basis: {e}"),
            }
            .into()
        })
    }

    /// Encode the basis to a pretty-printed TOML string.
    pub fn to_string_pretty(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Join paths with the host platform's path-list separator.
///
/// Pure formatting over an already-materialized sequence.
pub fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join(path_list_separator())
}

fn path_list_separator() -> &'static str {
    if cfg!(windows) {
        ";"
    } else {
        ":"
    }
}
