//! Collaborator interfaces consumed by the resolution engine.
//!
//! The engine owns the graph algorithm; everything that touches a
//! repository or the filesystem goes through these two traits. The
//! production implementation lives in `jbasis-maven`; tests supply
//! in-memory fixtures.

use std::path::PathBuf;

use futures_util::future::BoxFuture;

use jbasis_core::dependency::{Coordinate, Dependency};
use jbasis_core::repository::RepositoryEndpoint;

/// Declared dependency metadata for one artifact version.
#[derive(Debug, Clone, Default)]
pub struct ArtifactManifest {
    /// Runtime-relevant declared dependencies. Optional and
    /// build-time-only entries are already filtered out by the provider.
    pub dependencies: Vec<Dependency>,
}

impl ArtifactManifest {
    pub fn new(dependencies: Vec<Dependency>) -> Self {
        Self { dependencies }
    }
}

/// Answers "what does version V of coordinate C declare?".
pub trait MetadataProvider: Send + Sync {
    /// Fetch the declared dependencies of `(coordinate, version)`,
    /// consulting `repositories` in order; the first endpoint that has
    /// the artifact wins.
    ///
    /// Fails with `NotFound` when no configured endpoint has the
    /// artifact, and with `Network` when an endpoint could not be
    /// reached and no later endpoint supplied the metadata.
    fn manifest<'a>(
        &'a self,
        coordinate: &'a Coordinate,
        version: &'a str,
        repositories: &'a [RepositoryEndpoint],
    ) -> BoxFuture<'a, miette::Result<ArtifactManifest>>;
}

/// Answers "where, locally, is the resolved artifact's file?".
pub trait ArtifactLocator {
    /// Local file backing `(coordinate, version)`.
    ///
    /// Fails with `ArtifactMissing` when the artifact has not been
    /// fetched into the local cache; fetching is not this crate's job.
    fn local_path(&self, coordinate: &Coordinate, version: &str) -> miette::Result<PathBuf>;
}
