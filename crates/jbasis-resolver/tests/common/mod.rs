//! In-memory collaborator fixtures shared by the resolver tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use jbasis_core::dependency::{Coordinate, Dependency};
use jbasis_core::repository::RepositoryEndpoint;
use jbasis_resolver::provider::{ArtifactLocator, ArtifactManifest, MetadataProvider};
use jbasis_util::errors::BasisError;

/// Metadata fixture keyed by `group:artifact:version`. Coordinates not
/// declared here answer `NotFound`, exactly like an empty repository.
#[derive(Default)]
pub struct FixtureProvider {
    manifests: HashMap<String, Vec<Dependency>>,
    queries: AtomicUsize,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the dependencies of one artifact version.
    pub fn declare(mut self, gav: &str, deps: &[Dependency]) -> Self {
        self.manifests.insert(gav.to_string(), deps.to_vec());
        self
    }

    /// Number of metadata queries issued so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

impl MetadataProvider for FixtureProvider {
    fn manifest<'a>(
        &'a self,
        coordinate: &'a Coordinate,
        version: &'a str,
        _repositories: &'a [RepositoryEndpoint],
    ) -> BoxFuture<'a, miette::Result<ArtifactManifest>> {
        async move {
            self.queries.fetch_add(1, Ordering::Relaxed);
            let key = format!("{}:{version}", coordinate.key());
            match self.manifests.get(&key) {
                Some(deps) => Ok(ArtifactManifest::new(deps.clone())),
                None => Err(BasisError::NotFound {
                    group: coordinate.group_id.clone(),
                    artifact: coordinate.artifact_id.clone(),
                    version: version.to_string(),
                }
                .into()),
            }
        }
        .boxed()
    }
}

/// Locator that maps every known coordinate into a fake repository root.
#[derive(Default)]
pub struct FixtureLocator {
    missing: Vec<Coordinate>,
}

impl FixtureLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend this coordinate was never fetched locally.
    pub fn missing(mut self, coordinate: Coordinate) -> Self {
        self.missing.push(coordinate);
        self
    }
}

impl ArtifactLocator for FixtureLocator {
    fn local_path(&self, coordinate: &Coordinate, version: &str) -> miette::Result<PathBuf> {
        if self.missing.contains(coordinate) {
            return Err(BasisError::ArtifactMissing {
                group: coordinate.group_id.clone(),
                artifact: coordinate.artifact_id.clone(),
                version: version.to_string(),
            }
            .into());
        }
        Ok(PathBuf::from(format!(
            "/repo/{}/{}-{version}.jar",
            coordinate.group_id.replace('.', "/"),
            coordinate.artifact_id
        )))
    }
}

pub fn dep(gav: &str) -> Dependency {
    Dependency::parse(gav).expect("well-formed fixture coordinate")
}

pub fn coord(key: &str) -> Coordinate {
    let (group, artifact) = key.split_once(':').expect("group:artifact");
    Coordinate::new(group, artifact)
}

pub fn central() -> Vec<RepositoryEndpoint> {
    vec![RepositoryEndpoint::maven_central()]
}
