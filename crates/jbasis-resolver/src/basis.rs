//! Builder façade: accumulate dependencies, repositories and extra
//! local paths, then resolve them into a [`ResolvedBasis`].

use std::path::PathBuf;

use jbasis_core::basis::ResolvedBasis;
use jbasis_core::dependency::Dependency;
use jbasis_core::repository::RepositoryEndpoint;

use crate::classpath;
use crate::provider::{ArtifactLocator, MetadataProvider};
use crate::resolver::{self, Resolution, ResolveOptions};

/// Accumulates the inputs of a resolution run.
///
/// Adding a dependency whose coordinate is already present keeps both
/// entries: requesting the same library at two versions is legitimate,
/// and conflict resolution reconciles them. Repositories are likewise
/// kept as added; duplicate endpoints are harmless because metadata
/// queries are idempotent.
#[derive(Debug, Clone, Default)]
pub struct BasisBuilder {
    dependencies: Vec<Dependency>,
    repositories: Vec<RepositoryEndpoint>,
    paths: Vec<PathBuf>,
    options: ResolveOptions,
}

impl BasisBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder with Maven Central already in the repository list.
    pub fn using_maven_central() -> Self {
        Self::new().add_repository(RepositoryEndpoint::maven_central())
    }

    pub fn add_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn add_dependencies(mut self, dependencies: impl IntoIterator<Item = Dependency>) -> Self {
        self.dependencies.extend(dependencies);
        self
    }

    pub fn add_repository(mut self, repository: RepositoryEndpoint) -> Self {
        self.repositories.push(repository);
        self
    }

    pub fn add_repositories(
        mut self,
        repositories: impl IntoIterator<Item = RepositoryEndpoint>,
    ) -> Self {
        self.repositories.extend(repositories);
        self
    }

    pub fn add_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    pub fn add_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.paths.extend(paths);
        self
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve without materializing. The returned [`Resolution`] is
    /// what diagnostics consume: `resolution.graph.render_tree()`,
    /// `resolution.conflicts`.
    pub async fn resolve(&self, provider: &dyn MetadataProvider) -> miette::Result<Resolution> {
        resolver::resolve(
            &self.dependencies,
            &self.repositories,
            provider,
            &self.options,
        )
        .await
    }

    /// Resolve and materialize into the final immutable basis.
    pub async fn build(
        &self,
        provider: &dyn MetadataProvider,
        locator: &dyn ArtifactLocator,
    ) -> miette::Result<ResolvedBasis> {
        let resolution = self.resolve(provider).await?;
        classpath::materialize(&resolution, &self.paths, locator)
    }
}
