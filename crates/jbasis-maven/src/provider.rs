//! The resolver-facing collaborator over real Maven repositories.

use std::path::PathBuf;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use reqwest::Client;

use jbasis_core::dependency::{Coordinate, Dependency};
use jbasis_core::repository::RepositoryEndpoint;
use jbasis_resolver::provider::{ArtifactLocator, ArtifactManifest, MetadataProvider};
use jbasis_resolver::resolver::Resolution;
use jbasis_util::errors::BasisError;
use jbasis_util::progress;

use crate::cache::LocalCache;
use crate::checksum;
use crate::download;
use crate::layout;
use crate::pom::Pom;

/// Parent chains deeper than this indicate malformed metadata.
const MAX_PARENT_DEPTH: usize = 8;

/// Metadata provider backed by HTTP repositories and the local cache.
pub struct MavenMetadataProvider {
    client: Client,
    cache: LocalCache,
}

impl MavenMetadataProvider {
    pub fn new(cache: LocalCache) -> miette::Result<Self> {
        Ok(Self {
            client: download::build_client()?,
            cache,
        })
    }

    pub fn with_client(client: Client, cache: LocalCache) -> Self {
        Self { client, cache }
    }

    /// Fetch a POM from the first repository that has it.
    ///
    /// A failure against one endpoint falls through to the next;
    /// exhausting every endpoint without finding the POM converts to
    /// `NotFound` for this coordinate.
    async fn fetch_pom(
        &self,
        repositories: &[RepositoryEndpoint],
        group: &str,
        artifact: &str,
        version: &str,
    ) -> miette::Result<Pom> {
        for repo in repositories {
            match self
                .cache
                .fetch_pom(&self.client, repo, group, artifact, version)
                .await
            {
                Ok(Some(pom)) => return Ok(pom),
                Ok(None) => continue,
                Err(err) => {
                    tracing::warn!(
                        "repository '{}' failed for {group}:{artifact}:{version}: {err}",
                        repo.name
                    );
                    continue;
                }
            }
        }
        Err(BasisError::NotFound {
            group: group.to_string(),
            artifact: artifact.to_string(),
            version: version.to_string(),
        }
        .into())
    }

    /// The effective POM: parent chain merged, BOM imports spliced,
    /// properties interpolated.
    async fn effective_pom(
        &self,
        repositories: &[RepositoryEndpoint],
        group: &str,
        artifact: &str,
        version: &str,
    ) -> miette::Result<Pom> {
        let mut pom = self.fetch_pom(repositories, group, artifact, version).await?;

        let mut depth = 0;
        let mut parent_ref = pom.parent.clone();
        while let Some(parent) = parent_ref {
            if depth >= MAX_PARENT_DEPTH {
                return Err(BasisError::Metadata {
                    message: format!(
                        "parent chain deeper than {MAX_PARENT_DEPTH} for {group}:{artifact}:{version}"
                    ),
                }
                .into());
            }
            depth += 1;
            let parent_pom = self
                .fetch_pom(
                    repositories,
                    &parent.group_id,
                    &parent.artifact_id,
                    &parent.version,
                )
                .await?;
            parent_ref = parent_pom.parent.clone();
            pom.apply_parent(&parent_pom);
        }

        // One level of BOM imports completes the managed versions.
        let imports: Vec<(String, String, String)> = pom
            .bom_imports()
            .iter()
            .filter_map(|d| {
                d.version
                    .as_ref()
                    .map(|v| (d.group_id.clone(), d.artifact_id.clone(), pom.interpolate(v)))
            })
            .collect();
        for (g, a, v) in imports {
            match self.fetch_pom(repositories, &g, &a, &v).await {
                Ok(bom) => pom.merge_dependency_management(&bom.dependency_management),
                Err(err) => tracing::warn!("BOM import {g}:{a}:{v} failed: {err}"),
            }
        }

        pom.resolve_properties();
        Ok(pom)
    }
}

impl MetadataProvider for MavenMetadataProvider {
    fn manifest<'a>(
        &'a self,
        coordinate: &'a Coordinate,
        version: &'a str,
        repositories: &'a [RepositoryEndpoint],
    ) -> BoxFuture<'a, miette::Result<ArtifactManifest>> {
        async move {
            let pom = self
                .effective_pom(
                    repositories,
                    &coordinate.group_id,
                    &coordinate.artifact_id,
                    version,
                )
                .await?;
            Ok(ArtifactManifest::new(declared_dependencies(&pom)))
        }
        .boxed()
    }
}

/// Map an effective POM's declarations to resolver dependencies.
///
/// Optional entries and build-time-only scopes (`test`, `provided`,
/// `system`) are not runtime dependencies. Entries still without a
/// version after dependency management are skipped: they are not
/// resolvable requests.
pub fn declared_dependencies(pom: &Pom) -> Vec<Dependency> {
    let mut deps = Vec::new();
    for dep in &pom.dependencies {
        if dep.optional {
            continue;
        }
        let scope = dep.scope.as_deref().unwrap_or("compile");
        if matches!(scope, "test" | "provided" | "system") {
            continue;
        }

        let version = dep
            .version
            .clone()
            .or_else(|| {
                pom.managed_version(&dep.group_id, &dep.artifact_id)
                    .map(String::from)
            })
            .filter(|v| !v.is_empty());
        let Some(version) = version else {
            tracing::debug!(
                "skipping {}:{} (no version after dependency management)",
                dep.group_id,
                dep.artifact_id
            );
            continue;
        };

        let exclusions = dep.exclusions.iter().map(|e| {
            Coordinate::new(
                e.group_id.clone(),
                e.artifact_id.clone().unwrap_or_else(|| "*".to_string()),
            )
        });
        deps.push(Dependency::with_exclusions(
            Coordinate::new(dep.group_id.clone(), dep.artifact_id.clone()),
            version,
            exclusions,
        ));
    }
    deps
}

/// Artifact locator over the local cache.
pub struct CachedArtifactLocator {
    cache: LocalCache,
}

impl CachedArtifactLocator {
    pub fn new(cache: LocalCache) -> Self {
        Self { cache }
    }
}

impl ArtifactLocator for CachedArtifactLocator {
    fn local_path(&self, coordinate: &Coordinate, version: &str) -> miette::Result<PathBuf> {
        self.cache
            .get_jar(&coordinate.group_id, &coordinate.artifact_id, version)
            .ok_or_else(|| {
                BasisError::ArtifactMissing {
                    group: coordinate.group_id.clone(),
                    artifact: coordinate.artifact_id.clone(),
                    version: version.to_string(),
                }
                .into()
            })
    }
}

/// Download the JARs of a resolution into the cache, verifying
/// checksums, so materialization can succeed.
pub async fn fetch_artifacts(
    client: &Client,
    cache: &LocalCache,
    repositories: &[RepositoryEndpoint],
    resolution: &Resolution,
) -> miette::Result<()> {
    for artifact in &resolution.artifacts {
        let group = &artifact.coordinate.group_id;
        let name = &artifact.coordinate.artifact_id;
        let version = &artifact.version;
        if cache.has_artifact(group, name, version) {
            continue;
        }

        progress::status("Fetching", &format!("{}:{version}", artifact.coordinate));
        let mut fetched = false;
        for repo in repositories {
            let url = layout::jar_url(repo, group, name, version);
            match download::download_artifact(client, &url, name).await {
                Ok(Some(bytes)) => {
                    checksum::verify(client, &url, &bytes).await?;
                    cache.put_jar(group, name, version, &bytes)?;
                    fetched = true;
                    break;
                }
                Ok(None) => continue,
                Err(err) => {
                    progress::status_warn(
                        "Warning",
                        &format!("repository '{}' failed for {url}: {err}", repo.name),
                    );
                    continue;
                }
            }
        }
        if !fetched {
            return Err(BasisError::NotFound {
                group: group.clone(),
                artifact: name.clone(),
                version: version.clone(),
            }
            .into());
        }
    }
    Ok(())
}
