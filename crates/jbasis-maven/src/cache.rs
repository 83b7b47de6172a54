//! Local artifact cache mirroring the standard Maven repository layout.

use std::fs;
use std::path::{Path, PathBuf};

use jbasis_core::repository::RepositoryEndpoint;
use jbasis_util::errors::BasisError;
use jbasis_util::fs::ensure_dir;

use crate::download;
use crate::layout;
use crate::pom::{self, Pom};

/// The two artifact file kinds the cache stores per coordinate.
#[derive(Debug, Clone, Copy)]
enum CachedFile {
    Jar,
    Pom,
}

impl CachedFile {
    fn file_name(self, artifact: &str, version: &str) -> String {
        let extension = match self {
            CachedFile::Jar => "jar",
            CachedFile::Pom => "pom",
        };
        format!("{artifact}-{version}.{extension}")
    }
}

/// A local artifact cache.
///
/// Files live under the cache root at the same relative paths a Maven
/// repository serves them, so `org.clojure:clojure:1.11.1` maps to
/// `org/clojure/clojure/1.11.1/clojure-1.11.1.jar`.
#[derive(Debug, Clone)]
pub struct LocalCache {
    root: PathBuf,
}

impl LocalCache {
    /// Create a cache rooted at `base_dir/.jbasis/artifacts/`.
    pub fn new(base_dir: &Path) -> Self {
        Self::from_root(base_dir.join(".jbasis").join("artifacts"))
    }

    /// Create a cache with an explicit root directory.
    pub fn from_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every cached file of one coordinate.
    pub fn artifact_dir(&self, group: &str, artifact: &str, version: &str) -> PathBuf {
        let mut dir = self.root.clone();
        for segment in group.split('.') {
            dir.push(segment);
        }
        dir.push(artifact);
        dir.push(version);
        dir
    }

    fn file_path(&self, group: &str, artifact: &str, version: &str, kind: CachedFile) -> PathBuf {
        self.artifact_dir(group, artifact, version)
            .join(kind.file_name(artifact, version))
    }

    /// Path of a cached JAR, if present.
    pub fn get_jar(&self, group: &str, artifact: &str, version: &str) -> Option<PathBuf> {
        let path = self.file_path(group, artifact, version, CachedFile::Jar);
        path.is_file().then_some(path)
    }

    /// Parse a cached POM, if present.
    pub fn get_pom(&self, group: &str, artifact: &str, version: &str) -> Option<Pom> {
        let path = self.file_path(group, artifact, version, CachedFile::Pom);
        let content = fs::read_to_string(path).ok()?;
        pom::parse_pom(&content).ok()
    }

    fn put(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        kind: CachedFile,
        data: &[u8],
    ) -> miette::Result<PathBuf> {
        let dir = self.artifact_dir(group, artifact, version);
        ensure_dir(&dir).map_err(BasisError::Io)?;
        let path = dir.join(kind.file_name(artifact, version));
        fs::write(&path, data).map_err(BasisError::Io)?;
        Ok(path)
    }

    /// Store a POM file.
    pub fn put_pom(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        pom_xml: &str,
    ) -> miette::Result<PathBuf> {
        self.put(group, artifact, version, CachedFile::Pom, pom_xml.as_bytes())
    }

    /// Store a JAR file.
    pub fn put_jar(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        data: &[u8],
    ) -> miette::Result<PathBuf> {
        self.put(group, artifact, version, CachedFile::Jar, data)
    }

    /// Whether the JAR for this coordinate is cached.
    pub fn has_artifact(&self, group: &str, artifact: &str, version: &str) -> bool {
        self.get_jar(group, artifact, version).is_some()
    }

    /// Fetch a POM from one repository, using the cache when available.
    ///
    /// Returns `Ok(None)` when this repository does not have it.
    pub async fn fetch_pom(
        &self,
        client: &reqwest::Client,
        repo: &RepositoryEndpoint,
        group: &str,
        artifact: &str,
        version: &str,
    ) -> miette::Result<Option<Pom>> {
        if let Some(cached) = self.get_pom(group, artifact, version) {
            return Ok(Some(cached));
        }

        let url = layout::pom_url(repo, group, artifact, version);
        let Some(content) = download::download_text(client, &url).await? else {
            return Ok(None);
        };
        self.put_pom(group, artifact, version, &content)?;
        pom::parse_pom(&content).map(Some)
    }
}
