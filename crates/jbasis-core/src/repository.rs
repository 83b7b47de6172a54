//! Artifact repository endpoints and the well-known public ones.

use serde::{Deserialize, Serialize};

/// Maven Central, the primary repository of JVM artifacts.
pub const MAVEN_CENTRAL_URL: &str = "https://repo.maven.apache.org/maven2";

/// Clojars, the repository for artifacts from the Clojure ecosystem.
pub const CLOJARS_URL: &str = "https://repo.clojars.org";

/// JitPack builds and packages artifacts straight from git hosting.
pub const JITPACK_URL: &str = "https://jitpack.io";

/// A named artifact-repository endpoint.
///
/// The name is the key used for priority ordering and diagnostics and
/// must be unique within a registry; queries are issued in registry
/// order, first success wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryEndpoint {
    pub name: String,
    pub url: String,
}

impl RepositoryEndpoint {
    /// Build an endpoint, normalizing away any trailing slash.
    pub fn new(name: impl Into<String>, url: &str) -> Self {
        Self {
            name: name.into(),
            url: url.trim_end_matches('/').to_string(),
        }
    }

    pub fn maven_central() -> Self {
        Self::new("central", MAVEN_CENTRAL_URL)
    }

    pub fn clojars() -> Self {
        Self::new("clojars", CLOJARS_URL)
    }

    pub fn jitpack() -> Self {
        Self::new("jitpack", JITPACK_URL)
    }
}
