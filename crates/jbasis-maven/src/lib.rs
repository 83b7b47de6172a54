//! Maven repository collaborator for jbasis.
//!
//! Implements the resolver's `MetadataProvider` and `ArtifactLocator`
//! over real Maven repositories: POM retrieval and parsing, a local
//! artifact cache mirroring the standard repository layout, and JAR
//! download with checksum sidecar verification.

pub mod cache;
pub mod checksum;
pub mod download;
pub mod layout;
pub mod pom;
pub mod provider;
