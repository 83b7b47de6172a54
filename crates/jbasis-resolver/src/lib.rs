//! Dependency resolution engine for jbasis.
//!
//! Builds the full transitive dependency graph for a set of root
//! dependencies, resolves version conflicts (nearest wins, then highest
//! version), propagates exclusions, and materializes the surviving
//! artifacts into an ordered classpath. Metadata and artifact lookup go
//! through the narrow collaborator traits in [`provider`].

pub mod basis;
pub mod cancel;
pub mod classpath;
pub mod conflict;
pub mod graph;
pub mod provider;
pub mod resolver;
pub mod version;
pub mod visited;
