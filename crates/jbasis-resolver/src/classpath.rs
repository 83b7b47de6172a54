//! Classpath materialization: mapping a resolved set onto local files
//! in a stable, classloader-meaningful order.

use std::path::PathBuf;

use jbasis_core::basis::{BasisArtifact, ResolvedBasis};

use crate::provider::ArtifactLocator;
use crate::resolver::Resolution;

/// Materialize a resolution into a [`ResolvedBasis`].
///
/// Every resolved artifact is mapped to its local file through the
/// locator; an artifact with no local file fails the whole call with
/// `ArtifactMissing`. The basis orders extra local paths first, in
/// caller order, then artifact files in resolution discovery order —
/// first-discovered-first, because runtime classloaders take the first
/// path that supplies a class name.
pub fn materialize(
    resolution: &Resolution,
    extra_paths: &[PathBuf],
    locator: &dyn ArtifactLocator,
) -> miette::Result<ResolvedBasis> {
    let mut artifacts = Vec::with_capacity(resolution.artifacts.len());
    for resolved in &resolution.artifacts {
        let file = locator.local_path(&resolved.coordinate, &resolved.version)?;
        artifacts.push(BasisArtifact {
            group: resolved.coordinate.group_id.clone(),
            artifact: resolved.coordinate.artifact_id.clone(),
            version: resolved.version.clone(),
            introduced_by: resolved.introduced_by.clone(),
            file,
        });
    }
    Ok(ResolvedBasis::new(artifacts, extra_paths.to_vec()))
}
