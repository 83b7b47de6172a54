use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all jbasis operations.
#[derive(Debug, Error, Diagnostic)]
pub enum BasisError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A requested coordinate+version exists in none of the configured
    /// repositories. Not retried; a missing dependency makes the whole
    /// resolution meaningless.
    #[error("{group}:{artifact}:{version} not found in any configured repository")]
    #[diagnostic(help("Check the coordinate spelling and your repository list"))]
    NotFound {
        group: String,
        artifact: String,
        version: String,
    },

    /// Network request or download failed after endpoint fallback.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The deterministic conflict policy cannot produce a winner
    /// (cyclic or malformed metadata).
    #[error("Conflicting metadata: {message}")]
    Conflict { message: String },

    /// Metadata resolved, but the local artifact file is absent.
    #[error("Artifact {group}:{artifact}:{version} is not present locally")]
    #[diagnostic(help("Fetch the artifact into the local cache before materializing"))]
    ArtifactMissing {
        group: String,
        artifact: String,
        version: String,
    },

    /// Dependency resolution failed for reasons outside the taxonomy above.
    #[error("Dependency resolution failed: {message}")]
    Resolution { message: String },

    /// The resolution run was cancelled cooperatively.
    #[error("Resolution cancelled")]
    Cancelled,

    /// Malformed metadata: unparseable POM, undecodable basis file.
    #[error("Metadata error: {message}")]
    Metadata { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type BasisResult<T> = miette::Result<T>;
