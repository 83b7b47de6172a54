use jbasis_util::errors::BasisError;

#[test]
fn io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = BasisError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn not_found_display_names_coordinate() {
    let err = BasisError::NotFound {
        group: "com.example".to_string(),
        artifact: "foo".to_string(),
        version: "1.2.0".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "com.example:foo:1.2.0 not found in any configured repository"
    );
}

#[test]
fn network_error_display() {
    let err = BasisError::Network {
        message: "timeout".to_string(),
    };
    assert_eq!(err.to_string(), "Network error: timeout");
}

#[test]
fn conflict_error_display() {
    let err = BasisError::Conflict {
        message: "cycle: a -> b -> a".to_string(),
    };
    assert_eq!(err.to_string(), "Conflicting metadata: cycle: a -> b -> a");
}

#[test]
fn artifact_missing_display_names_coordinate() {
    let err = BasisError::ArtifactMissing {
        group: "com.example".to_string(),
        artifact: "bar".to_string(),
        version: "3.0.0".to_string(),
    };
    assert!(err.to_string().contains("com.example:bar:3.0.0"));
}

#[test]
fn resolution_error_display() {
    let err = BasisError::Resolution {
        message: "empty root set".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Dependency resolution failed: empty root set"
    );
}

#[test]
fn cancelled_display() {
    assert_eq!(BasisError::Cancelled.to_string(), "Resolution cancelled");
}

#[test]
fn io_error_from_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: BasisError = io_err.into();
    assert!(matches!(err, BasisError::Io(_)));
}
