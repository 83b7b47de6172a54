use jbasis_core::dependency::{Coordinate, Dependency};

#[test]
fn coordinate_equality_is_exact() {
    let a = Coordinate::new("com.example", "foo");
    let b = Coordinate::new("com.example", "foo");
    let c = Coordinate::new("com.example", "bar");
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn coordinate_key_and_display() {
    let c = Coordinate::new("org.clojure", "clojure");
    assert_eq!(c.key(), "org.clojure:clojure");
    assert_eq!(c.to_string(), "org.clojure:clojure");
}

#[test]
fn parse_shorthand() {
    let dep = Dependency::parse("org.jetbrains.kotlinx:kotlinx-coroutines-core:1.8.0").unwrap();
    assert_eq!(dep.coordinate.group_id, "org.jetbrains.kotlinx");
    assert_eq!(dep.coordinate.artifact_id, "kotlinx-coroutines-core");
    assert_eq!(dep.version, "1.8.0");
    assert!(dep.exclusions().is_empty());
}

#[test]
fn parse_rejects_malformed() {
    assert!(Dependency::parse("only-two:parts").is_none());
    assert!(Dependency::parse("a:b:c:d").is_none());
    assert!(Dependency::parse("a::1.0").is_none());
}

#[test]
fn exclusions_deduplicated_in_order() {
    let y = Coordinate::new("com.example", "y");
    let z = Coordinate::new("com.example", "z");
    let dep = Dependency::with_exclusions(
        Coordinate::new("com.example", "foo"),
        "1.0",
        vec![y.clone(), z.clone(), y.clone()],
    );
    assert_eq!(dep.exclusions(), &[y, z]);
}

#[test]
fn exclusion_covers_exact_and_wildcard() {
    let target = Coordinate::new("com.example", "y");
    assert!(Coordinate::new("com.example", "y").covers(&target));
    assert!(Coordinate::new("com.example", "*").covers(&target));
    assert!(!Coordinate::new("com.example", "z").covers(&target));
    assert!(!Coordinate::new("org.other", "*").covers(&target));
}

#[test]
fn dependency_display() {
    let dep = Dependency::new(Coordinate::new("com.example", "foo"), "1.2.0");
    assert_eq!(dep.to_string(), "com.example:foo:1.2.0");
}
