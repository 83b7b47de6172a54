//! Standard Maven repository layout: URL construction over an endpoint.

use jbasis_core::repository::RepositoryEndpoint;

/// Relative path for a coordinate under the standard layout.
///
/// `org.jetbrains.kotlinx:kotlinx-coroutines-core:1.8.0` becomes
/// `org/jetbrains/kotlinx/kotlinx-coroutines-core/1.8.0`
pub fn coordinate_path(group: &str, artifact: &str, version: &str) -> String {
    format!("{}/{}/{}", group.replace('.', "/"), artifact, version)
}

/// Full URL to a specific file within a repository.
pub fn file_url(
    repo: &RepositoryEndpoint,
    group: &str,
    artifact: &str,
    version: &str,
    filename: &str,
) -> String {
    format!(
        "{}/{}/{}",
        repo.url,
        coordinate_path(group, artifact, version),
        filename
    )
}

/// URL to the POM file for a coordinate.
pub fn pom_url(repo: &RepositoryEndpoint, group: &str, artifact: &str, version: &str) -> String {
    let filename = format!("{artifact}-{version}.pom");
    file_url(repo, group, artifact, version, &filename)
}

/// URL to the JAR file for a coordinate.
pub fn jar_url(repo: &RepositoryEndpoint, group: &str, artifact: &str, version: &str) -> String {
    let filename = format!("{artifact}-{version}.jar");
    file_url(repo, group, artifact, version, &filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_path_replaces_dots() {
        let path = coordinate_path("org.jetbrains.kotlinx", "kotlinx-coroutines-core", "1.8.0");
        assert_eq!(path, "org/jetbrains/kotlinx/kotlinx-coroutines-core/1.8.0");
    }

    #[test]
    fn pom_url_format() {
        let repo = RepositoryEndpoint::maven_central();
        let url = pom_url(&repo, "org.clojure", "clojure", "1.11.1");
        assert_eq!(
            url,
            "https://repo.maven.apache.org/maven2/org/clojure/clojure/1.11.1/clojure-1.11.1.pom"
        );
    }

    #[test]
    fn jar_url_format() {
        let repo = RepositoryEndpoint::maven_central();
        let url = jar_url(&repo, "com.example", "my-lib", "1.0");
        assert!(url.ends_with("com/example/my-lib/1.0/my-lib-1.0.jar"));
    }
}
