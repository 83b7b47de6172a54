//! POM file parsing: dependency declarations, parent references,
//! dependency management, property interpolation, BOM imports.
//!
//! Deserialization is handled by quick-xml's serde support against a set
//! of raw mirror structs; the public [`Pom`] model is built from those
//! and carries only what resolution needs.

use std::collections::BTreeMap;

use serde::Deserialize;

use jbasis_util::errors::BasisError;

/// Nested property definitions are expanded at most this many times.
const MAX_INTERPOLATION_DEPTH: usize = 20;

/// A parsed POM (Project Object Model) file, reduced to the fields
/// dependency resolution needs.
#[derive(Debug, Clone, Default)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,

    pub parent: Option<ParentRef>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    pub dependency_management: Vec<PomDependency>,
}

/// Reference to a parent POM.
#[derive(Debug, Clone)]
pub struct ParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

/// A dependency declared in a POM file.
#[derive(Debug, Clone)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
    pub type_: Option<String>,
    pub exclusions: Vec<PomExclusion>,
}

/// An exclusion within a dependency declaration. A missing artifact ID
/// excludes the whole group.
#[derive(Debug, Clone)]
pub struct PomExclusion {
    pub group_id: String,
    pub artifact_id: Option<String>,
}

impl Pom {
    /// Effective group ID (falls back to parent).
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.group_id.as_str()))
    }

    /// Effective version (falls back to parent).
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.version.as_str()))
    }

    /// Expand `${…}` references using POM properties and the built-in
    /// project variables. References that resolve to nothing are left in
    /// place.
    pub fn interpolate(&self, input: &str) -> String {
        let mut current = input.to_string();
        // Property values may themselves contain references; bound the
        // rewrite depth so self-referential definitions terminate.
        for _ in 0..MAX_INTERPOLATION_DEPTH {
            let expanded = self.expand_once(&current);
            if expanded == current {
                break;
            }
            current = expanded;
        }
        current
    }

    /// Substitute every resolvable `${key}` in `input` exactly once.
    fn expand_once(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(start) = rest.find("${") {
            let Some(close) = rest[start..].find('}') else {
                break;
            };
            out.push_str(&rest[..start]);
            let key = &rest[start + 2..start + close];
            match self.lookup_property(key) {
                Some(value) => out.push_str(&value),
                None => out.push_str(&rest[start..start + close + 1]),
            }
            rest = &rest[start + close + 1..];
        }
        out.push_str(rest);
        out
    }

    fn lookup_property(&self, key: &str) -> Option<String> {
        if let Some(value) = self.properties.get(key) {
            return Some(value.clone());
        }
        let parent = self.parent.as_ref();
        match key {
            "project.groupId" | "pom.groupId" => self.effective_group_id().map(str::to_string),
            "project.artifactId" | "pom.artifactId" => self.artifact_id.clone(),
            "project.version" | "pom.version" => self.effective_version().map(str::to_string),
            "project.parent.groupId" => parent.map(|p| p.group_id.clone()),
            "project.parent.version" => parent.map(|p| p.version.clone()),
            _ => None,
        }
    }

    /// Interpolate property references in dependencies and dependency
    /// management in place.
    pub fn resolve_properties(&mut self) {
        let snapshot = self.clone();
        for dep in self
            .dependencies
            .iter_mut()
            .chain(self.dependency_management.iter_mut())
        {
            dep.group_id = snapshot.interpolate(&dep.group_id);
            dep.artifact_id = snapshot.interpolate(&dep.artifact_id);
            if let Some(ref v) = dep.version {
                dep.version = Some(snapshot.interpolate(v));
            }
        }
    }

    /// Merge a parent POM's properties and dependency management into
    /// this POM. Entries already present here dominate.
    pub fn apply_parent(&mut self, parent: &Pom) {
        for (key, value) in &parent.properties {
            if !self.properties.contains_key(key) {
                self.properties.insert(key.clone(), value.clone());
            }
        }
        if self.group_id.is_none() {
            self.group_id = parent.effective_group_id().map(str::to_string);
        }
        if self.version.is_none() {
            self.version = parent.effective_version().map(str::to_string);
        }
        self.merge_dependency_management(&parent.dependency_management);
    }

    /// Append managed entries that are not already dominated by one of
    /// this POM's own.
    pub fn merge_dependency_management(&mut self, managed: &[PomDependency]) {
        for entry in managed {
            let already_managed = |d: &PomDependency| {
                d.group_id == entry.group_id && d.artifact_id == entry.artifact_id
            };
            if !self.dependency_management.iter().any(already_managed) {
                self.dependency_management.push(entry.clone());
            }
        }
    }

    /// Look up a managed version for a given group:artifact.
    pub fn managed_version(&self, group_id: &str, artifact_id: &str) -> Option<&str> {
        self.dependency_management
            .iter()
            .find(|d| d.group_id == group_id && d.artifact_id == artifact_id)
            .and_then(|d| d.version.as_deref())
    }

    /// BOM imports from dependency management
    /// (entries with `scope = "import"` and `type = "pom"`).
    pub fn bom_imports(&self) -> Vec<&PomDependency> {
        self.dependency_management
            .iter()
            .filter(|d| {
                d.scope.as_deref() == Some("import") && d.type_.as_deref().unwrap_or("jar") == "pom"
            })
            .collect()
    }
}

/// Parse a POM XML string.
pub fn parse_pom(xml: &str) -> miette::Result<Pom> {
    let raw: RawProject = quick_xml::de::from_str(xml).map_err(|e| BasisError::Metadata {
        message: format!("Failed to parse POM XML: {e}"),
    })?;
    Ok(raw.into_pom())
}

// Raw mirror of the XML document shape. Everything the model does not
// name (packaging, licenses, build sections, …) is ignored by serde.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProject {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    parent: Option<RawParent>,
    #[serde(default)]
    properties: BTreeMap<String, String>,
    dependencies: Option<RawDependencyList>,
    dependency_management: Option<RawDependencyManagement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParent {
    group_id: String,
    artifact_id: String,
    version: String,
}

#[derive(Debug, Deserialize)]
struct RawDependencyList {
    #[serde(default)]
    dependency: Vec<RawDependency>,
}

#[derive(Debug, Deserialize)]
struct RawDependencyManagement {
    dependencies: Option<RawDependencyList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDependency {
    group_id: String,
    artifact_id: String,
    version: Option<String>,
    scope: Option<String>,
    optional: Option<String>,
    #[serde(rename = "type")]
    type_: Option<String>,
    exclusions: Option<RawExclusionList>,
}

#[derive(Debug, Deserialize)]
struct RawExclusionList {
    #[serde(default)]
    exclusion: Vec<RawExclusion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExclusion {
    group_id: String,
    artifact_id: Option<String>,
}

impl RawProject {
    fn into_pom(self) -> Pom {
        Pom {
            group_id: self.group_id,
            artifact_id: self.artifact_id,
            version: self.version,
            parent: self.parent.map(|p| ParentRef {
                group_id: p.group_id,
                artifact_id: p.artifact_id,
                version: p.version,
            }),
            properties: self.properties,
            dependencies: convert_dependencies(self.dependencies),
            dependency_management: convert_dependencies(
                self.dependency_management.and_then(|dm| dm.dependencies),
            ),
        }
    }
}

fn convert_dependencies(list: Option<RawDependencyList>) -> Vec<PomDependency> {
    let entries = list.map(|l| l.dependency).unwrap_or_default();
    entries
        .into_iter()
        .map(|raw| PomDependency {
            group_id: raw.group_id,
            artifact_id: raw.artifact_id,
            version: raw.version,
            scope: raw.scope,
            optional: raw.optional.as_deref().map(str::trim) == Some("true"),
            type_: raw.type_,
            exclusions: raw
                .exclusions
                .map(|e| e.exclusion)
                .unwrap_or_default()
                .into_iter()
                .map(|raw| PomExclusion {
                    group_id: raw.group_id,
                    artifact_id: raw.artifact_id,
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pom(xml: &str) -> Pom {
        parse_pom(xml).expect("fixture POM parses")
    }

    #[test]
    fn coordinates_properties_and_scopes() {
        let parsed = pom(r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <modelVersion>4.0.0</modelVersion>
    <groupId>org.example</groupId>
    <artifactId>my-lib</artifactId>
    <version>1.0.0</version>
    <properties>
        <coroutines.version>1.8.0</coroutines.version>
    </properties>
    <dependencies>
        <dependency>
            <groupId>org.jetbrains.kotlinx</groupId>
            <artifactId>kotlinx-coroutines-core</artifactId>
            <version>${coroutines.version}</version>
        </dependency>
        <dependency>
            <groupId>junit</groupId>
            <artifactId>junit</artifactId>
            <version>4.13.2</version>
            <scope>test</scope>
        </dependency>
    </dependencies>
</project>"#);

        assert_eq!(parsed.group_id.as_deref(), Some("org.example"));
        assert_eq!(parsed.artifact_id.as_deref(), Some("my-lib"));
        assert_eq!(parsed.version.as_deref(), Some("1.0.0"));
        assert_eq!(parsed.dependencies.len(), 2);
        assert_eq!(parsed.properties["coroutines.version"], "1.8.0");
        assert_eq!(parsed.dependencies[1].scope.as_deref(), Some("test"));

        let mut parsed = parsed;
        parsed.resolve_properties();
        assert_eq!(parsed.dependencies[0].version.as_deref(), Some("1.8.0"));
    }

    #[test]
    fn builtin_project_variables() {
        let mut parsed = pom(r#"<?xml version="1.0"?>
<project>
    <groupId>org.example</groupId>
    <artifactId>lib</artifactId>
    <version>3.0.0</version>
    <dependencies>
        <dependency>
            <groupId>${project.groupId}</groupId>
            <artifactId>sibling</artifactId>
            <version>${project.version}</version>
        </dependency>
    </dependencies>
</project>"#);
        parsed.resolve_properties();
        assert_eq!(parsed.dependencies[0].group_id, "org.example");
        assert_eq!(parsed.dependencies[0].version.as_deref(), Some("3.0.0"));
    }

    #[test]
    fn unresolvable_reference_left_in_place() {
        let parsed = pom(r#"<?xml version="1.0"?>
<project>
    <groupId>org.example</groupId>
    <artifactId>lib</artifactId>
    <version>1.0</version>
</project>"#);
        assert_eq!(parsed.interpolate("${who.knows}"), "${who.knows}");
        assert_eq!(
            parsed.interpolate("${project.artifactId}-${who.knows}"),
            "lib-${who.knows}"
        );
    }

    #[test]
    fn exclusions_with_and_without_artifact() {
        let parsed = pom(r#"<?xml version="1.0"?>
<project>
    <groupId>org.example</groupId>
    <artifactId>app</artifactId>
    <version>1.0</version>
    <dependencies>
        <dependency>
            <groupId>com.example</groupId>
            <artifactId>lib</artifactId>
            <version>1.0</version>
            <exclusions>
                <exclusion>
                    <groupId>commons-logging</groupId>
                    <artifactId>commons-logging</artifactId>
                </exclusion>
                <exclusion>
                    <groupId>org.slf4j</groupId>
                </exclusion>
            </exclusions>
        </dependency>
    </dependencies>
</project>"#);

        let exclusions = &parsed.dependencies[0].exclusions;
        assert_eq!(exclusions.len(), 2);
        assert_eq!(exclusions[0].group_id, "commons-logging");
        assert_eq!(exclusions[0].artifact_id.as_deref(), Some("commons-logging"));
        assert_eq!(exclusions[1].group_id, "org.slf4j");
        assert!(exclusions[1].artifact_id.is_none());
    }

    #[test]
    fn optional_flag() {
        let parsed = pom(r#"<?xml version="1.0"?>
<project>
    <groupId>org.example</groupId>
    <artifactId>app</artifactId>
    <version>1.0</version>
    <dependencies>
        <dependency>
            <groupId>com.example</groupId>
            <artifactId>maybe</artifactId>
            <version>1.0</version>
            <optional>true</optional>
        </dependency>
        <dependency>
            <groupId>com.example</groupId>
            <artifactId>definitely</artifactId>
            <version>1.0</version>
        </dependency>
    </dependencies>
</project>"#);
        assert!(parsed.dependencies[0].optional);
        assert!(!parsed.dependencies[1].optional);
    }

    #[test]
    fn parent_supplies_group_and_version() {
        let parsed = pom(r#"<?xml version="1.0"?>
<project>
    <parent>
        <groupId>org.example</groupId>
        <artifactId>parent-pom</artifactId>
        <version>2.0.0</version>
    </parent>
    <artifactId>child</artifactId>
</project>"#);
        assert_eq!(parsed.effective_group_id(), Some("org.example"));
        assert_eq!(parsed.effective_version(), Some("2.0.0"));
        assert_eq!(parsed.parent.as_ref().unwrap().artifact_id, "parent-pom");
    }

    #[test]
    fn dependency_management_and_bom_imports() {
        let parsed = pom(r#"<?xml version="1.0"?>
<project>
    <groupId>org.example</groupId>
    <artifactId>parent</artifactId>
    <version>1.0.0</version>
    <dependencyManagement>
        <dependencies>
            <dependency>
                <groupId>org.jetbrains.kotlinx</groupId>
                <artifactId>kotlinx-coroutines-bom</artifactId>
                <version>1.8.0</version>
                <type>pom</type>
                <scope>import</scope>
            </dependency>
            <dependency>
                <groupId>com.google.guava</groupId>
                <artifactId>guava</artifactId>
                <version>32.0.0-jre</version>
            </dependency>
        </dependencies>
    </dependencyManagement>
</project>"#);

        assert_eq!(parsed.dependency_management.len(), 2);
        let boms = parsed.bom_imports();
        assert_eq!(boms.len(), 1);
        assert_eq!(boms[0].artifact_id, "kotlinx-coroutines-bom");
        assert_eq!(
            parsed.managed_version("com.google.guava", "guava"),
            Some("32.0.0-jre")
        );
    }

    #[test]
    fn parent_merge_keeps_child_values() {
        let mut child = pom(r#"<?xml version="1.0"?>
<project>
    <parent>
        <groupId>org.example</groupId>
        <artifactId>parent</artifactId>
        <version>1.0</version>
    </parent>
    <artifactId>child</artifactId>
    <properties>
        <shared.version>9.9</shared.version>
    </properties>
</project>"#);

        let parent = pom(r#"<?xml version="1.0"?>
<project>
    <groupId>org.example</groupId>
    <artifactId>parent</artifactId>
    <version>1.0</version>
    <properties>
        <shared.version>1.1</shared.version>
        <extra.version>2.2</extra.version>
    </properties>
    <dependencyManagement>
        <dependencies>
            <dependency>
                <groupId>org.dep</groupId>
                <artifactId>managed</artifactId>
                <version>${extra.version}</version>
            </dependency>
        </dependencies>
    </dependencyManagement>
</project>"#);

        child.apply_parent(&parent);
        assert_eq!(child.properties["shared.version"], "9.9");
        assert_eq!(child.properties["extra.version"], "2.2");
        assert_eq!(child.group_id.as_deref(), Some("org.example"));
        child.resolve_properties();
        assert_eq!(child.managed_version("org.dep", "managed"), Some("2.2"));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse_pom("<project><artifactId>x</project>").is_err());
    }
}
