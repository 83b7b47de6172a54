//! Reporting of version requests overridden by the conflict policy.

use std::fmt;

use jbasis_core::dependency::Coordinate;

/// Every version request the policy overrode during one resolution run,
/// in the order the losing observations were recorded.
#[derive(Debug, Default)]
pub struct ConflictReport {
    pub overrides: Vec<VersionConflict>,
}

/// A version request that lost to the resolved version.
#[derive(Debug, Clone)]
pub struct VersionConflict {
    pub coordinate: Coordinate,
    pub requested: String,
    pub resolved: String,
    /// Which policy decided: nearest wins, or highest version at equal
    /// depth.
    pub reason: String,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, conflict: VersionConflict) {
        self.overrides.push(conflict);
    }

    pub fn iter(&self) -> impl Iterator<Item = &VersionConflict> {
        self.overrides.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.overrides.is_empty() {
            return f.write_str("no version conflicts");
        }
        writeln!(f, "{} version conflict(s):", self.overrides.len())?;
        for conflict in &self.overrides {
            writeln!(f, "  {conflict}")?;
        }
        Ok(())
    }
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: requested {}, resolved {} ({})",
            self.coordinate, self.requested, self.resolved, self.reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report() {
        let report = ConflictReport::new();
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "no version conflicts");
    }

    #[test]
    fn rendered_report_names_both_versions() {
        let mut report = ConflictReport::new();
        report.record(VersionConflict {
            coordinate: Coordinate::new("org.example", "lib"),
            requested: "1.0".to_string(),
            resolved: "2.0".to_string(),
            reason: "nearest wins (depth 1 vs 3)".to_string(),
        });

        assert_eq!(report.len(), 1);
        assert_eq!(report.iter().count(), 1);
        let rendered = report.to_string();
        assert!(rendered.contains("org.example:lib"));
        assert!(rendered.contains("requested 1.0, resolved 2.0"));
        assert!(rendered.contains("nearest wins"));
    }
}
