// src/recipe/revisions.rs

//! Built-in HyCAN recipe revisions
//!
//! The dependency set for each revision is a pure function of the
//! revision, kept in one place so its evolution stays auditable. The
//! second revision adds the netlink binding used for direct CAN-socket
//! support; nothing else changes between the sets.

use crate::deps::{Dependency, DependencySet};
use crate::recipe::format::{PackageSection, Recipe};
use semver::Version;
use std::fmt;
use std::str::FromStr;

/// Logging library required by every revision
const XTR: (&str, u64, u64, u64) = ("xtr", 2, 1, 2);
/// Netlink binding, added in the second revision
const LIBNL: (&str, u64, u64, u64) = ("libnl", 3, 8, 0);

const EXPORTS: &[&str] = &["CMakeLists.txt", "src/*", "example/*", "README.md"];

/// A published revision of the HyCAN recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Revision {
    /// 0.1.0: structured logging only
    One,
    /// 0.2.0: adds the netlink binding for direct CAN-socket support
    Two,
    /// 0.2.1: internal revision without public metadata
    Three,
}

impl Revision {
    /// All revisions, oldest first
    pub fn all() -> [Revision; 3] {
        [Revision::One, Revision::Two, Revision::Three]
    }

    /// The most recent revision
    pub fn latest() -> Revision {
        Revision::Three
    }

    pub fn number(&self) -> u32 {
        match self {
            Revision::One => 1,
            Revision::Two => 2,
            Revision::Three => 3,
        }
    }

    /// Package version for this revision; monotonically advancing
    pub fn version(&self) -> Version {
        match self {
            Revision::One => Version::new(0, 1, 0),
            Revision::Two => Version::new(0, 2, 0),
            Revision::Three => Version::new(0, 2, 1),
        }
    }

    /// The ordered dependency set declared by this revision
    pub fn requirements(&self) -> DependencySet {
        let mut entries = vec![dep(XTR)];
        if !matches!(self, Revision::One) {
            entries.push(dep(LIBNL));
        }
        DependencySet::from_entries_unchecked(entries)
    }

    /// The recipe for this revision
    pub fn recipe(&self) -> Recipe {
        let requires = self
            .requirements()
            .iter()
            .map(|d| d.to_string())
            .collect();

        let package = match self {
            // The last revision ships without public metadata; validation
            // flags the missing fields.
            Revision::Three => PackageSection {
                name: "HyCAN".to_string(),
                version: self.version().to_string(),
                license: None,
                author: None,
                url: None,
                description: None,
                topics: Vec::new(),
            },
            _ => PackageSection {
                name: "HyCAN".to_string(),
                version: self.version().to_string(),
                license: Some("BSD-3-Clause".to_string()),
                author: Some("MoonFeather moonfeather120@outlook.com".to_string()),
                url: Some("https://github.com/RoboMaster-DLMU-CONE/HyCAN".to_string()),
                description: Some(
                    "Modern high-performance Linux C++ CAN communication protocol library"
                        .to_string(),
                ),
                topics: vec![
                    "canbus".to_string(),
                    "linux".to_string(),
                    "c++23".to_string(),
                    "network".to_string(),
                ],
            },
        };

        Recipe {
            package,
            settings: crate::settings::Axis::all().to_vec(),
            exports: EXPORTS.iter().map(|s| s.to_string()).collect(),
            requires,
            libs: vec!["HyCAN".to_string()],
        }
    }
}

fn dep((name, major, minor, patch): (&str, u64, u64, u64)) -> Dependency {
    Dependency::new(name, Version::new(major, minor, patch))
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.version())
    }
}

impl FromStr for Revision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" | "0.1.0" => Ok(Revision::One),
            "2" | "0.2.0" => Ok(Revision::Two),
            "3" | "0.2.1" => Ok(Revision::Three),
            other => Err(format!("unknown revision '{}', expected 1, 2 or 3", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::parser::validate_recipe;

    #[test]
    fn test_versions_advance_monotonically() {
        let versions: Vec<Version> = Revision::all().iter().map(|r| r.version()).collect();
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_first_revision_has_logging_only() {
        let deps = Revision::One.requirements();
        assert_eq!(deps.len(), 1);
        assert!(deps.contains("xtr"));
        assert!(!deps.contains("libnl"));
    }

    #[test]
    fn test_second_revision_adds_exactly_netlink() {
        let v1 = Revision::One.requirements();
        let v2 = Revision::Two.requirements();

        let added = v2.added_since(&v1);
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].to_string(), "libnl/3.8.0");
        assert!(v1.added_since(&v2).is_empty());
    }

    #[test]
    fn test_requirements_are_deterministic() {
        assert_eq!(Revision::Two.requirements(), Revision::Two.requirements());
        assert_eq!(Revision::Three.requirements(), Revision::Two.requirements());
    }

    #[test]
    fn test_recipes_round_trip_requirements() {
        for rev in Revision::all() {
            let recipe = rev.recipe();
            assert_eq!(recipe.requirements().unwrap(), rev.requirements());
        }
    }

    #[test]
    fn test_link_libs_stable_across_revisions() {
        for rev in Revision::all() {
            assert_eq!(rev.recipe().link_libs(), vec!["HyCAN"]);
        }
    }

    #[test]
    fn test_third_revision_flagged_incomplete() {
        let recipe = Revision::Three.recipe();
        assert!(!recipe.is_metadata_complete());

        let warnings = validate_recipe(&recipe).unwrap();
        assert!(warnings.iter().any(|w| w.contains("license")));
        assert!(warnings.iter().any(|w| w.contains("author")));

        // Public revisions carry complete metadata
        assert!(validate_recipe(&Revision::Two.recipe()).unwrap().is_empty());
    }

    #[test]
    fn test_revision_from_str() {
        assert_eq!("2".parse::<Revision>().unwrap(), Revision::Two);
        assert_eq!("0.2.1".parse::<Revision>().unwrap(), Revision::Three);
        assert!("4".parse::<Revision>().is_err());
    }
}
