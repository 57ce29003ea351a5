// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files that describe a buildable unit: its metadata,
//! the settings axes it supports, the source globs it exports, its
//! dependency requirements, and the library names consumers link.

use crate::deps::{Dependency, DependencySet};
use crate::error::{Error, Result};
use crate::settings::Axis;
use semver::Version;
use serde::Deserialize;

/// A complete recipe for one buildable unit
#[derive(Debug, Clone, Deserialize)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageSection,

    /// Settings axes this recipe supports (closed enumeration)
    #[serde(default = "default_settings_axes")]
    pub settings: Vec<Axis>,

    /// Path globs exported as source, relative to the source root
    #[serde(default)]
    pub exports: Vec<String>,

    /// Dependency specs, `name/version`, in declaration order
    #[serde(default)]
    pub requires: Vec<String>,

    /// Library names consumers must link, in order
    ///
    /// Defaults to the package name when empty.
    #[serde(default)]
    pub libs: Vec<String>,
}

fn default_settings_axes() -> Vec<Axis> {
    Axis::all().to_vec()
}

/// Package metadata section
#[derive(Debug, Clone, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version (semver)
    pub version: String,

    /// License identifier (SPDX)
    #[serde(default)]
    pub license: Option<String>,

    /// Author name and contact
    #[serde(default)]
    pub author: Option<String>,

    /// Project URL
    #[serde(default)]
    pub url: Option<String>,

    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,

    /// Topic tags
    #[serde(default)]
    pub topics: Vec<String>,
}

impl Recipe {
    /// Parsed semver version of the package
    pub fn version(&self) -> Result<Version> {
        self.package
            .version
            .parse::<Version>()
            .map_err(|e| Error::Parse(format!("invalid recipe version '{}': {}", self.package.version, e)))
    }

    /// `name-version` identifier used in directory names
    pub fn slug(&self) -> String {
        format!("{}-{}", self.package.name, self.package.version)
    }

    /// The ordered dependency set declared by this recipe
    pub fn requirements(&self) -> Result<DependencySet> {
        let mut set = DependencySet::new();
        for spec in &self.requires {
            set.insert(Dependency::parse(spec)?)?;
        }
        Ok(set)
    }

    /// Ordered link-library names published to consumers
    pub fn link_libs(&self) -> Vec<String> {
        if self.libs.is_empty() {
            vec![self.package.name.clone()]
        } else {
            self.libs.clone()
        }
    }

    /// Whether all consumer-facing metadata fields are present
    pub fn is_metadata_complete(&self) -> bool {
        self.package.license.is_some()
            && self.package.author.is_some()
            && self.package.url.is_some()
            && self.package.description.is_some()
    }
}
