// src/deps.rs

//! Dependency declaration and resolution
//!
//! A [`Dependency`] is a (name, version) pair drawn from an external
//! package index. Declaration is pure data attached to a recipe revision;
//! resolution happens against a [`DependencyIndex`] and either succeeds
//! for the whole set or halts the pipeline. No partial set is acted upon.

use crate::error::{Error, Result};
use semver::Version;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single external library requirement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    pub name: String,
    pub version: Version,
}

impl Dependency {
    pub fn new(name: &str, version: Version) -> Self {
        Self {
            name: name.to_string(),
            version,
        }
    }

    /// Parse a `name/version` spec, e.g. `xtr/2.1.2`
    pub fn parse(spec: &str) -> Result<Self> {
        let (name, version) = spec
            .split_once('/')
            .ok_or_else(|| Error::Parse(format!("invalid dependency spec '{}', expected name/version", spec)))?;

        if name.is_empty() {
            return Err(Error::Parse(format!("dependency spec '{}' has an empty name", spec)));
        }

        let version = version
            .parse::<Version>()
            .map_err(|e| Error::Parse(format!("invalid version in dependency spec '{}': {}", spec, e)))?;

        Ok(Self::new(name, version))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// Ordered collection of dependencies for one recipe revision
///
/// At most one version per name: inserting a second version for an
/// already-declared name is an error, inserting the identical pair again
/// is a no-op. Immutable once attached to a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    entries: Vec<Dependency>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from entries with unique names.
    ///
    /// Callers must guarantee uniqueness; used for the built-in revision
    /// tables where the entries are fixed.
    pub(crate) fn from_entries_unchecked(entries: Vec<Dependency>) -> Self {
        debug_assert!({
            let mut names: Vec<&str> = entries.iter().map(|d| d.name.as_str()).collect();
            names.sort_unstable();
            names.windows(2).all(|w| w[0] != w[1])
        });
        Self { entries }
    }

    /// Add a dependency, enforcing one version per name
    pub fn insert(&mut self, dep: Dependency) -> Result<()> {
        if let Some(existing) = self.get(&dep.name) {
            if existing.version == dep.version {
                return Ok(());
            }
            return Err(Error::Resolution {
                name: dep.name.clone(),
                version: dep.version.to_string(),
                reason: format!("conflicts with already declared version {}", existing.version),
            });
        }
        self.entries.push(dep);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Dependency> {
        self.entries.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries present in `self` but not in `other` (by name)
    pub fn added_since<'a>(&'a self, other: &DependencySet) -> Vec<&'a Dependency> {
        self.entries
            .iter()
            .filter(|d| !other.contains(&d.name))
            .collect()
    }
}

/// A dependency with its resolved on-disk locations and link metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub dependency: Dependency,
    /// Header directories consumers add to the include path
    pub include_dirs: Vec<PathBuf>,
    /// Directories searched for the dependency's libraries
    pub lib_dirs: Vec<PathBuf>,
    /// Library names to link, in order
    pub libs: Vec<String>,
}

/// Lookup interface over an external package index
///
/// The pipeline does not validate index content beyond resolution
/// success or failure.
pub trait DependencyIndex {
    /// Resolve a single dependency or report why it cannot be found
    fn resolve(&self, dep: &Dependency) -> Result<ResolvedDependency>;

    /// Resolve a whole set, all-or-nothing
    fn resolve_all(&self, set: &DependencySet) -> Result<Vec<ResolvedDependency>> {
        let mut resolved = Vec::with_capacity(set.len());
        for dep in set.iter() {
            debug!("Resolving {}", dep);
            resolved.push(self.resolve(dep)?);
        }
        Ok(resolved)
    }
}

/// Index backed by a local dependency cache
///
/// Expects packages laid out as `<root>/<name>/<version>/{include,lib}`.
pub struct LocalIndex {
    root: PathBuf,
}

impl LocalIndex {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn package_dir(&self, dep: &Dependency) -> PathBuf {
        self.root.join(&dep.name).join(dep.version.to_string())
    }
}

impl DependencyIndex for LocalIndex {
    fn resolve(&self, dep: &Dependency) -> Result<ResolvedDependency> {
        let dir = self.package_dir(dep);
        if !dir.is_dir() {
            return Err(Error::Resolution {
                name: dep.name.clone(),
                version: dep.version.to_string(),
                reason: format!("not present in dependency cache at {}", dir.display()),
            });
        }

        Ok(ResolvedDependency {
            dependency: dep.clone(),
            include_dirs: vec![dir.join("include")],
            lib_dirs: vec![dir.join("lib")],
            libs: vec![dep.name.clone()],
        })
    }
}

/// In-memory index, pre-seeded with resolved entries
///
/// Useful for tests and for environments where dependency locations are
/// known up front.
#[derive(Default)]
pub struct StaticIndex {
    entries: HashMap<String, ResolvedDependency>,
}

impl StaticIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, resolved: ResolvedDependency) {
        self.entries
            .insert(resolved.dependency.to_string(), resolved);
    }
}

impl DependencyIndex for StaticIndex {
    fn resolve(&self, dep: &Dependency) -> Result<ResolvedDependency> {
        self.entries
            .get(&dep.to_string())
            .cloned()
            .ok_or_else(|| Error::Resolution {
                name: dep.name.clone(),
                version: dep.version.to_string(),
                reason: "unknown to index".to_string(),
            })
    }
}
