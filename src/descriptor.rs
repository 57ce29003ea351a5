// src/descriptor.rs

//! Generated descriptor files for the native build system
//!
//! Two descriptors are written per build under the generated-file root:
//! a dependency-location descriptor and a toolchain descriptor. Their
//! content is deterministic for unchanged inputs, so re-generation is an
//! idempotent overwrite. The exact meaning of the keys is owned by the
//! consuming build system; hyforge only guarantees where the files are
//! and that they are complete.

use crate::deps::ResolvedDependency;
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::recipe::Recipe;
use crate::settings::Settings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// C++ language standard, pinned across all revisions
pub const CXX_STANDARD: &str = "23";

/// File name of the toolchain descriptor under the generators root
pub const TOOLCHAIN_FILE: &str = "toolchain.toml";

/// File name of the dependency-location descriptor under the generators root
pub const DEPENDENCIES_FILE: &str = "dependencies.toml";

/// Build-wide toolchain options handed to the native build system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainDescriptor {
    /// Language standard; fixed regardless of other setting changes
    pub cxx_standard: String,
    /// Axis name to value, for the axes the recipe declares
    pub settings: BTreeMap<String, String>,
}

impl ToolchainDescriptor {
    pub fn new(recipe: &Recipe, settings: &Settings) -> Result<Self> {
        let mut map = BTreeMap::new();
        for axis in &recipe.settings {
            let value = settings.axis_value(*axis);
            if map.insert(axis.to_string(), value).is_some() {
                return Err(Error::Generation(format!(
                    "settings axis '{}' declared twice in recipe",
                    axis
                )));
            }
        }
        Ok(Self {
            cxx_standard: CXX_STANDARD.to_string(),
            settings: map,
        })
    }
}

/// Resolved location of one dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyLocation {
    pub name: String,
    pub version: String,
    pub include_dirs: Vec<String>,
    pub lib_dirs: Vec<String>,
    pub libs: Vec<String>,
    /// Transitive build-system metadata (target names and the like)
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// Dependency-location descriptor: one entry per dependency, in
/// declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDescriptor {
    #[serde(default, rename = "dependency")]
    pub dependencies: Vec<DependencyLocation>,
}

impl DependencyDescriptor {
    pub fn from_resolved(resolved: &[ResolvedDependency]) -> Self {
        let dependencies = resolved
            .iter()
            .map(|r| {
                let name = r.dependency.name.clone();
                let mut metadata = BTreeMap::new();
                metadata.insert(
                    "cmake_target_name".to_string(),
                    format!("{}::{}", name, name),
                );
                DependencyLocation {
                    version: r.dependency.version.to_string(),
                    include_dirs: r.include_dirs.iter().map(display_path).collect(),
                    lib_dirs: r.lib_dirs.iter().map(display_path).collect(),
                    libs: r.libs.clone(),
                    metadata,
                    name,
                }
            })
            .collect();
        Self { dependencies }
    }
}

fn display_path(path: &PathBuf) -> String {
    path.display().to_string()
}

/// Paths of the descriptor files written by [`generate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDescriptors {
    pub toolchain_file: PathBuf,
    pub dependencies_file: PathBuf,
}

/// Write both descriptors under the generated-file root.
///
/// Safe to re-run: unchanged inputs produce byte-identical files.
pub fn generate(
    recipe: &Recipe,
    settings: &Settings,
    resolved: &[ResolvedDependency],
    layout: &Layout,
) -> Result<GeneratedDescriptors> {
    if !layout.generators_root.is_dir() {
        return Err(Error::Generation(format!(
            "generators root {} does not exist",
            layout.generators_root.display()
        )));
    }

    let toolchain = ToolchainDescriptor::new(recipe, settings)?;
    let dependencies = DependencyDescriptor::from_resolved(resolved);

    let toolchain_file = layout.generators_root.join(TOOLCHAIN_FILE);
    let dependencies_file = layout.generators_root.join(DEPENDENCIES_FILE);

    write_descriptor(&toolchain_file, &toolchain)?;
    write_descriptor(&dependencies_file, &dependencies)?;

    info!(
        "Generated descriptors under {}",
        layout.generators_root.display()
    );

    Ok(GeneratedDescriptors {
        toolchain_file,
        dependencies_file,
    })
}

fn write_descriptor<T: Serialize>(path: &PathBuf, value: &T) -> Result<()> {
    let content = toml::to_string_pretty(value)
        .map_err(|e| Error::Generation(format!("cannot serialize {}: {}", path.display(), e)))?;
    fs::write(path, content)
        .map_err(|e| Error::Generation(format!("cannot write {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::{DependencyIndex, StaticIndex};
    use crate::recipe::Revision;

    fn seeded_index(revision: Revision, root: &std::path::Path) -> StaticIndex {
        let mut index = StaticIndex::new();
        for dep in revision.requirements().iter() {
            let dir = root.join(&dep.name).join(dep.version.to_string());
            index.add(ResolvedDependency {
                dependency: dep.clone(),
                include_dirs: vec![dir.join("include")],
                lib_dirs: vec![dir.join("lib")],
                libs: vec![dep.name.clone()],
            });
        }
        index
    }

    #[test]
    fn test_toolchain_pins_cxx_standard() {
        for rev in Revision::all() {
            let descriptor =
                ToolchainDescriptor::new(&rev.recipe(), &Settings::default()).unwrap();
            assert_eq!(descriptor.cxx_standard, "23");
            assert_eq!(descriptor.settings.get("arch").map(String::as_str), Some("x86_64"));
        }
    }

    #[test]
    fn test_generate_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let recipe = Revision::Two.recipe();
        let settings = Settings::default();
        let layout =
            Layout::resolve(temp.path(), None, &recipe, &settings).unwrap();

        let index = seeded_index(Revision::Two, temp.path());
        let resolved = index.resolve_all(&Revision::Two.requirements()).unwrap();

        let first = generate(&recipe, &settings, &resolved, &layout).unwrap();
        let bytes_toolchain = fs::read(&first.toolchain_file).unwrap();
        let bytes_deps = fs::read(&first.dependencies_file).unwrap();

        let second = generate(&recipe, &settings, &resolved, &layout).unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read(&second.toolchain_file).unwrap(), bytes_toolchain);
        assert_eq!(fs::read(&second.dependencies_file).unwrap(), bytes_deps);
    }

    #[test]
    fn test_dependency_descriptor_preserves_order() {
        let temp = tempfile::tempdir().unwrap();
        let index = seeded_index(Revision::Two, temp.path());
        let resolved = index.resolve_all(&Revision::Two.requirements()).unwrap();

        let descriptor = DependencyDescriptor::from_resolved(&resolved);
        let names: Vec<&str> = descriptor
            .dependencies
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["xtr", "libnl"]);
        assert_eq!(
            descriptor.dependencies[0].metadata.get("cmake_target_name").map(String::as_str),
            Some("xtr::xtr")
        );
    }

    #[test]
    fn test_descriptor_round_trips_through_toml() {
        let temp = tempfile::tempdir().unwrap();
        let index = seeded_index(Revision::Two, temp.path());
        let resolved = index.resolve_all(&Revision::Two.requirements()).unwrap();

        let descriptor = DependencyDescriptor::from_resolved(&resolved);
        let text = toml::to_string_pretty(&descriptor).unwrap();
        let parsed: DependencyDescriptor = toml::from_str(&text).unwrap();
        assert_eq!(parsed, descriptor);
    }
}
