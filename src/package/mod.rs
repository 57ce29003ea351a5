// src/package/mod.rs

//! Packaging: staging, auxiliary files, and link metadata
//!
//! The install step populates a staging directory, auxiliary files are
//! copied in, and the manifest is written last. Only then is the staging
//! directory renamed into the package root, so a consumer can never
//! observe a partial package: failure at any point leaves no published
//! root.

use crate::buildsys::BuildSystem;
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::recipe::Recipe;
use glob::glob;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Manifest file marking a complete package; written last
pub const MANIFEST_FILE: &str = "package.toml";

/// License file expected at the source root
pub const LICENSE_FILE: &str = "LICENSE";

/// Readme file expected at the source root
pub const README_FILE: &str = "README.md";

/// Consumer-facing package metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    /// Ordered library names consumers must link
    pub libs: Vec<String>,
    /// License location relative to the package root
    pub license_file: String,
    /// Readme location relative to the package root
    pub readme_file: String,
}

/// The published package tree plus its manifest
#[derive(Debug, Clone)]
pub struct PackageArtifactSet {
    pub root: PathBuf,
    pub manifest: PackageManifest,
}

/// Run the install step and publish the package root.
///
/// All-or-nothing: artifacts are staged next to the final root and the
/// rename happens only after the manifest is in place.
pub fn package(
    recipe: &Recipe,
    layout: &Layout,
    build: &dyn BuildSystem,
) -> Result<PackageArtifactSet> {
    let parent = layout
        .package_root
        .parent()
        .ok_or_else(|| Error::Packaging(format!(
            "package root {} has no parent for staging",
            layout.package_root.display()
        )))?;

    let staging = tempfile::Builder::new()
        .prefix(".stage-")
        .tempdir_in(parent)
        .map_err(|e| Error::Packaging(format!("cannot create staging directory: {}", e)))?;

    // Install step; a failure here is a packaging failure with the
    // tool's diagnostics embedded
    build
        .install(layout, staging.path())
        .map_err(|e| match e {
            Error::Build { step, stderr } => {
                Error::Packaging(format!("{} step failed: {}", step, stderr))
            }
            other => other,
        })?;

    copy_aux_files(&layout.source_root, staging.path())?;
    export_sources(recipe, &layout.source_root, staging.path())?;

    let manifest = PackageManifest {
        name: recipe.package.name.clone(),
        version: recipe.package.version.clone(),
        libs: recipe.link_libs(),
        license_file: format!("licenses/{}", LICENSE_FILE),
        readme_file: README_FILE.to_string(),
    };
    write_manifest(staging.path(), &manifest)?;

    // Replace any previous publish of the same fingerprint, then commit
    if layout.package_root.exists() {
        fs::remove_dir_all(&layout.package_root)
            .map_err(|e| Error::Packaging(format!("cannot replace previous package: {}", e)))?;
    }
    let staged = staging.into_path();
    fs::rename(&staged, &layout.package_root).map_err(|e| {
        Error::Packaging(format!(
            "cannot publish package to {}: {}",
            layout.package_root.display(),
            e
        ))
    })?;

    info!("Published package at {}", layout.package_root.display());

    Ok(PackageArtifactSet {
        root: layout.package_root.clone(),
        manifest,
    })
}

/// Read back the manifest of a published package
pub fn package_info(package_root: &Path) -> Result<PackageManifest> {
    let path = package_root.join(MANIFEST_FILE);
    if !path.is_file() {
        return Err(Error::NotFound(format!(
            "no complete package at {}",
            package_root.display()
        )));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Parse(format!("invalid package manifest {}: {}", path.display(), e)))
}

/// Copy the fixed auxiliary files; a missing one fails the phase
fn copy_aux_files(source_root: &Path, staging: &Path) -> Result<()> {
    let license_src = source_root.join(LICENSE_FILE);
    if !license_src.is_file() {
        return Err(Error::Packaging(format!(
            "missing {} at {}",
            LICENSE_FILE,
            source_root.display()
        )));
    }
    let license_dir = staging.join("licenses");
    fs::create_dir_all(&license_dir)?;
    fs::copy(&license_src, license_dir.join(LICENSE_FILE))?;

    let readme_src = source_root.join(README_FILE);
    if !readme_src.is_file() {
        return Err(Error::Packaging(format!(
            "missing {} at {}",
            README_FILE,
            source_root.display()
        )));
    }
    fs::copy(&readme_src, staging.join(README_FILE))?;

    Ok(())
}

/// Copy the recipe's export globs into the package, preserving the
/// relative structure
fn export_sources(recipe: &Recipe, source_root: &Path, staging: &Path) -> Result<()> {
    for pattern in &recipe.exports {
        let full = source_root.join(pattern);
        let full = full.to_string_lossy();
        let matches = glob(&full)
            .map_err(|e| Error::Packaging(format!("invalid export glob '{}': {}", pattern, e)))?;

        for entry in matches {
            let path =
                entry.map_err(|e| Error::Packaging(format!("unreadable export path: {}", e)))?;
            let rel = path.strip_prefix(source_root).map_err(|_| {
                Error::Packaging(format!(
                    "export {} escapes source root {}",
                    path.display(),
                    source_root.display()
                ))
            })?;
            let dest = staging.join(rel);
            debug!("Exporting {}", rel.display());
            copy_tree(&path, &dest)?;
        }
    }
    Ok(())
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    if from.is_dir() {
        fs::create_dir_all(to)?;
        for entry in fs::read_dir(from)? {
            let entry = entry?;
            copy_tree(&entry.path(), &to.join(entry.file_name()))?;
        }
    } else {
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(from, to)?;
    }
    Ok(())
}

fn write_manifest(staging: &Path, manifest: &PackageManifest) -> Result<()> {
    let content = toml::to_string_pretty(manifest)
        .map_err(|e| Error::Packaging(format!("cannot serialize manifest: {}", e)))?;
    fs::write(staging.join(MANIFEST_FILE), content)
        .map_err(|e| Error::Packaging(format!("cannot write manifest: {}", e)))
}
