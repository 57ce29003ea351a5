// src/layout.rs

//! Canonical directory layout for one build invocation
//!
//! Maps the logical roots (source, build, package, generated files) to
//! absolute paths under a workspace base directory. Build and package
//! roots embed the recipe name-version and a fingerprint of the settings
//! and dependency specs, so different revisions and settings never share
//! state.

use crate::error::{Error, Result};
use crate::recipe::Recipe;
use crate::settings::Settings;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Short digest over the recipe identity, settings and dependency specs
///
/// Two builds share a fingerprint only when their descriptors and
/// artifacts are interchangeable.
pub fn fingerprint(recipe: &Recipe, settings: &Settings) -> String {
    let mut hasher = Sha256::new();
    hasher.update(recipe.slug().as_bytes());
    hasher.update(b"\n");
    hasher.update(settings.to_string().as_bytes());
    hasher.update(b"\n");
    for spec in &recipe.requires {
        hasher.update(spec.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(&hasher.finalize()[..5])
}

/// Resolved logical roots for one build invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Where the exported sources live
    pub source_root: PathBuf,
    /// Native build system working tree
    pub build_root: PathBuf,
    /// Final package output tree
    pub package_root: PathBuf,
    /// Where generated descriptors are written
    pub generators_root: PathBuf,
}

impl Layout {
    /// Resolve the layout for a recipe under a workspace base directory.
    ///
    /// `source_dir` overrides the default `<base>/source`. All returned
    /// paths are absolute; failure to establish a writable root is fatal.
    pub fn resolve(
        base: &Path,
        source_dir: Option<&Path>,
        recipe: &Recipe,
        settings: &Settings,
    ) -> Result<Layout> {
        let base = std::path::absolute(base)
            .map_err(|e| Error::Layout(format!("cannot absolutize {}: {}", base.display(), e)))?;

        let source_root = match source_dir {
            Some(dir) => std::path::absolute(dir)
                .map_err(|e| Error::Layout(format!("cannot absolutize {}: {}", dir.display(), e)))?,
            None => base.join("source"),
        };

        let slug = recipe.slug();
        let fp = fingerprint(recipe, settings);

        let build_root = base.join("build").join(&slug).join(&fp);
        let generators_root = build_root.join("generators");
        let package_root = base.join("package").join(&slug).join(&fp);

        for dir in [&build_root, &generators_root] {
            fs::create_dir_all(dir)
                .map_err(|e| Error::Layout(format!("cannot create {}: {}", dir.display(), e)))?;
        }
        // The package root itself is only created by a successful publish,
        // but its parent must be writable for staging.
        if let Some(parent) = package_root.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Layout(format!("cannot create {}: {}", parent.display(), e)))?;
        }

        debug!(
            "Layout resolved: build={} package={}",
            build_root.display(),
            package_root.display()
        );

        Ok(Layout {
            source_root,
            build_root,
            package_root,
            generators_root,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Revision;

    #[test]
    fn test_roots_are_absolute() {
        let temp = tempfile::tempdir().unwrap();
        let recipe = Revision::Two.recipe();
        let layout =
            Layout::resolve(temp.path(), None, &recipe, &Settings::default()).unwrap();

        assert!(layout.source_root.is_absolute());
        assert!(layout.build_root.is_absolute());
        assert!(layout.package_root.is_absolute());
        assert!(layout.generators_root.starts_with(&layout.build_root));
    }

    #[test]
    fn test_revisions_get_isolated_roots() {
        let temp = tempfile::tempdir().unwrap();
        let settings = Settings::default();
        let l1 =
            Layout::resolve(temp.path(), None, &Revision::One.recipe(), &settings).unwrap();
        let l2 =
            Layout::resolve(temp.path(), None, &Revision::Two.recipe(), &settings).unwrap();

        assert_ne!(l1.build_root, l2.build_root);
        assert_ne!(l1.package_root, l2.package_root);
    }

    #[test]
    fn test_settings_change_fingerprint() {
        let recipe = Revision::Two.recipe();
        let release = Settings::default();
        let debug = Settings {
            build_type: crate::settings::BuildType::Debug,
            ..release
        };

        assert_ne!(fingerprint(&recipe, &release), fingerprint(&recipe, &debug));
        assert_eq!(fingerprint(&recipe, &release), fingerprint(&recipe, &release));
    }

    #[test]
    fn test_unwritable_base_is_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let blocker = temp.path().join("occupied");
        std::fs::write(&blocker, b"").unwrap();

        let recipe = Revision::One.recipe();
        let err = Layout::resolve(&blocker, None, &recipe, &Settings::default()).unwrap_err();
        assert_eq!(err.phase(), "layout");
    }

    #[test]
    fn test_source_dir_override() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("checkout");
        std::fs::create_dir_all(&src).unwrap();

        let recipe = Revision::One.recipe();
        let layout =
            Layout::resolve(temp.path(), Some(&src), &recipe, &Settings::default()).unwrap();
        assert_eq!(layout.source_root, std::path::absolute(&src).unwrap());
    }
}
