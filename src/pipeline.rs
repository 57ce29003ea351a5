// src/pipeline.rs

//! The build pipeline: Layout -> Requirements -> Generate -> Build -> Package
//!
//! Strictly linear and synchronous. Every phase is a precondition for
//! the next and the first failure stops the run; re-running with
//! unchanged inputs reproduces the same descriptors and package.

use crate::buildsys::BuildSystem;
use crate::deps::DependencyIndex;
use crate::descriptor::{self, GeneratedDescriptors};
use crate::error::Result;
use crate::layout::Layout;
use crate::package::{self, PackageArtifactSet};
use crate::recipe::{validate_recipe, Recipe, Revision};
use crate::settings::Settings;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Immutable configuration for one pipeline run
///
/// Each phase receives this value; no state accumulates on the recipe
/// between phases.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub recipe: Recipe,
    pub settings: Settings,
    /// Workspace base directory holding source/build/package trees
    pub base_dir: PathBuf,
    /// Overrides `<base_dir>/source` when set
    pub source_dir: Option<PathBuf>,
}

impl BuildConfig {
    pub fn new(recipe: Recipe, settings: Settings, base_dir: &Path) -> Self {
        Self {
            recipe,
            settings,
            base_dir: base_dir.to_path_buf(),
            source_dir: None,
        }
    }

    /// Configuration for a built-in HyCAN revision
    pub fn for_revision(revision: Revision, settings: Settings, base_dir: &Path) -> Self {
        Self::new(revision.recipe(), settings, base_dir)
    }

    pub fn with_source_dir(mut self, dir: &Path) -> Self {
        self.source_dir = Some(dir.to_path_buf());
        self
    }
}

/// Phase 1: resolve the directory layout
pub fn resolve_layout(config: &BuildConfig) -> Result<Layout> {
    info!("Resolving layout for {}", config.recipe.slug());
    Layout::resolve(
        &config.base_dir,
        config.source_dir.as_deref(),
        &config.recipe,
        &config.settings,
    )
}

/// Phases 1-3: layout, requirement resolution, descriptor generation
pub fn generate(
    config: &BuildConfig,
    index: &dyn DependencyIndex,
) -> Result<(Layout, GeneratedDescriptors)> {
    for warning in validate_recipe(&config.recipe)? {
        warn!("{}: {}", config.recipe.slug(), warning);
    }

    let layout = resolve_layout(config)?;

    info!("Declaring requirements for {}", config.recipe.slug());
    let requirements = config.recipe.requirements()?;
    info!(
        "Requirements: {}",
        requirements
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    // Resolution is all-or-nothing; an unresolvable entry halts the
    // pipeline here, before anything is generated
    let resolved = index.resolve_all(&requirements)?;

    let descriptors = descriptor::generate(&config.recipe, &config.settings, &resolved, &layout)?;
    Ok((layout, descriptors))
}

/// Phases 1-4: everything through the native build
pub fn build(
    config: &BuildConfig,
    index: &dyn DependencyIndex,
    build: &dyn BuildSystem,
) -> Result<Layout> {
    let (layout, _descriptors) = generate(config, index)?;

    info!("Configuring {}", config.recipe.slug());
    build.configure(&layout, &config.settings)?;

    info!("Building {}", config.recipe.slug());
    build.compile(&layout)?;

    Ok(layout)
}

/// The full pipeline, ending in a published package
pub fn run(
    config: &BuildConfig,
    index: &dyn DependencyIndex,
    buildsys: &dyn BuildSystem,
) -> Result<PackageArtifactSet> {
    let layout = build(config, index, buildsys)?;

    info!("Packaging {}", config.recipe.slug());
    let artifact = package::package(&config.recipe, &layout, buildsys)?;

    info!(
        "Done: {} -> {}",
        config.recipe.slug(),
        artifact.root.display()
    );
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_for_revision() {
        let temp = tempfile::tempdir().unwrap();
        let config =
            BuildConfig::for_revision(Revision::Two, Settings::default(), temp.path());
        assert_eq!(config.recipe.package.name, "HyCAN");
        assert_eq!(config.recipe.package.version, "0.2.0");
        assert!(config.source_dir.is_none());
    }

    #[test]
    fn test_config_source_override() {
        let temp = tempfile::tempdir().unwrap();
        let config =
            BuildConfig::for_revision(Revision::One, Settings::default(), temp.path())
                .with_source_dir(&temp.path().join("checkout"));
        assert!(config.source_dir.is_some());
    }
}
