// src/lib.rs

//! HyForge: recipe-driven build pipeline for the HyCAN library
//!
//! A small, strictly linear orchestrator around a native build system:
//!
//! - Layout: canonical source/build/package/generator roots
//! - Requirements: the ordered dependency set of a recipe revision
//! - Generate: dependency-location and toolchain descriptors
//! - Build: configure + compile through the [`buildsys::BuildSystem`] trait
//! - Package: install, auxiliary files, link metadata, atomic publish
//!
//! Everything is fail-fast: the pipeline stops at the first failing phase
//! and later phases are never attempted.

pub mod buildsys;
pub mod deps;
pub mod descriptor;
mod error;
pub mod layout;
pub mod package;
pub mod pipeline;
pub mod recipe;
pub mod settings;

pub use buildsys::{BuildSystem, CMakeBuild};
pub use deps::{Dependency, DependencyIndex, DependencySet, LocalIndex, ResolvedDependency, StaticIndex};
pub use descriptor::{DependencyDescriptor, GeneratedDescriptors, ToolchainDescriptor, CXX_STANDARD};
pub use error::{Error, Result};
pub use layout::Layout;
pub use package::{package_info, PackageArtifactSet, PackageManifest};
pub use pipeline::BuildConfig;
pub use recipe::{parse_recipe, parse_recipe_file, validate_recipe, Recipe, Revision};
pub use settings::{Arch, Axis, BuildType, Compiler, Os, Settings};
