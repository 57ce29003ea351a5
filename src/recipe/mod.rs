// src/recipe/mod.rs

//! Recipe system: versioned descriptions of how to build and package
//!
//! A recipe names a buildable unit, declares its external dependencies
//! and supported settings axes, and lists the source globs to export.
//! The built-in HyCAN revisions live in [`revisions`]; arbitrary recipes
//! can also be loaded from TOML files.
//!
//! # Example Recipe
//!
//! ```toml
//! requires = ["xtr/2.1.2", "libnl/3.8.0"]
//! exports = ["CMakeLists.txt", "src/*", "example/*", "README.md"]
//! libs = ["HyCAN"]
//!
//! [package]
//! name = "HyCAN"
//! version = "0.2.0"
//! license = "BSD-3-Clause"
//! ```

mod format;
pub mod parser;
pub mod revisions;

pub use format::{PackageSection, Recipe};
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe};
pub use revisions::Revision;
