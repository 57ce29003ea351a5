// src/recipe/parser.rs

//! Recipe file parsing and validation

use crate::deps::Dependency;
use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use std::path::Path;

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::Parse(format!("Invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Io(format!("Failed to read recipe file: {}", e)))?;

    parse_recipe(&content)
}

/// Validate a recipe for completeness and correctness
///
/// Hard errors stop the pipeline; incomplete metadata is flagged as
/// warnings so an internal revision is never silently accepted as a
/// public one.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if recipe.package.name.is_empty() {
        return Err(Error::Parse("Recipe package name cannot be empty".to_string()));
    }
    if recipe.package.version.is_empty() {
        return Err(Error::Parse("Recipe package version cannot be empty".to_string()));
    }

    // Version must be a valid semver
    recipe.version()?;

    // Every dependency spec must parse
    for spec in &recipe.requires {
        Dependency::parse(spec)?;
    }

    // Flag missing consumer-facing metadata
    if recipe.package.license.is_none() {
        warnings.push("Missing package license".to_string());
    }
    if recipe.package.author.is_none() {
        warnings.push("Missing package author".to_string());
    }
    if recipe.package.url.is_none() {
        warnings.push("Missing package url".to_string());
    }
    if recipe.package.description.is_none() {
        warnings.push("Missing package description".to_string());
    }

    if recipe.exports.is_empty() {
        warnings.push("Recipe exports no source paths".to_string());
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_recipe() {
        let content = r#"
requires = ["xtr/2.1.2"]

[package]
name = "HyCAN"
version = "0.1.0"
"#;

        let recipe = parse_recipe(content).unwrap();
        assert_eq!(recipe.package.name, "HyCAN");
    }

    #[test]
    fn test_parse_invalid_recipe() {
        let content = "this is not valid toml at all {}";
        assert!(parse_recipe(content).is_err());
    }

    #[test]
    fn test_validate_empty_name() {
        let content = r#"
[package]
name = ""
version = "1.0.0"
"#;

        let recipe = parse_recipe(content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_bad_version() {
        let content = r#"
[package]
name = "HyCAN"
version = "latest"
"#;

        let recipe = parse_recipe(content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_bad_dependency_spec() {
        let content = r#"
requires = ["xtr"]

[package]
name = "HyCAN"
version = "0.1.0"
"#;

        let recipe = parse_recipe(content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_warnings_for_incomplete_metadata() {
        let content = r#"
exports = ["CMakeLists.txt", "src/*"]

[package]
name = "HyCAN"
version = "0.2.1"
"#;

        let recipe = parse_recipe(content).unwrap();
        let warnings = validate_recipe(&recipe).unwrap();
        assert!(warnings.iter().any(|w| w.contains("license")));
        assert!(warnings.iter().any(|w| w.contains("author")));
        assert!(warnings.iter().any(|w| w.contains("url")));
        assert!(warnings.iter().any(|w| w.contains("description")));
    }
}
