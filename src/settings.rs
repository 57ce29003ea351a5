// src/settings.rs

//! Fixed settings axes for recipe builds
//!
//! The four axes (os, compiler, build_type, arch) are closed enumerations.
//! Recipes declare which axes they support; they never invent new ones.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// A settings axis a recipe may declare support for
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Axis {
    Os,
    Compiler,
    BuildType,
    Arch,
}

impl Axis {
    /// All axes, in canonical declaration order
    pub fn all() -> [Axis; 4] {
        [Axis::Os, Axis::Compiler, Axis::BuildType, Axis::Arch]
    }
}

/// Target operating system
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
pub enum Os {
    #[default]
    Linux,
}

/// Compiler family
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Compiler {
    #[default]
    Gcc,
    Clang,
}

/// Build type, matching the native build system's canonical names
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

/// Target architecture
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
pub enum Arch {
    #[default]
    #[serde(rename = "x86_64")]
    #[strum(serialize = "x86_64")]
    X86_64,
    #[serde(rename = "armv8")]
    #[strum(serialize = "armv8")]
    Armv8,
}

/// One concrete point in the settings matrix for a build invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Settings {
    pub os: Os,
    pub compiler: Compiler,
    pub build_type: BuildType,
    pub arch: Arch,
}

impl Settings {
    /// Value of a single axis, as the string the build system sees
    pub fn axis_value(&self, axis: Axis) -> String {
        match axis {
            Axis::Os => self.os.to_string(),
            Axis::Compiler => self.compiler.to_string(),
            Axis::BuildType => self.build_type.to_string(),
            Axis::Arch => self.arch.to_string(),
        }
    }
}

impl std::fmt::Display for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "os={} compiler={} build_type={} arch={}",
            self.os, self.compiler, self.build_type, self.arch
        )
    }
}
