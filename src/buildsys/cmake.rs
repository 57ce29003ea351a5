// src/buildsys/cmake.rs

//! CMake-backed implementation of the build system capability

use crate::descriptor;
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::settings::Settings;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Drives a CMake build through configure/compile/install
pub struct CMakeBuild {
    binary: PathBuf,
}

impl CMakeBuild {
    /// Locate `cmake` on PATH
    pub fn locate() -> Result<Self> {
        let binary = which::which("cmake")
            .map_err(|e| Error::NotFound(format!("cmake binary: {}", e)))?;
        debug!("Using cmake at {}", binary.display());
        Ok(Self { binary })
    }

    /// Use an explicit cmake binary
    pub fn with_binary(binary: PathBuf) -> Self {
        Self { binary }
    }

    fn run(&self, step: &str, args: &[String]) -> Result<()> {
        info!("Running cmake {} step", step);
        debug!("cmake {}", args.join(" "));

        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|e| Error::Io(format!("failed to spawn {}: {}", self.binary.display(), e)))?;

        if !output.status.success() {
            // Diagnostics pass through unmodified
            return Err(Error::Build {
                step: step.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

impl super::BuildSystem for CMakeBuild {
    fn configure(&self, layout: &Layout, settings: &Settings) -> Result<()> {
        let toolchain = layout.generators_root.join(descriptor::TOOLCHAIN_FILE);
        let dependencies = layout.generators_root.join(descriptor::DEPENDENCIES_FILE);

        let args = vec![
            "-S".to_string(),
            layout.source_root.display().to_string(),
            "-B".to_string(),
            layout.build_root.display().to_string(),
            format!("-DCMAKE_BUILD_TYPE={}", settings.build_type),
            format!("-DCMAKE_CXX_STANDARD={}", descriptor::CXX_STANDARD),
            format!("-DHYFORGE_TOOLCHAIN={}", toolchain.display()),
            format!("-DHYFORGE_DEPENDENCIES={}", dependencies.display()),
        ];

        self.run("configure", &args)
    }

    fn compile(&self, layout: &Layout) -> Result<()> {
        let args = vec![
            "--build".to_string(),
            layout.build_root.display().to_string(),
        ];
        self.run("compile", &args)
    }

    fn install(&self, layout: &Layout, dest: &Path) -> Result<()> {
        let args = vec![
            "--install".to_string(),
            layout.build_root.display().to_string(),
            "--prefix".to_string(),
            dest.display().to_string(),
        ];
        self.run("install", &args)
    }
}
