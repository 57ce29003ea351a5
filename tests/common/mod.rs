// tests/common/mod.rs

//! Shared test utilities and helpers for pipeline integration tests.

use hyforge::{BuildConfig, BuildSystem, Error, Layout, LocalIndex, Result, Revision, Settings};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a workspace with a HyCAN-shaped source tree and a dependency
/// cache seeded for every revision.
///
/// Returns the TempDir - keep it alive to prevent cleanup.
pub fn setup_workspace() -> TempDir {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("source");

    fs::create_dir_all(source.join("src")).unwrap();
    fs::create_dir_all(source.join("example")).unwrap();
    fs::write(source.join("LICENSE"), "BSD 3-Clause License").unwrap();
    fs::write(source.join("README.md"), "# HyCAN\n").unwrap();
    fs::write(source.join("CMakeLists.txt"), "project(HyCAN CXX)\n").unwrap();
    fs::write(source.join("src/Interface.cpp"), "").unwrap();
    fs::write(source.join("example/example.cpp"), "").unwrap();

    // The latest revision's requirements cover every earlier set
    seed_dep_cache(&temp.path().join("deps"), Revision::latest());

    temp
}

/// Populate the local dependency cache for a revision
pub fn seed_dep_cache(root: &Path, revision: Revision) {
    for dep in revision.requirements().iter() {
        let dir = root.join(&dep.name).join(dep.version.to_string());
        fs::create_dir_all(dir.join("include")).unwrap();
        fs::create_dir_all(dir.join("lib")).unwrap();
    }
}

pub fn config_for(revision: Revision, base: &Path) -> BuildConfig {
    BuildConfig::for_revision(revision, Settings::default(), base)
}

pub fn index_for(base: &Path) -> LocalIndex {
    LocalIndex::new(&base.join("deps"))
}

/// Build system stand-in that records invocations and fabricates
/// install artifacts.
pub struct FakeBuild {
    calls: Mutex<Vec<String>>,
}

impl FakeBuild {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, step: &str) {
        self.calls.lock().unwrap().push(step.to_string());
    }
}

impl BuildSystem for FakeBuild {
    fn configure(&self, layout: &Layout, _settings: &Settings) -> Result<()> {
        self.record("configure");
        fs::write(layout.build_root.join("build-state.txt"), "configured")?;
        Ok(())
    }

    fn compile(&self, layout: &Layout) -> Result<()> {
        self.record("compile");
        fs::write(layout.build_root.join("libHyCAN.a"), "object code")?;
        Ok(())
    }

    fn install(&self, layout: &Layout, dest: &Path) -> Result<()> {
        self.record("install");
        let lib = dest.join("lib");
        fs::create_dir_all(&lib)?;
        fs::copy(layout.build_root.join("libHyCAN.a"), lib.join("libHyCAN.a"))?;
        let include = dest.join("include").join("HyCAN");
        fs::create_dir_all(&include)?;
        fs::write(include.join("Interface.hpp"), "#pragma once\n")?;
        Ok(())
    }
}

/// Build system that fails at a chosen step with tool diagnostics
pub struct FailingBuild {
    step: &'static str,
    stderr: &'static str,
}

impl FailingBuild {
    pub fn at(step: &'static str, stderr: &'static str) -> Self {
        Self { step, stderr }
    }

    fn maybe_fail(&self, step: &'static str) -> Result<()> {
        if self.step == step {
            return Err(Error::Build {
                step: step.to_string(),
                stderr: self.stderr.to_string(),
            });
        }
        Ok(())
    }
}

impl BuildSystem for FailingBuild {
    fn configure(&self, _layout: &Layout, _settings: &Settings) -> Result<()> {
        self.maybe_fail("configure")
    }

    fn compile(&self, _layout: &Layout) -> Result<()> {
        self.maybe_fail("compile")
    }

    fn install(&self, _layout: &Layout, _dest: &Path) -> Result<()> {
        self.maybe_fail("install")
    }
}
