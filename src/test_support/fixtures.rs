//! Test fixtures for common test scenarios.
//!
//! Pre-built products and projects on disk, plus `Quay.toml` snippets.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::config::ProjectConfig;
use crate::core::os_arch::OsArch;
use crate::core::param::{BuildParam, DisterParam, ProductParam, ProjectInfo, ProjectParam};
use crate::core::{DistId, ProductId};
use crate::dist::registry::OS_ARCH_BIN_TYPE;
use crate::dist::{DistContext, DisterFactory};
use crate::docker::DockerBuilderFactory;
use crate::util::context::PROJECT_FILE;

/// A product with the default dister and no dependencies.
pub fn product_param(id: &str, os_archs: Vec<OsArch>) -> ProductParam {
    let factory = DisterFactory::new().unwrap();
    ProductParam {
        id: ProductId::from(id),
        build: BuildParam {
            script: None,
            os_archs,
            output_name: id.to_string(),
        },
        dist: vec![DisterParam {
            id: DistId::from(OS_ARCH_BIN_TYPE),
            type_name: OS_ARCH_BIN_TYPE.to_string(),
            script: None,
            dister: factory.create(OS_ARCH_BIN_TYPE, None).unwrap(),
        }],
        docker: Vec::new(),
        dependencies: Vec::new(),
    }
}

/// A product whose build directory lives in a temp dir.
pub struct BuiltProduct {
    _tmp: TempDir,
    pub product: ProductParam,
    pub project: ProjectInfo,
    build_dir: PathBuf,
    dist_dir: PathBuf,
}

impl BuiltProduct {
    /// Fake executables are written for every target.
    pub fn new(product: ProductParam, version: &str) -> Self {
        let built = Self::unbuilt(product, version);
        for os_arch in &built.product.build.os_archs {
            let exe = built.product.build.executable_path(&built.build_dir, os_arch);
            std::fs::create_dir_all(exe.parent().unwrap()).unwrap();
            std::fs::write(&exe, format!("{} {}", built.product.id, os_arch)).unwrap();
        }
        built
    }

    /// Directories exist but nothing was built.
    pub fn unbuilt(product: ProductParam, version: &str) -> Self {
        let tmp = TempDir::new().unwrap();
        let build_dir = tmp.path().join("build");
        let dist_dir = tmp.path().join("dist");
        std::fs::create_dir_all(&build_dir).unwrap();
        std::fs::create_dir_all(&dist_dir).unwrap();

        BuiltProduct {
            project: ProjectInfo::new(tmp.path(), version),
            _tmp: tmp,
            product,
            build_dir,
            dist_dir,
        }
    }

    pub fn context(&self) -> DistContext<'_> {
        DistContext {
            product: &self.product,
            project: &self.project,
            build_dir: &self.build_dir,
            dist_dir: &self.dist_dir,
        }
    }

    pub fn dist_dir(&self) -> &Path {
        &self.dist_dir
    }
}

/// A `Quay.toml` plus extra files.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    /// Quay.toml content
    pub manifest: String,

    /// Extra files (path relative to project root -> content)
    pub files: Vec<(PathBuf, String)>,
}

impl ProjectFixture {
    pub fn new(manifest: impl Into<String>) -> Self {
        ProjectFixture {
            manifest: manifest.into(),
            files: Vec::new(),
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    /// Write this fixture to a real directory.
    pub fn write_to(&self, root: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(root)?;
        std::fs::write(root.join(PROJECT_FILE), &self.manifest)?;

        for (rel_path, content) in &self.files {
            let full_path = root.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
        }

        Ok(root.join(PROJECT_FILE))
    }

    /// Write this fixture into a fresh temp dir.
    pub fn write(&self) -> WrittenProject {
        let tmp = TempDir::new().unwrap();
        self.write_to(tmp.path()).unwrap();
        WrittenProject { tmp }
    }
}

/// A fixture on disk; removed on drop.
pub struct WrittenProject {
    tmp: TempDir,
}

impl WrittenProject {
    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    /// Parse and validate with the built-in types at `version`.
    pub fn load(&self, version: &str) -> (ProjectInfo, ProjectParam) {
        let config = ProjectConfig::load(&self.root().join(PROJECT_FILE)).unwrap();
        let param = config
            .to_param(
                self.root(),
                &DisterFactory::new().unwrap(),
                &DockerBuilderFactory::new().unwrap(),
            )
            .unwrap();
        (ProjectInfo::new(self.root(), version), param)
    }
}

/// Common `Quay.toml` snippets.
pub mod manifests {
    /// A `[products.<id>.build]` block whose script writes a fake executable.
    pub fn fake_build_block(id: &str) -> String {
        format!(
            r##"
[products.{id}.build]
script = """#!/bin/sh
printf 'fake {id}' > "$OUTPUT_DIR/{id}"
chmod +x "$OUTPUT_DIR/{id}"
"""
"##
        )
    }

    /// A product with the default dister and a fake build.
    pub fn product_with_fake_build(id: &str) -> String {
        format!("\n[products.{id}]\n{}", fake_build_block(id))
    }
}
