//! Output locations and per-run output records.
//!
//! Layout:
//!
//! ```text
//! <build-root>/<product>/<version>/
//! <dist-root>/<product>/<version>/<dist-id>/
//! ```
//!
//! Records are filled in once per product as each stage completes and are
//! read-only afterwards. They live for one run; only the files on disk
//! outlive the process.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::Serialize;

use crate::core::param::ProductParam;
use crate::core::{DistId, DockerId, ProductId};
use crate::util::fs::list_files;

/// `<build_root>/<product>/<version>`
pub fn build_dir(build_root: &Path, product: &ProductId, version: &str) -> PathBuf {
    build_root.join(product.as_str()).join(version)
}

/// `<dist_root>/<product>/<version>/<dist_id>`
pub fn dist_dir(dist_root: &Path, product: &ProductId, version: &str, dist_id: &DistId) -> PathBuf {
    dist_root
        .join(product.as_str())
        .join(version)
        .join(dist_id.as_str())
}

/// Output paths for one resolved version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocator {
    build_root: PathBuf,
    dist_root: PathBuf,
    version: String,
}

impl OutputLocator {
    pub fn new(build_root: &Path, dist_root: &Path, version: &str) -> Self {
        OutputLocator {
            build_root: build_root.to_path_buf(),
            dist_root: dist_root.to_path_buf(),
            version: version.to_string(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn build_dir(&self, product: &ProductId) -> PathBuf {
        build_dir(&self.build_root, product, &self.version)
    }

    pub fn dist_dir(&self, product: &ProductId, dist_id: &DistId) -> PathBuf {
        dist_dir(&self.dist_root, product, &self.version, dist_id)
    }
}

/// Build output of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutputInfo {
    pub build_dir: PathBuf,
}

/// Output of one dister of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistOutputInfo {
    pub dist_id: DistId,
    pub dist_dir: PathBuf,

    /// Artifact file names inside `dist_dir`, in production order
    pub artifacts: Vec<String>,
}

impl DistOutputInfo {
    pub fn artifact_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.artifacts.iter().map(|a| self.dist_dir.join(a))
    }
}

/// Everything a finished product exposes to its dependents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductOutputs {
    pub product: ProductId,
    pub build: BuildOutputInfo,

    /// One entry per dister, in configured order
    pub dists: Vec<DistOutputInfo>,
}

impl ProductOutputs {
    /// Reconstruct a product's outputs from a previous dist run on disk.
    ///
    /// A dist directory that does not exist yields no artifacts.
    pub fn from_disk(product: &ProductParam, locator: &OutputLocator) -> Result<Self> {
        let mut dists = Vec::with_capacity(product.dist.len());
        for dister in &product.dist {
            let dist_dir = locator.dist_dir(&product.id, &dister.id);
            let artifacts = if dist_dir.is_dir() {
                list_files(&dist_dir)?
            } else {
                Vec::new()
            };
            dists.push(DistOutputInfo {
                dist_id: dister.id.clone(),
                dist_dir,
                artifacts,
            });
        }

        Ok(ProductOutputs {
            product: product.id.clone(),
            build: BuildOutputInfo {
                build_dir: locator.build_dir(&product.id),
            },
            dists,
        })
    }

    pub fn dist(&self, id: &DistId) -> Option<&DistOutputInfo> {
        self.dists.iter().find(|d| &d.dist_id == id)
    }
}

/// Images produced by one docker builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DockerOutputInfo {
    pub docker_id: DockerId,
    pub tags: Vec<String>,
}

/// Everything a finished product exposes to dependents' docker builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductImages {
    pub product: ProductId,

    /// One entry per docker builder, in configured order
    pub images: Vec<DockerOutputInfo>,
}

/// Write-once records keyed by product.
#[derive(Debug, Clone)]
pub struct OutputRecords<T> {
    records: BTreeMap<ProductId, T>,
}

impl<T> Default for OutputRecords<T> {
    fn default() -> Self {
        OutputRecords {
            records: BTreeMap::new(),
        }
    }
}

impl<T> OutputRecords<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished product. Each product is recorded at most once.
    pub fn commit(&mut self, product: ProductId, record: T) -> Result<()> {
        if self.records.contains_key(&product) {
            bail!("outputs of product `{}` were already recorded", product);
        }
        self.records.insert(product, record);
        Ok(())
    }

    pub fn get(&self, product: &ProductId) -> Option<&T> {
        self.records.get(product)
    }

    pub fn contains(&self, product: &ProductId) -> bool {
        self.records.contains_key(product)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
