//! Machine-readable run output.
//!
//! With `--message-format json` each event is printed as one JSON object
//! per line. Existing fields are stable; new fields may be added.

use std::path::PathBuf;

use serde::Serialize;

use crate::core::outputs::DistOutputInfo;
use crate::core::ProductId;
use crate::util::hash::sha256_file;

/// An event emitted during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum DistEvent {
    /// A product's build directory was populated.
    ProductBuilt { product: String, build_dir: PathBuf },

    /// A dister produced an artifact.
    DistArtifact {
        product: String,
        dist_id: String,
        path: PathBuf,
        sha256: String,
    },

    /// A docker builder produced an image.
    DockerImage {
        product: String,
        docker_id: String,
        tags: Vec<String>,
    },

    /// The run completed.
    RunFinished {
        success: bool,
        duration_ms: u64,
        products: usize,
    },
}

/// One artifact of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactReport {
    pub product: ProductId,
    pub dist_id: String,
    pub path: PathBuf,
    pub sha256: String,
}

/// Summary of a dist run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DistReport {
    /// Products in processing order
    pub products: Vec<ProductId>,

    pub artifacts: Vec<ArtifactReport>,

    pub dry_run: bool,
}

impl DistReport {
    /// Record the artifacts of one dister, hashing each file.
    pub fn add_dist(&mut self, product: &ProductId, dist: &DistOutputInfo) -> anyhow::Result<()> {
        for path in dist.artifact_paths() {
            let sha256 = sha256_file(&path)?;
            self.artifacts.push(ArtifactReport {
                product: product.clone(),
                dist_id: dist.dist_id.to_string(),
                path,
                sha256,
            });
        }
        Ok(())
    }

    pub fn events(&self) -> impl Iterator<Item = DistEvent> + '_ {
        self.artifacts.iter().map(|a| DistEvent::DistArtifact {
            product: a.product.to_string(),
            dist_id: a.dist_id.clone(),
            path: a.path.clone(),
            sha256: a.sha256.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DistId;
    use tempfile::TempDir;

    #[test]
    fn test_event_json_shape() {
        let event = DistEvent::DockerImage {
            product: "foo".to_string(),
            docker_id: "image".to_string(),
            tags: vec!["example/foo:1.0.0".to_string()],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["reason"], "docker-image");
        assert_eq!(json["tags"][0], "example/foo:1.0.0");
    }

    #[test]
    fn test_report_hashes_artifacts() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("foo.tgz"), b"hello").unwrap();

        let mut report = DistReport::default();
        report
            .add_dist(
                &ProductId::from("foo"),
                &DistOutputInfo {
                    dist_id: DistId::from("bin"),
                    dist_dir: tmp.path().to_path_buf(),
                    artifacts: vec!["foo.tgz".to_string()],
                },
            )
            .unwrap();

        assert_eq!(report.artifacts.len(), 1);
        assert_eq!(
            report.artifacts[0].sha256,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        let events: Vec<_> = report.events().collect();
        assert!(matches!(events[0], DistEvent::DistArtifact { .. }));
    }
}
