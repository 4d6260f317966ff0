//! Implementation of `quay docker`.
//!
//! Runs after `quay dist`: input dist artifacts are read back from their
//! dist directories and staged into each builder's context directory.

use std::io::Write;

use crate::core::outputs::{DockerOutputInfo, OutputRecords, ProductImages, ProductOutputs};
use crate::core::param::{DockerBuilderParam, ProductParam, ProjectInfo, ProjectParam};
use crate::core::ProductId;
use crate::dist::DistError;
use crate::docker::env::docker_env;
use crate::docker::DockerContext;
use crate::util::fs::{copy_into, ensure_dir};
use crate::util::script;
use crate::util::shell::{Status, StatusSink};

/// Options for a docker run.
#[derive(Debug, Clone, Default)]
pub struct DockerOptions {
    pub dry_run: bool,
}

/// Build the images of `ids` (empty = all) and their dependencies.
///
/// Products without docker builders still take part in ordering; they
/// expose no images to dependents.
pub fn docker_images(
    info: &ProjectInfo,
    param: &ProjectParam,
    ids: &[ProductId],
    opts: &DockerOptions,
    out: &mut (dyn Write + Send),
) -> Result<Vec<ProductImages>, DistError> {
    let order = param.ordered_products(ids)?;
    let sink = StatusSink::new(out);

    let mut records: OutputRecords<ProductImages> = OutputRecords::new();
    let mut built = Vec::new();

    for product in order {
        let dependencies = product
            .dependencies
            .iter()
            .filter_map(|dep| records.get(dep))
            .collect::<Vec<_>>();

        let mut images = Vec::with_capacity(product.docker.len());
        for docker in &product.docker {
            let tags = docker.tags(&product.id, &info.version);

            if opts.dry_run {
                sink.status(
                    Status::Info,
                    format!(
                        "would build image `{}` of `{}` tagged {}",
                        docker.id,
                        product.id,
                        tags.join(", ")
                    ),
                );
            } else {
                sink.status(
                    Status::Imaging,
                    format!("{} v{} ({})", product.id, info.version, docker.id),
                );
                build_image(info, param, product, docker, &tags, &dependencies)?;
            }

            images.push(DockerOutputInfo {
                docker_id: docker.id.clone(),
                tags,
            });
        }

        let record = ProductImages {
            product: product.id.clone(),
            images,
        };
        built.push(record.clone());
        records
            .commit(product.id.clone(), record)
            .map_err(|e| DistError::Io {
                product: product.id.to_string(),
                message: e.to_string(),
            })?;
    }

    Ok(built)
}

fn build_image(
    info: &ProjectInfo,
    param: &ProjectParam,
    product: &ProductParam,
    docker: &DockerBuilderParam,
    tags: &[String],
    dependencies: &[&ProductImages],
) -> Result<(), DistError> {
    let docker_error = |message: String| DistError::DockerBuild {
        product: product.id.to_string(),
        docker_id: docker.id.to_string(),
        message,
    };

    let locator = param.locator(&info.version);
    let outputs = ProductOutputs::from_disk(product, &locator)
        .map_err(|e| docker_error(format!("{:#}", e)))?;

    ensure_dir(&docker.context_dir).map_err(|e| docker_error(format!("{:#}", e)))?;

    for input in &docker.input_dists {
        let dist = outputs
            .dist(input)
            .filter(|dist| !dist.artifacts.is_empty())
            .ok_or_else(|| {
                docker_error(format!(
                    "input dist `{}` has no artifacts; run `quay dist {}` first",
                    input, product.id
                ))
            })?;
        for artifact in dist.artifact_paths() {
            copy_into(&artifact, &docker.context_dir)
                .map_err(|e| docker_error(format!("{:#}", e)))?;
        }
    }

    let env = docker_env(&info.version, &docker.context_dir, dependencies);

    if let Some(body) = &docker.script {
        let composed = script::compose(&param.script_includes, body);
        script::run(&composed, &docker.context_dir, &env).map_err(|e| {
            DistError::script_failed(product.id.as_str(), "docker builder", docker.id.as_str(), e)
        })?;
        return Ok(());
    }

    docker
        .builder
        .run(
            &DockerContext {
                product,
                project: info,
                context_dir: &docker.context_dir,
                tags,
            },
            &env,
        )
        .map_err(|e| docker_error(format!("{:#}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::quay_dist::{products, DistOptions};
    use crate::test_support::fixtures::{manifests, ProjectFixture};

    #[test]
    fn test_script_builder_sees_contract_and_inputs() {
        let fixture = ProjectFixture::new(format!(
            r##"
[products.bar.docker.docker-builders.image]
type = "default"
context-dir = "docker/bar"
tags = ["example/{{{{Product}}}}:{{{{Version}}}}"]
script = """#!/bin/sh
true
"""

[products.foo]
dependencies = ["bar"]

[products.foo.docker.docker-builders.image]
type = "default"
context-dir = "docker/foo"
input-dists = ["os-arch-bin"]
tags = ["example/{{{{Product}}}}:{{{{Version}}}}"]
script = """#!/bin/sh
echo "$VERSION $DEP_PRODUCT_ID_COUNT $DEP_PRODUCT_ID_0 $DEP_PRODUCT_ID_0_DOCKER_ID_0 $DEP_PRODUCT_ID_0_DOCKER_ID_0_TAG_0" > env.txt
ls *.tgz > inputs.txt
"""
{}
{}"##,
            manifests::fake_build_block("foo"),
            manifests::product_with_fake_build("bar"),
        ))
        .with_file("docker/foo/Dockerfile", "FROM scratch\n");
        let project = fixture.write();
        let (info, param) = project.load("1.0.0");

        products(&info, &param, &[], &DistOptions::default(), &mut Vec::new()).unwrap();
        let images = docker_images(
            &info,
            &param,
            &[ProductId::from("foo")],
            &DockerOptions::default(),
            &mut Vec::new(),
        )
        .unwrap();

        assert_eq!(images.len(), 2);
        assert_eq!(images[1].images[0].tags, vec!["example/foo:1.0.0"]);

        let context = project.root().join("docker/foo");
        assert_eq!(
            std::fs::read_to_string(context.join("env.txt")).unwrap(),
            "1.0.0 1 bar image example/bar:1.0.0\n"
        );
        let inputs = std::fs::read_to_string(context.join("inputs.txt")).unwrap();
        assert!(inputs.starts_with("foo-1.0.0-"));
        assert!(context.join("Dockerfile").is_file());
    }

    #[test]
    fn test_missing_input_dist() {
        let fixture = ProjectFixture::new(
            r#"
[products.foo.docker.docker-builders.image]
type = "default"
context-dir = "docker"
input-dists = ["os-arch-bin"]
tags = ["example/foo"]
"#,
        );
        let project = fixture.write();
        let (info, param) = project.load("1.0.0");

        let err = docker_images(&info, &param, &[], &DockerOptions::default(), &mut Vec::new())
            .unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, DistError::DockerBuild { .. }));
        assert!(msg.contains("quay dist foo"));
    }

    #[test]
    fn test_dry_run_reports_tags() {
        let fixture = ProjectFixture::new(
            r#"
[products.foo.docker.docker-builders.image]
type = "default"
context-dir = "docker"
tags = ["example/{{Product}}:{{Version}}"]
"#,
        );
        let project = fixture.write();
        let (info, param) = project.load("2.0.0");

        let mut out = Vec::new();
        docker_images(
            &info,
            &param,
            &[],
            &DockerOptions { dry_run: true },
            &mut out,
        )
        .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("tagged example/foo:2.0.0"));
        assert!(!project.root().join("docker").exists());
    }
}
