//! Implementation of `quay dist`.
//!
//! Products are processed in dependency order. For each product the builder
//! populates its build directory, then each dister runs in configured order
//! with the outputs of the product's finished dependencies in its
//! environment. The first failure aborts the run; artifacts written before
//! it stay on disk.

use std::io::Write;
use std::time::Instant;

use rayon::prelude::*;

use crate::builder::{Builder, ScriptBuilder};
use crate::core::outputs::{DistOutputInfo, OutputLocator, OutputRecords, ProductOutputs};
use crate::core::param::{DisterParam, ProductParam, ProjectInfo, ProjectParam};
use crate::core::ProductId;
use crate::dist::env::dist_env;
use crate::dist::{DistContext, DistError, DistReport};
use crate::ops::quay_build::build_product;
use crate::util::fs::{clean_dir, list_files};
use crate::util::script;
use crate::util::shell::{Status, StatusSink};
use crate::util::EnvVars;

/// Options for a dist run.
#[derive(Debug, Clone, Default)]
pub struct DistOptions {
    /// Resolve and validate, report what would run, touch nothing
    pub dry_run: bool,

    /// Independent products processed at once (0 or 1 = sequential)
    pub jobs: usize,
}

/// Build and package `ids` (empty = all) with the script builder.
pub fn products(
    info: &ProjectInfo,
    param: &ProjectParam,
    ids: &[ProductId],
    opts: &DistOptions,
    out: &mut (dyn Write + Send),
) -> Result<DistReport, DistError> {
    products_with_builder(info, param, ids, opts, &ScriptBuilder, out)
}

/// Build and package `ids` (empty = all) with a caller-supplied builder.
pub fn products_with_builder(
    info: &ProjectInfo,
    param: &ProjectParam,
    ids: &[ProductId],
    opts: &DistOptions,
    builder: &dyn Builder,
    out: &mut (dyn Write + Send),
) -> Result<DistReport, DistError> {
    let start = Instant::now();
    let levels = param.product_levels(ids)?;
    let locator = param.locator(&info.version);
    let sink = StatusSink::new(out);

    let mut report = DistReport {
        products: levels
            .iter()
            .flatten()
            .map(|product| product.id.clone())
            .collect(),
        artifacts: Vec::new(),
        dry_run: opts.dry_run,
    };

    if opts.dry_run {
        for product in levels.iter().flatten() {
            describe_product(&locator, product, &sink);
        }
        return Ok(report);
    }

    let run = Run {
        info,
        param,
        locator: &locator,
        builder,
        out: &sink,
    };

    let pool = level_pool(opts.jobs);

    let mut records = OutputRecords::new();
    for level in &levels {
        let finished: Vec<ProductOutputs> = match &pool {
            Some(pool) if level.len() > 1 => pool.install(|| {
                level
                    .par_iter()
                    .map(|product| run.dist_product(product, &records))
                    .collect::<Result<_, _>>()
            })?,
            _ => level
                .iter()
                .map(|product| run.dist_product(product, &records))
                .collect::<Result<_, _>>()?,
        };

        // Dependents of this level only see its records once all of it succeeded.
        for outputs in finished {
            for dist in &outputs.dists {
                report
                    .add_dist(&outputs.product, dist)
                    .map_err(|e| DistError::Io {
                        product: outputs.product.to_string(),
                        message: format!("{:#}", e),
                    })?;
            }
            let product = outputs.product.clone();
            records.commit(product.clone(), outputs).map_err(|e| DistError::Io {
                product: product.to_string(),
                message: e.to_string(),
            })?;
        }
    }

    sink.status(
        Status::Finished,
        format!(
            "{} product(s), {} artifact(s) in {:.2}s",
            report.products.len(),
            report.artifacts.len(),
            start.elapsed().as_secs_f64()
        ),
    );

    Ok(report)
}

/// Worker pool for one run; `None` means sequential.
fn level_pool(jobs: usize) -> Option<rayon::ThreadPool> {
    if jobs <= 1 {
        return None;
    }
    match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
        Ok(pool) => Some(pool),
        Err(e) => {
            tracing::warn!(
                "could not start {} dist workers, packaging sequentially: {}",
                jobs,
                e
            );
            None
        }
    }
}

fn describe_product(locator: &OutputLocator, product: &ProductParam, out: &StatusSink<'_>) {
    out.status(
        Status::Info,
        format!(
            "would build `{}` into {}",
            product.id,
            locator.build_dir(&product.id).display()
        ),
    );
    for dister in &product.dist {
        let how = if dister.script.is_some() {
            "script"
        } else {
            dister.type_name.as_str()
        };
        out.status(
            Status::Info,
            format!(
                "would package `{}` with `{}` ({}) into {}",
                product.id,
                dister.id,
                how,
                locator.dist_dir(&product.id, &dister.id).display()
            ),
        );
    }
}

/// Shared state of one run.
struct Run<'a, 's> {
    info: &'a ProjectInfo,
    param: &'a ProjectParam,
    locator: &'a OutputLocator,
    builder: &'a dyn Builder,
    out: &'a StatusSink<'s>,
}

impl Run<'_, '_> {
    fn dist_product(
        &self,
        product: &ProductParam,
        records: &OutputRecords<ProductOutputs>,
    ) -> Result<ProductOutputs, DistError> {
        let dependencies = product
            .dependencies
            .iter()
            .map(|dep| {
                records.get(dep).ok_or_else(|| DistError::Io {
                    product: product.id.to_string(),
                    message: format!("outputs of dependency `{}` are not available", dep),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let build = build_product(
            self.info,
            self.locator,
            product,
            self.builder,
            self.out,
        )?;

        let mut dists = Vec::with_capacity(product.dist.len());
        for dister in &product.dist {
            let dist_dir = self.locator.dist_dir(&product.id, &dister.id);
            clean_dir(&dist_dir).map_err(|e| io_error(product, e))?;

            let env = dist_env(&self.info.version, &dist_dir, &dependencies);

            self.out.status(
                Status::Packaging,
                format!("{} v{} ({})", product.id, self.info.version, dister.id),
            );

            let ctx = DistContext {
                product,
                project: self.info,
                build_dir: &build.build_dir,
                dist_dir: &dist_dir,
            };
            let artifacts = self.run_dister(&ctx, dister, &env)?;

            tracing::debug!(
                "`{}` dister `{}` produced {:?}",
                product.id,
                dister.id,
                artifacts
            );

            dists.push(DistOutputInfo {
                dist_id: dister.id.clone(),
                dist_dir,
                artifacts,
            });
        }

        Ok(ProductOutputs {
            product: product.id.clone(),
            build,
            dists,
        })
    }

    /// Run the override script if there is one, the built-in generator
    /// otherwise.
    fn run_dister(
        &self,
        ctx: &DistContext<'_>,
        dister: &DisterParam,
        env: &EnvVars,
    ) -> Result<Vec<String>, DistError> {
        let product = ctx.product;

        let Some(body) = &dister.script else {
            return dister
                .dister
                .run(ctx, env)
                .map_err(|e| DistError::DisterGeneration {
                    product: product.id.to_string(),
                    dist_id: dister.id.to_string(),
                    message: format!("{:#}", e),
                });
        };

        let composed = script::compose(&self.param.script_includes, body);
        let output = script::run(&composed, ctx.dist_dir, env).map_err(|e| {
            DistError::script_failed(product.id.as_str(), "dister", dister.id.as_str(), e)
        })?;
        if !output.stdout.is_empty() {
            tracing::debug!("script output:\n{}", output.stdout.trim_end());
        }

        list_files(ctx.dist_dir).map_err(|e| io_error(product, e))
    }
}

fn io_error(product: &ProductParam, err: anyhow::Error) -> DistError {
    DistError::Io {
        product: product.id.to_string(),
        message: format!("{:#}", err),
    }
}
