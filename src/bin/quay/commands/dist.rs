//! `quay dist` command

use std::time::Instant;

use anyhow::Result;

use quay::core::OutputLocator;
use quay::dist::{DistEvent, DistReport};
use quay::ops::{products, DistOptions};
use quay::util::shell::Status;

use super::{product_ids, Session};
use crate::cli::{DistArgs, GlobalArgs, MessageFormat};

pub fn execute(args: DistArgs, global: &GlobalArgs) -> Result<()> {
    let start = Instant::now();
    let session = Session::load(global, args.message_format == MessageFormat::Json)?;
    let param = session.param()?;
    let info = session.info()?;

    // Jobs: CLI > settings > sequential
    let opts = DistOptions {
        dry_run: args.dry_run,
        jobs: args.jobs.unwrap_or_else(|| session.settings.jobs()),
    };
    let ids = product_ids(&args.products);

    let result = {
        let mut out = session.status_out();
        products(&info, &param, &ids, &opts, &mut *out)
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            session.shell.json_event(&DistEvent::RunFinished {
                success: false,
                duration_ms: start.elapsed().as_millis() as u64,
                products: 0,
            });
            return Err(e.into());
        }
    };

    if session.shell.is_json() {
        emit_events(&session, &param.locator(&info.version), &report);
        session.shell.json_event(&DistEvent::RunFinished {
            success: true,
            duration_ms: start.elapsed().as_millis() as u64,
            products: report.products.len(),
        });
        return Ok(());
    }

    if report.dry_run {
        session.shell.status(
            Status::Finished,
            format!(
                "dry run of {} product(s) at version {}",
                report.products.len(),
                info.version
            ),
        );
    } else if report.artifacts.is_empty() {
        session.shell.warn("no artifacts were produced");
    } else {
        for artifact in &report.artifacts {
            session
                .shell
                .status(Status::Created, artifact.path.display());
        }
    }

    Ok(())
}

fn emit_events(session: &Session, locator: &OutputLocator, report: &DistReport) {
    if !report.dry_run {
        for product in &report.products {
            session.shell.json_event(&DistEvent::ProductBuilt {
                product: product.to_string(),
                build_dir: locator.build_dir(product),
            });
        }
    }
    for event in report.events() {
        session.shell.json_event(&event);
    }
}
