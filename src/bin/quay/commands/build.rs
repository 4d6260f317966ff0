//! `quay build` command

use anyhow::Result;

use quay::builder::ScriptBuilder;
use quay::ops::build_products;
use quay::util::shell::Status;

use super::{product_ids, Session};
use crate::cli::{BuildArgs, GlobalArgs};

pub fn execute(args: BuildArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::load(global, false)?;
    let param = session.param()?;
    let info = session.info()?;

    let built = {
        let mut out = session.status_out();
        build_products(
            &info,
            &param,
            &product_ids(&args.products),
            &ScriptBuilder,
            &mut *out,
        )?
    };

    if session.shell.is_verbose() {
        for (product, output) in &built {
            session.shell.status(
                Status::Info,
                format!("{} -> {}", product, output.build_dir.display()),
            );
        }
    }
    session.shell.status(
        Status::Finished,
        format!("{} product(s) at version {}", built.len(), info.version),
    );

    Ok(())
}
