//! `quay project-version` command

use anyhow::Result;

use super::Session;
use crate::cli::GlobalArgs;

pub fn execute(global: &GlobalArgs) -> Result<()> {
    let session = Session::load(global, false)?;
    println!("{}", session.info()?.version);
    Ok(())
}
