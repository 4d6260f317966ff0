//! `quay products` command
//!
//! Prints one product per line in the order `quay dist` would process them.

use anyhow::Result;

use super::{product_ids, Session};
use crate::cli::{GlobalArgs, ProductsArgs};

pub fn execute(args: ProductsArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::load(global, false)?;
    let param = session.param()?;

    for product in param.ordered_products(&product_ids(&args.products))? {
        println!("{}", product.id);
    }

    Ok(())
}
