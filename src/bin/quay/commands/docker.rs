//! `quay docker` command

use anyhow::Result;

use quay::dist::DistEvent;
use quay::ops::{docker_images, DockerOptions};
use quay::util::shell::Status;

use super::{product_ids, Session};
use crate::cli::{DockerArgs, GlobalArgs, MessageFormat};

pub fn execute(args: DockerArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::load(global, args.message_format == MessageFormat::Json)?;
    let param = session.param()?;
    let info = session.info()?;

    let opts = DockerOptions {
        dry_run: args.dry_run,
    };
    let built = {
        let mut out = session.status_out();
        docker_images(&info, &param, &product_ids(&args.products), &opts, &mut *out)?
    };

    for product in &built {
        for image in &product.images {
            if session.shell.is_json() {
                session.shell.json_event(&DistEvent::DockerImage {
                    product: product.product.to_string(),
                    docker_id: image.docker_id.to_string(),
                    tags: image.tags.clone(),
                });
            } else if !args.dry_run {
                session.shell.status(Status::Created, image.tags.join(", "));
            }
        }
    }

    Ok(())
}
