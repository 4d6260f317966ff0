//! Test utilities and mocks for Quay unit tests.
//!
//! Fixtures write real projects to temp directories; [`RecordingBuilder`]
//! stands in for the build step so packaging can be tested without build
//! scripts.

pub mod fixtures;

use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::builder::{BuildContext, Builder};

pub use fixtures::*;

/// Builder that records which products it built and writes a fake
/// executable for every target.
#[derive(Debug, Default)]
pub struct RecordingBuilder {
    built: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl RecordingBuilder {
    /// A builder that fails when asked to build `product`.
    pub fn failing(product: &str) -> Self {
        RecordingBuilder {
            built: Mutex::new(Vec::new()),
            fail_on: Some(product.to_string()),
        }
    }

    /// Products built so far, in build order.
    pub fn built(&self) -> Vec<String> {
        self.built.lock().unwrap().clone()
    }
}

impl Builder for RecordingBuilder {
    fn build(&self, ctx: &BuildContext<'_>) -> Result<()> {
        let id = ctx.product.id.to_string();
        if self.fail_on.as_deref() == Some(id.as_str()) {
            bail!("mock build failure");
        }

        for os_arch in &ctx.product.build.os_archs {
            let exe = ctx.product.build.executable_path(ctx.build_dir, os_arch);
            std::fs::create_dir_all(exe.parent().unwrap())?;
            std::fs::write(&exe, &id)?;
        }

        self.built.lock().unwrap().push(id);
        Ok(())
    }
}
