//! The docker environment contract.
//!
//! ```text
//! CONTEXT_DIR                             build context directory
//! VERSION                                 resolved project version
//! DEP_PRODUCT_ID_COUNT                    number of direct dependencies
//! DEP_PRODUCT_ID_<i>                      i-th dependency, declared order
//! DEP_PRODUCT_ID_<i>_DOCKER_ID_<j>        its j-th docker builder ID
//! DEP_PRODUCT_ID_<i>_DOCKER_ID_<j>_TAG_<k> k-th tag of that image
//! ```

use std::path::Path;

use crate::core::outputs::ProductImages;
use crate::dist::env::{dep_product_id, insert_dependency_ids, VERSION};
use crate::util::EnvVars;

pub const CONTEXT_DIR: &str = "CONTEXT_DIR";

/// `DEP_PRODUCT_ID_<i>_DOCKER_ID_<j>`
pub fn dep_docker_id(i: usize, j: usize) -> String {
    format!("{}_DOCKER_ID_{}", dep_product_id(i), j)
}

/// `DEP_PRODUCT_ID_<i>_DOCKER_ID_<j>_TAG_<k>`
pub fn dep_docker_tag(i: usize, j: usize, k: usize) -> String {
    format!("{}_TAG_{}", dep_docker_id(i, j), k)
}

/// Full variable set for one docker builder run.
pub fn docker_env(version: &str, context_dir: &Path, dependencies: &[&ProductImages]) -> EnvVars {
    let mut env = EnvVars::new();
    env.insert(CONTEXT_DIR.to_string(), context_dir.display().to_string());
    env.insert(VERSION.to_string(), version.to_string());

    insert_dependency_ids(&mut env, dependencies.iter().map(|dep| &dep.product));

    for (i, dep) in dependencies.iter().enumerate() {
        for (j, image) in dep.images.iter().enumerate() {
            env.insert(dep_docker_id(i, j), image.docker_id.to_string());
            for (k, tag) in image.tags.iter().enumerate() {
                env.insert(dep_docker_tag(i, j, k), tag.clone());
            }
        }
    }

    env
}
