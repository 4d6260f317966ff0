//! The dist environment contract.
//!
//! Every dister run, built-in or scripted, gets these variables on top of
//! the inherited environment:
//!
//! ```text
//! DIST_DIR                                          this dister's output directory
//! VERSION                                           resolved project version
//! DEP_PRODUCT_ID_COUNT                              number of direct dependencies
//! DEP_PRODUCT_ID_<i>                                i-th dependency, declared order
//! DEP_PRODUCT_ID_<i>_BUILD_DIR                      its build directory
//! DEP_PRODUCT_ID_<i>_DIST_ID_<j>                    its j-th dister ID, configured order
//! DEP_PRODUCT_ID_<i>_DIST_ID_<j>_DIST_DIR           that dister's output directory
//! DEP_PRODUCT_ID_<i>_DIST_ID_<j>_DIST_ARTIFACT_<k>  k-th artifact file name
//! ```
//!
//! Scripts outside this crate are written against these names; they must
//! not change.

use std::path::Path;

use crate::core::outputs::ProductOutputs;
use crate::core::ProductId;
use crate::util::EnvVars;

pub const DIST_DIR: &str = "DIST_DIR";
pub const VERSION: &str = "VERSION";
pub const DEP_PRODUCT_ID_COUNT: &str = "DEP_PRODUCT_ID_COUNT";

/// `DEP_PRODUCT_ID_<i>`
pub fn dep_product_id(i: usize) -> String {
    format!("DEP_PRODUCT_ID_{}", i)
}

/// `DEP_PRODUCT_ID_<i>_BUILD_DIR`
pub fn dep_build_dir(i: usize) -> String {
    format!("{}_BUILD_DIR", dep_product_id(i))
}

/// `DEP_PRODUCT_ID_<i>_DIST_ID_<j>`
pub fn dep_dist_id(i: usize, j: usize) -> String {
    format!("{}_DIST_ID_{}", dep_product_id(i), j)
}

/// `DEP_PRODUCT_ID_<i>_DIST_ID_<j>_DIST_DIR`
pub fn dep_dist_dir(i: usize, j: usize) -> String {
    format!("{}_DIST_DIR", dep_dist_id(i, j))
}

/// `DEP_PRODUCT_ID_<i>_DIST_ID_<j>_DIST_ARTIFACT_<k>`
pub fn dep_dist_artifact(i: usize, j: usize, k: usize) -> String {
    format!("{}_DIST_ARTIFACT_{}", dep_dist_id(i, j), k)
}

fn path_value(path: &Path) -> String {
    path.display().to_string()
}

/// Add `DEP_PRODUCT_ID_COUNT` and `DEP_PRODUCT_ID_<i>` for `dependencies`.
///
/// Shared with the docker contract, which enumerates dependencies the same
/// way.
pub fn insert_dependency_ids<'a, I>(env: &mut EnvVars, dependencies: I)
where
    I: IntoIterator<Item = &'a ProductId>,
{
    let mut count = 0;
    for (i, id) in dependencies.into_iter().enumerate() {
        env.insert(dep_product_id(i), id.to_string());
        count = i + 1;
    }
    env.insert(DEP_PRODUCT_ID_COUNT.to_string(), count.to_string());
}

/// Full variable set for one dister run.
///
/// `dependencies` are the completed outputs of the product's direct
/// dependencies, in declared order.
pub fn dist_env(version: &str, dist_dir: &Path, dependencies: &[&ProductOutputs]) -> EnvVars {
    let mut env = EnvVars::new();
    env.insert(DIST_DIR.to_string(), path_value(dist_dir));
    env.insert(VERSION.to_string(), version.to_string());

    insert_dependency_ids(&mut env, dependencies.iter().map(|dep| &dep.product));

    for (i, dep) in dependencies.iter().enumerate() {
        env.insert(dep_build_dir(i), path_value(&dep.build.build_dir));

        for (j, dist) in dep.dists.iter().enumerate() {
            env.insert(dep_dist_id(i, j), dist.dist_id.to_string());
            env.insert(dep_dist_dir(i, j), path_value(&dist.dist_dir));

            for (k, artifact) in dist.artifacts.iter().enumerate() {
                env.insert(dep_dist_artifact(i, j, k), artifact.clone());
            }
        }
    }

    env
}
