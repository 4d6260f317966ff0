//! Implementation of `quay build`.

use std::io::Write;

use crate::builder::{BuildContext, Builder};
use crate::core::outputs::{BuildOutputInfo, OutputLocator};
use crate::core::param::{ProductParam, ProjectInfo, ProjectParam};
use crate::core::ProductId;
use crate::dist::DistError;
use crate::util::fs::ensure_dir;
use crate::util::shell::{Status, StatusSink};

/// Create a product's build directory and run the builder into it.
pub(crate) fn build_product(
    info: &ProjectInfo,
    locator: &OutputLocator,
    product: &ProductParam,
    builder: &dyn Builder,
    out: &StatusSink<'_>,
) -> Result<BuildOutputInfo, DistError> {
    let build_dir = locator.build_dir(&product.id);
    ensure_dir(&build_dir).map_err(|e| DistError::Io {
        product: product.id.to_string(),
        message: format!("{:#}", e),
    })?;

    out.status(
        Status::Building,
        format!(
            "{} v{} ({})",
            product.id,
            info.version,
            product
                .build
                .os_archs
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    );

    builder
        .build(&BuildContext {
            product,
            project: info,
            build_dir: &build_dir,
        })
        .map_err(|e| DistError::BuilderFailure {
            product: product.id.to_string(),
            message: format!("{:#}", e),
        })?;

    Ok(BuildOutputInfo { build_dir })
}

/// Build `ids` (empty = all) and their dependencies, in dependency order.
pub fn build_products(
    info: &ProjectInfo,
    param: &ProjectParam,
    ids: &[ProductId],
    builder: &dyn Builder,
    out: &mut (dyn Write + Send),
) -> Result<Vec<(ProductId, BuildOutputInfo)>, DistError> {
    let order = param.ordered_products(ids)?;
    let locator = param.locator(&info.version);
    let sink = StatusSink::new(out);

    let mut built = Vec::with_capacity(order.len());
    for product in order {
        let output = build_product(info, &locator, product, builder, &sink)?;
        built.push((product.id.clone(), output));
    }

    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures::ProjectFixture;
    use crate::test_support::RecordingBuilder;

    #[test]
    fn test_builds_in_dependency_order() {
        let project = ProjectFixture::new(
            r#"
[products.app]
dependencies = ["lib"]

[products.lib]

[products.tool]
"#,
        )
        .write();
        let (info, param) = project.load("1.0.0");

        let builder = RecordingBuilder::default();
        let mut out = Vec::new();
        let built = build_products(&info, &param, &[ProductId::from("app")], &builder, &mut out)
            .unwrap();

        assert_eq!(builder.built(), vec!["lib", "app"]);
        assert_eq!(built.len(), 2);
        assert_eq!(
            built[0].1.build_dir,
            param.build_root.join("lib").join("1.0.0")
        );
        assert!(built[0].1.build_dir.is_dir());

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Building lib v1.0.0"));
    }

    #[test]
    fn test_builder_failure_names_product() {
        let project = ProjectFixture::new("[products.foo]\n").write();
        let (info, param) = project.load("1.0.0");

        let builder = RecordingBuilder::failing("foo");
        let err = build_products(&info, &param, &[], &builder, &mut Vec::new()).unwrap_err();

        assert!(matches!(err, DistError::BuilderFailure { ref product, .. } if product == "foo"));
    }
}
