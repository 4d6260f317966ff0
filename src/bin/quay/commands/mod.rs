//! Command implementations

pub mod build;
pub mod completions;
pub mod dist;
pub mod docker;
pub mod products;
pub mod project_version;

use std::io::{self, Write};

use anyhow::Result;

use quay::core::version::{FixedVersion, GitVersionResolver, VersionResolver};
use quay::core::{ConfigError, ProductId};
use quay::dist::DistError;
use quay::resolver::ResolveError;
use quay::util::context::ProjectFileError;
use quay::util::diagnostic::{self, suggestions, Diagnostic};
use quay::util::shell::{Shell, Verbosity};
use quay::util::{Config, GlobalContext};
use quay::{Project, ProjectInfo, ProjectParam};

use crate::cli::GlobalArgs;

pub fn verbosity(global: &GlobalArgs) -> Verbosity {
    if global.verbose {
        Verbosity::Verbose
    } else if global.quiet {
        Verbosity::Quiet
    } else {
        Verbosity::Normal
    }
}

/// A located project plus the settings and shell a command runs with.
pub struct Session {
    pub shell: Shell,
    pub project: Project,
    pub settings: Config,
    version_override: Option<String>,
}

impl Session {
    pub fn load(global: &GlobalArgs, json: bool) -> Result<Self> {
        let ctx = match &global.project_dir {
            Some(dir) => GlobalContext::for_dir(dir)?,
            None => GlobalContext::new()?,
        };

        let project_file = ctx.find_project_file()?;
        let project = Project::load(&project_file)?;
        let settings = ctx.load_config(project.root());

        let color = global.color.or(settings.term.color).unwrap_or_default();
        let shell = Shell::from_flags(verbosity(global), color, json);

        Ok(Session {
            shell,
            project,
            settings,
            version_override: global.version_override.clone(),
        })
    }

    pub fn param(&self) -> Result<ProjectParam> {
        Ok(self.project.param()?)
    }

    pub fn info(&self) -> Result<ProjectInfo> {
        let resolver: Box<dyn VersionResolver> = match &self.version_override {
            Some(version) => Box::new(FixedVersion(version.clone())),
            None => Box::new(GitVersionResolver),
        };
        self.project.info(resolver.as_ref())
    }

    /// Sink for the status lines of an operation.
    pub fn status_out(&self) -> Box<dyn Write + Send> {
        if self.shell.wants_status() {
            Box::new(io::stderr())
        } else {
            Box::new(io::sink())
        }
    }
}

pub fn product_ids(names: &[String]) -> Vec<ProductId> {
    names.iter().map(|name| ProductId::new(name.as_str())).collect()
}

/// Print `err` with the context and suggestions of the first typed error in
/// its chain.
pub fn report_error(err: &anyhow::Error, color: bool) {
    let mut diag = Diagnostic::error(format!("{:#}", err));

    if let Some(typed) = err.chain().find_map(typed_diagnostic) {
        diag.context = typed.context;
        diag.suggestions = typed.suggestions;
        diag.location = typed.location;
    }

    diagnostic::emit(&diag, color);
}

fn typed_diagnostic(cause: &(dyn std::error::Error + 'static)) -> Option<Diagnostic> {
    if let Some(e) = cause.downcast_ref::<DistError>() {
        return Some(e.to_diagnostic());
    }
    if let Some(e) = cause.downcast_ref::<ConfigError>() {
        return Some(e.to_diagnostic());
    }
    if let Some(e) = cause.downcast_ref::<ResolveError>() {
        return Some(e.to_diagnostic());
    }
    if let Some(e) = cause.downcast_ref::<ProjectFileError>() {
        return Some(Diagnostic::error(e.to_string()).with_suggestion(suggestions::NO_PROJECT));
    }
    None
}
