//! Custom script execution.
//!
//! Scripts are user-supplied shell bodies from `Quay.toml`. Before running,
//! the project-wide script includes are spliced in directly after the
//! interpreter line, so helper functions and prologue commands defined there
//! are in scope for the script body. The composed script is written to a
//! temporary executable file and run through its own `#!` interpreter.

use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::util::process::{combined_output, EnvVars, ProcessBuilder};

/// Interpreter used for scripts that carry no `#!` line.
const FALLBACK_SHELL: &str = "sh";

/// Failure while running a custom script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script could not be written or spawned.
    #[error("failed to run script: {0:#}")]
    Spawn(#[from] anyhow::Error),

    /// The script ran and exited unsuccessfully.
    #[error("script exited with {}", exit_code_display(*code))]
    Failed {
        /// Exit code (None when killed by a signal)
        code: Option<i32>,
        /// Captured stdout followed by stderr
        output: String,
    },
}

fn exit_code_display(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Output of a successful script run.
#[derive(Debug, Clone, Default)]
pub struct ScriptOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Splice `includes` into `body` right after its interpreter line.
///
/// Without an interpreter line the includes simply go first. Empty includes
/// leave the body untouched.
pub fn compose(includes: &str, body: &str) -> String {
    if includes.trim().is_empty() {
        return body.to_string();
    }

    let mut includes = includes.to_string();
    if !includes.ends_with('\n') {
        includes.push('\n');
    }

    if body.starts_with("#!") {
        let (shebang, rest) = match body.find('\n') {
            Some(idx) => body.split_at(idx + 1),
            None => (body, ""),
        };
        let mut out = shebang.to_string();
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&includes);
        out.push_str(rest);
        out
    } else {
        format!("{}{}", includes, body)
    }
}

/// Run a composed script with `cwd` as working directory and `env` overlaid
/// on the inherited environment.
pub fn run(script: &str, cwd: &Path, env: &EnvVars) -> Result<ScriptOutput, ScriptError> {
    let path = write_executable(script)?;

    let process = if script.starts_with("#!") {
        ProcessBuilder::new(&path)
    } else {
        ProcessBuilder::new(FALLBACK_SHELL).arg(path.as_os_str())
    };

    tracing::debug!(
        "running script {} in {} ({} overlay vars)",
        path.display(),
        cwd.display(),
        env.len()
    );

    let output = process.cwd(cwd).envs(env).exec()?;

    if !output.status.success() {
        return Err(ScriptError::Failed {
            code: output.status.code(),
            output: combined_output(&output),
        });
    }

    Ok(ScriptOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Write the script to a temp file and mark it executable.
///
/// The write handle is closed before returning; executing a file that is
/// still open for writing fails with ETXTBSY on Linux.
fn write_executable(script: &str) -> anyhow::Result<tempfile::TempPath> {
    use anyhow::Context;

    let mut file = tempfile::Builder::new()
        .prefix("quay-script-")
        .suffix(".sh")
        .tempfile()
        .context("failed to create temporary script file")?;
    file.write_all(script.as_bytes())
        .context("failed to write temporary script file")?;
    file.flush()?;

    let path = file.into_temp_path();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .with_context(|| format!("failed to make {} executable", path.display()))?;
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_compose_inserts_after_shebang() {
        let composed = compose("helper() { :; }", "#!/bin/sh\nhelper\n");
        assert_eq!(composed, "#!/bin/sh\nhelper() { :; }\nhelper\n");
    }

    #[test]
    fn test_compose_without_shebang() {
        assert_eq!(compose("a=1\n", "echo $a\n"), "a=1\necho $a\n");
    }

    #[test]
    fn test_compose_empty_includes_is_identity() {
        assert_eq!(compose("", "#!/bin/sh\necho hi"), "#!/bin/sh\necho hi");
        assert_eq!(compose("  \n", "echo hi"), "echo hi");
    }

    #[test]
    fn test_run_uses_cwd_and_env() {
        let tmp = TempDir::new().unwrap();
        let mut env = EnvVars::new();
        env.insert("GREETING".to_string(), "hello".to_string());

        run("#!/bin/sh\necho $GREETING > out.txt\n", tmp.path(), &env).unwrap();

        let out = std::fs::read_to_string(tmp.path().join("out.txt")).unwrap();
        assert_eq!(out, "hello\n");
    }

    #[test]
    fn test_run_without_shebang_falls_back_to_sh() {
        let tmp = TempDir::new().unwrap();
        run("touch marker\n", tmp.path(), &EnvVars::new()).unwrap();
        assert!(tmp.path().join("marker").exists());
    }

    #[test]
    fn test_run_failure_captures_output() {
        let tmp = TempDir::new().unwrap();
        let err = run(
            "#!/bin/sh\necho partial\necho broken >&2\nexit 7\n",
            tmp.path(),
            &EnvVars::new(),
        )
        .unwrap_err();

        match err {
            ScriptError::Failed { code, output } => {
                assert_eq!(code, Some(7));
                assert!(output.contains("partial"));
                assert!(output.contains("broken"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
