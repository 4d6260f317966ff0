//! Operating system / architecture pairs.
//!
//! Names follow the Go toolchain convention (`darwin`, `amd64`, ...) since
//! archive names such as `foo-1.0.0-linux-amd64.tgz` are consumed by tooling
//! that expects it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A target platform for a product's executable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OsArch {
    pub os: String,
    pub arch: String,
}

impl OsArch {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        OsArch {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform this process is running on.
    pub fn current() -> Self {
        OsArch::new(
            go_os(std::env::consts::OS),
            go_arch(std::env::consts::ARCH),
        )
    }

    /// File name of an executable called `name` on this platform.
    pub fn executable_name(&self, name: &str) -> String {
        if self.os == "windows" {
            format!("{}.exe", name)
        } else {
            name.to_string()
        }
    }
}

impl fmt::Display for OsArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

impl FromStr for OsArch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((os, arch)) if !os.is_empty() && !arch.is_empty() && !arch.contains('-') => {
                Ok(OsArch::new(os, arch))
            }
            _ => Err(format!("invalid os-arch '{}'; expected '<os>-<arch>'", s)),
        }
    }
}

fn go_os(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

fn go_arch(arch: &str) -> &str {
    match arch {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let os_arch: OsArch = "linux-amd64".parse().unwrap();
        assert_eq!(os_arch, OsArch::new("linux", "amd64"));
        assert_eq!(os_arch.to_string(), "linux-amd64");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("linux".parse::<OsArch>().is_err());
        assert!("-amd64".parse::<OsArch>().is_err());
        assert!("linux-amd64-extra".parse::<OsArch>().is_err());
    }

    #[test]
    fn test_go_naming() {
        assert_eq!(go_os("macos"), "darwin");
        assert_eq!(go_arch("x86_64"), "amd64");
        assert_eq!(go_arch("aarch64"), "arm64");
        assert_eq!(go_arch("riscv64"), "riscv64");
    }

    #[test]
    fn test_executable_name() {
        assert_eq!(OsArch::new("windows", "amd64").executable_name("foo"), "foo.exe");
        assert_eq!(OsArch::new("linux", "arm64").executable_name("foo"), "foo");
    }
}
