//! External tools the driver can lean on, resolved once at startup.
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::args::{BENCH_TOOL, CLOUD_CLI};

/// Which optional helper binaries were found on `PATH`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub bench_tool: Option<PathBuf>,
    pub cloud_cli: Option<PathBuf>,
}

impl Capabilities {
    #[must_use]
    pub fn detect() -> Self {
        let path = std::env::var_os("PATH");
        let capabilities = Self::detect_in(path.as_deref());
        match capabilities.bench_tool.as_deref() {
            Some(found) => debug!("Benchmark tool found at {}", found.display()),
            None => info!("'{}' not found; bench mode unavailable", BENCH_TOOL),
        }
        match capabilities.cloud_cli.as_deref() {
            Some(found) => debug!("Cloud CLI found at {}", found.display()),
            None => info!("'{}' not found; fleet monitoring disabled", CLOUD_CLI),
        }
        capabilities
    }

    /// Resolves the tools against an explicit search path.
    #[must_use]
    pub fn detect_in(path: Option<&OsStr>) -> Self {
        Self {
            bench_tool: find_executable(BENCH_TOOL, path),
            cloud_cli: find_executable(CLOUD_CLI, path),
        }
    }

    #[must_use]
    pub const fn has_bench_tool(&self) -> bool {
        self.bench_tool.is_some()
    }
}

fn find_executable(name: &str, path: Option<&OsStr>) -> Option<PathBuf> {
    let path = path?;
    std::env::split_paths(path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(candidate: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(candidate)
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(candidate: &Path) -> bool {
    candidate.is_file() || candidate.with_extension("exe").is_file()
}
