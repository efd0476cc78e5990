use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use which::which;

/// Seam between the provisioner's decision logic and the external package
/// manager, so tests can drive the full flow without spawning npm.
pub trait PackageInstaller: Send + Sync {
    /// Install the dependencies declared by the manifest inside `dir`,
    /// blocking until the package manager exits. An `Err` means the install
    /// cannot be trusted; the caller treats it as fatal.
    fn install(&self, dir: &Path) -> Result<()>;
}

/// Invokes `npm install` as a blocking subprocess scoped to the target
/// directory. Output passes through to the terminal; only the exit status is
/// consumed.
#[derive(Debug, Default)]
pub struct NpmInstaller;

impl NpmInstaller {
    pub fn new() -> Self {
        Self
    }

    fn find_npm() -> Result<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            if let Ok(path) = which("npm.cmd") {
                return Ok(path);
            }
        }

        which("npm").context("npm not found on PATH")
    }
}

impl PackageInstaller for NpmInstaller {
    fn install(&self, dir: &Path) -> Result<()> {
        let npm = Self::find_npm()?;
        tracing::debug!(npm = %npm.display(), dir = %dir.display(), "Running npm install");

        let status = Command::new(&npm)
            .args(["install", "--silent", "--no-audit", "--no-fund"])
            .current_dir(dir)
            .status()
            .with_context(|| format!("Failed to execute {}", npm.display()))?;

        if !status.success() {
            anyhow::bail!("npm install exited with status: {status}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopInstaller;

    impl PackageInstaller for NoopInstaller {
        fn install(&self, _dir: &Path) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_installer_is_object_safe() {
        let installer: Box<dyn PackageInstaller> = Box::new(NoopInstaller);
        assert!(installer.install(Path::new(".")).is_ok());
    }

    #[test]
    fn test_find_npm_reports_missing_binary() {
        // Whichever way this resolves on the host, it must not panic.
        let _ = NpmInstaller::find_npm();
    }
}
