#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use test_env_provisioner::{PackageInstaller, PINNED_PACKAGE};

/// What the fake package manager should do when invoked.
#[derive(Debug, Clone, Copy)]
pub enum InstallBehavior {
    /// Succeed and materialize the expected executable, like a real install.
    CreateArtifact,
    /// Exit with a failure, like npm reporting a non-zero status.
    Fail,
    /// Report success but leave no executable behind.
    SucceedWithoutArtifact,
}

/// Test double for the npm subprocess: counts invocations and simulates the
/// chosen outcome without spawning anything.
pub struct FakeInstaller {
    calls: Arc<AtomicUsize>,
    behavior: InstallBehavior,
}

impl FakeInstaller {
    pub fn new(behavior: InstallBehavior) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            behavior,
        }
    }

    /// Handle for asserting on the invocation count after the installer has
    /// been boxed into a provisioner.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl PackageInstaller for FakeInstaller {
    fn install(&self, dir: &Path) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            InstallBehavior::CreateArtifact => {
                seed_artifact(dir);
                Ok(())
            }
            InstallBehavior::Fail => anyhow::bail!("npm install exited with status: exit status: 1"),
            InstallBehavior::SucceedWithoutArtifact => Ok(()),
        }
    }
}

/// Materialize the pinned package's executable the way a real install would.
pub fn seed_artifact(dir: &Path) {
    let bin_dir = dir.join("node_modules").join(".bin");
    fs::create_dir_all(&bin_dir).unwrap();
    fs::write(bin_dir.join(PINNED_PACKAGE), "#!/bin/sh\n").unwrap();
}
