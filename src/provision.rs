use colored::Colorize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ProvisionError, Result};
use crate::manifest::{Manifest, ManifestState};
use crate::npm::{NpmInstaller, PackageInstaller};

/// The one dependency this environment exists to hold.
pub const PINNED_PACKAGE: &str = "wrangler";

/// Exact version literal the environment must contain. Changing it forces the
/// manifest and installed tree to be recreated on the next run.
pub const PINNED_VERSION: &str = "1.8.5";

/// Default target directory, relative to the working directory.
pub const DEFAULT_ENV_DIR: &str = ".test-env";

/// Why the environment needs a (re)install.
#[derive(Debug, Clone, PartialEq)]
pub enum InstallReason {
    ManifestMissing,
    ManifestUnreadable,
    VersionMismatch { declared: String },
    ArtifactMissing,
}

/// What `ensure_ready` decided after inspecting the directory: skip entirely,
/// or write the manifest and install.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    AlreadyReady,
    Install(InstallReason),
}

impl fmt::Display for InstallReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManifestMissing => write!(f, "no manifest present"),
            Self::ManifestUnreadable => write!(f, "manifest is corrupt or unreadable"),
            Self::VersionMismatch { declared } => {
                write!(f, "manifest declares {declared}, pinned to {PINNED_VERSION}")
            }
            Self::ArtifactMissing => {
                write!(f, "manifest matches but the installed executable is missing")
            }
        }
    }
}

/// Pure decision function mapping observed directory state to an action.
///
/// The two-layer check (declared version, then artifact presence) keeps the
/// common path install-free while self-healing from a manifest that lies
/// about the true state of the directory, e.g. a prior run killed
/// mid-install.
pub fn decide(state: &ManifestState, artifact_present: bool) -> Decision {
    match state {
        ManifestState::Missing => Decision::Install(InstallReason::ManifestMissing),
        ManifestState::Unreadable => Decision::Install(InstallReason::ManifestUnreadable),
        ManifestState::Present(manifest) => match manifest.declared_version(PINNED_PACKAGE) {
            Some(declared) if declared == PINNED_VERSION => {
                if artifact_present {
                    Decision::AlreadyReady
                } else {
                    Decision::Install(InstallReason::ArtifactMissing)
                }
            }
            Some(declared) => Decision::Install(InstallReason::VersionMismatch {
                declared: declared.to_string(),
            }),
            None => Decision::Install(InstallReason::VersionMismatch {
                declared: "nothing".to_string(),
            }),
        },
    }
}

/// Owns the full lifecycle of one pinned test environment: directory
/// creation, manifest inspection, conditional install, and post-install
/// verification.
pub struct EnvironmentProvisioner {
    dir: PathBuf,
    installer: Box<dyn PackageInstaller>,
}

impl EnvironmentProvisioner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            installer: Box::new(NpmInstaller::new()),
        }
    }

    /// Swap the npm subprocess for a test double.
    pub fn with_installer(mut self, installer: Box<dyn PackageInstaller>) -> Self {
        self.installer = installer;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the pinned package's executable lands after a successful
    /// install.
    pub fn expected_bin_path(&self) -> PathBuf {
        self.dir
            .join("node_modules")
            .join(".bin")
            .join(PINNED_PACKAGE)
    }

    fn installed_artifact(&self) -> Option<PathBuf> {
        let plain = self.expected_bin_path();
        if plain.exists() {
            return Some(plain);
        }
        if cfg!(target_os = "windows") {
            let cmd = plain.with_extension("cmd");
            if cmd.exists() {
                return Some(cmd);
            }
        }
        None
    }

    /// Make the environment ready, installing only if the directory's actual
    /// state requires it. Idempotent: a directory that is already correctly
    /// provisioned is left untouched.
    ///
    /// Returns the resolved path of the pinned package's executable.
    pub fn ensure_ready(&self) -> Result<PathBuf> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .map_err(|err| ProvisionError::directory(&self.dir, err))?;
            tracing::debug!(dir = %self.dir.display(), "Created target directory");
        }

        let state = Manifest::load(&self.dir);
        let decision = decide(&state, self.installed_artifact().is_some());

        if let Decision::Install(reason) = &decision {
            tracing::info!(package = PINNED_PACKAGE, version = PINNED_VERSION, %reason, "Installing");
            println!(
                "{} Installing {} ({reason})...",
                "→".green(),
                format!("{PINNED_PACKAGE}@{PINNED_VERSION}").cyan()
            );

            Manifest::pinned(PINNED_PACKAGE, PINNED_VERSION).write(&self.dir)?;

            // Manifest stays as written on failure; the next run's inspection
            // step picks up from whatever state npm left behind.
            self.installer.install(&self.dir).map_err(|err| {
                ProvisionError::install(PINNED_PACKAGE, PINNED_VERSION, format!("{err:#}"))
            })?;
        } else {
            tracing::debug!(package = PINNED_PACKAGE, version = PINNED_VERSION, "Already provisioned");
        }

        // Verify on both paths: the skip decision trusted the manifest, and
        // npm's zero exit status is not proof the executable materialized.
        self.installed_artifact()
            .ok_or_else(|| ProvisionError::verification(PINNED_PACKAGE, self.expected_bin_path()))
    }
}
