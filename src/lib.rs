//! Idempotent provisioner for an isolated, version-pinned npm test
//! environment.
//!
//! Given a target directory, [`EnvironmentProvisioner::ensure_ready`] makes
//! sure exactly one pinned dependency version is installed and its executable
//! is reachable under `node_modules/.bin`, without redoing work that is
//! already correctly in place.
//!
//! Known constraint: concurrent invocations against the same target directory
//! are not coordinated (no lock file) and may race on the manifest and on
//! npm's own directory. The provisioner assumes a single consumer per
//! directory.

pub mod error;
pub mod logging;
pub mod manifest;
pub mod npm;
pub mod provision;

pub use error::{ProvisionError, Result};
pub use manifest::{Manifest, ManifestState, MANIFEST_FILENAME};
pub use npm::{NpmInstaller, PackageInstaller};
pub use provision::{
    decide, Decision, EnvironmentProvisioner, InstallReason, DEFAULT_ENV_DIR, PINNED_PACKAGE,
    PINNED_VERSION,
};
