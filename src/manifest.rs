use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{ProvisionError, Result};

/// File name of the persisted environment descriptor inside the target
/// directory. This doubles as the install manifest npm consumes.
pub const MANIFEST_FILENAME: &str = "package.json";

/// The persisted descriptor recording which dependency version was configured
/// for a target directory.
///
/// Every field other than `dependencies` is fixed boilerplate; the declared
/// entry in `dependencies` is the source of truth for "already configured".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

/// Outcome of attempting to read the manifest from disk.
///
/// `Unreadable` covers both I/O failures and JSON that fails to parse; either
/// way the manifest cannot be trusted and the environment needs a (re)install.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestState {
    Missing,
    Unreadable,
    Present(Manifest),
}

impl Manifest {
    /// Build the fixed descriptor declaring exactly one pinned dependency.
    pub fn pinned(package: &str, version: &str) -> Self {
        let mut dependencies = BTreeMap::new();
        dependencies.insert(package.to_string(), version.to_string());
        Self {
            name: "pinned-test-env".to_string(),
            version: "0.0.0".to_string(),
            private: true,
            dependencies,
        }
    }

    /// The version this manifest declares for `package`, if any.
    pub fn declared_version(&self, package: &str) -> Option<&str> {
        self.dependencies.get(package).map(String::as_str)
    }

    /// Read and parse the manifest inside `dir`.
    ///
    /// Never fails: a missing file maps to `Missing`, everything else that
    /// goes wrong maps to `Unreadable` so the caller can self-heal by
    /// rewriting the manifest.
    pub fn load(dir: &Path) -> ManifestState {
        let path = dir.join(MANIFEST_FILENAME);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return ManifestState::Missing
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Manifest unreadable");
                return ManifestState::Unreadable;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(manifest) => ManifestState::Present(manifest),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Manifest failed to parse");
                ManifestState::Unreadable
            }
        }
    }

    /// Write (or overwrite) the manifest inside `dir`.
    pub fn write(&self, dir: &Path) -> Result<()> {
        let path = dir.join(MANIFEST_FILENAME);
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            ProvisionError::Other(anyhow::anyhow!("Failed to serialize manifest: {err}"))
        })?;
        fs::write(&path, json + "\n")
            .map_err(|err| ProvisionError::io_error("write manifest", Some(path), err))
    }
}
