use colored::Colorize;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ProvisionError {
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
    Install {
        package: String,
        version: String,
        detail: String,
    },
    Verification {
        package: String,
        expected: PathBuf,
    },
    IoError {
        operation: String,
        path: Option<PathBuf>,
        source: std::io::Error,
    },
    Other(anyhow::Error),
}

impl ProvisionError {
    pub fn directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Directory {
            path: path.into(),
            source,
        }
    }

    pub fn install(
        package: impl Into<String>,
        version: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::Install {
            package: package.into(),
            version: version.into(),
            detail: detail.into(),
        }
    }

    pub fn verification(package: impl Into<String>, expected: impl Into<PathBuf>) -> Self {
        Self::Verification {
            package: package.into(),
            expected: expected.into(),
        }
    }

    pub fn io_error(
        operation: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::IoError {
            operation: operation.into(),
            path,
            source,
        }
    }
}

impl fmt::Display for ProvisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory { path, source } => {
                writeln!(f, "{} Failed to create target directory", "✗".red().bold())?;
                writeln!(
                    f,
                    "  {} Path: {}",
                    "→".blue(),
                    path.display().to_string().yellow()
                )?;
                write!(f, "  {} Error: {}", "→".blue(), source)
            }
            Self::Install {
                package,
                version,
                detail,
            } => {
                writeln!(
                    f,
                    "{} Install failed for: {}",
                    "✗".red().bold(),
                    format!("{package}@{version}").yellow()
                )?;
                write!(f, "  {} {}", "→".blue(), detail)
            }
            Self::Verification { package, expected } => {
                writeln!(
                    f,
                    "{} Verification failed: {} executable not found",
                    "✗".red().bold(),
                    package.yellow()
                )?;
                writeln!(
                    f,
                    "  {} Expected at: {}",
                    "→".blue(),
                    expected.display().to_string().yellow()
                )?;
                write!(
                    f,
                    "  {} The environment manifest claims this package is configured, \
                     but its artifact is missing",
                    "→".blue()
                )
            }
            Self::IoError {
                operation,
                path,
                source,
            } => {
                writeln!(
                    f,
                    "{} I/O error during: {}",
                    "✗".red().bold(),
                    operation.yellow()
                )?;
                if let Some(path) = path {
                    writeln!(f, "  {} Path: {}", "→".blue(), path.display())?;
                }
                write!(f, "  {} Error: {}", "→".blue(), source)
            }
            Self::Other(err) => write!(f, "{} {}", "✗".red().bold(), err),
        }
    }
}

impl std::error::Error for ProvisionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Directory { source, .. } => Some(source),
            Self::IoError { source, .. } => Some(source),
            Self::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProvisionError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            operation: "unknown".to_string(),
            path: None,
            source: err,
        }
    }
}

impl From<anyhow::Error> for ProvisionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err)
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_directory_error_display() {
        let err = ProvisionError::directory(
            "/no/such/dir",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("Failed to create target directory"));
        assert!(msg.contains("/no/such/dir"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_install_error_display() {
        let err = ProvisionError::install("wrangler", "1.8.5", "npm exited with status 1");
        let msg = err.to_string();
        assert!(msg.contains("Install failed"));
        assert!(msg.contains("wrangler@1.8.5"));
        assert!(msg.contains("npm exited with status 1"));
    }

    #[test]
    fn test_verification_error_display_is_distinct_from_install() {
        let err = ProvisionError::verification("wrangler", "/env/node_modules/.bin/wrangler");
        let msg = err.to_string();
        assert!(msg.contains("Verification failed"));
        assert!(msg.contains("node_modules/.bin/wrangler"));
        assert!(!msg.contains("Install failed"));
    }

    #[test]
    fn test_io_error_display_includes_path() {
        let err = ProvisionError::io_error(
            "write manifest",
            Some(PathBuf::from("/env/package.json")),
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );
        let msg = err.to_string();
        assert!(msg.contains("write manifest"));
        assert!(msg.contains("/env/package.json"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_error_sources() {
        let io = ProvisionError::from(std::io::Error::new(std::io::ErrorKind::Other, "oops"));
        assert!(io.source().is_some());

        let other = ProvisionError::from(anyhow::anyhow!("wrapped"));
        assert!(other.source().is_some());

        let verification = ProvisionError::verification("wrangler", "/x");
        assert!(verification.source().is_none());
    }
}
