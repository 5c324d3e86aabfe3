//! Configuration file persistence.
//!
//! The file lives at `~/.openshift/express.conf` unless `OPENSHIFT_CONFIG`
//! names another file in the same directory or an explicit path is given.
//! Saving copies the previous file to `<file>.bak` first.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use rhc_domain::{ConfigDocument, DomainError};
use tokio::fs;

/// Directory holding the configuration under the home directory.
pub const CONFIG_DIR: &str = ".openshift";

/// Default configuration file name.
pub const DEFAULT_CONFIG_NAME: &str = "express";

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error during file operations.
    #[error("IO error on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file content is malformed.
    #[error("{path}: {source}")]
    Parse {
        /// File involved.
        path: PathBuf,
        /// What is wrong.
        #[source]
        source: DomainError,
    },

    /// Could not determine the home directory.
    #[error("Could not determine the home directory")]
    NoHomeDir,
}

/// Repository for the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRepository {
    path: PathBuf,
}

impl ConfigRepository {
    /// Uses an explicit file path.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolves the default location, honouring `OPENSHIFT_CONFIG`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHomeDir`] when the home directory is unknown.
    pub fn locate() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(Self::at(Self::resolve(
            &home,
            std::env::var_os("OPENSHIFT_CONFIG"),
        )))
    }

    fn resolve(home: &Path, name: Option<OsString>) -> PathBuf {
        let name = name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| OsString::from(DEFAULT_CONFIG_NAME));
        let mut file = name;
        file.push(".conf");
        home.join(CONFIG_DIR).join(file)
    }

    /// The configuration file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The backup written before each save.
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        PathBuf::from(name)
    }

    fn io_error(&self, source: std::io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Loads the configuration.
    ///
    /// Returns an empty document if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub async fn load(&self) -> Result<ConfigDocument, ConfigError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no configuration file");
                return Ok(ConfigDocument::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };
        ConfigDocument::parse(&content).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes the configuration, backing up the previous file.
    ///
    /// # Errors
    ///
    /// Fails when the directory, backup or file cannot be written.
    pub async fn save(&self, document: &ConfigDocument) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        if fs::try_exists(&self.path).await.unwrap_or(false) {
            let backup = self.backup_path();
            fs::copy(&self.path, &backup)
                .await
                .map_err(|e| self.io_error(e))?;
            tracing::debug!(backup = %backup.display(), "backed up configuration");
        }

        fs::write(&self.path, document.to_string())
            .await
            .map_err(|e| self.io_error(e))?;
        tracing::info!(path = %self.path.display(), "saved configuration");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_paths() {
        let home = Path::new("/home/alice");
        assert_eq!(
            ConfigRepository::resolve(home, None),
            PathBuf::from("/home/alice/.openshift/express.conf")
        );
        assert_eq!(
            ConfigRepository::resolve(home, Some(OsString::from("staging"))),
            PathBuf::from("/home/alice/.openshift/staging.conf")
        );
        assert_eq!(
            ConfigRepository::at("/tmp/x.conf").backup_path(),
            PathBuf::from("/tmp/x.conf.bak")
        );
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = ConfigRepository::at(dir.path().join("express.conf"));
        assert_eq!(repo.load().await.unwrap(), ConfigDocument::new());
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_backup() {
        let dir = tempfile::tempdir().unwrap();
        let repo = ConfigRepository::at(dir.path().join(".openshift").join("express.conf"));

        let mut doc = ConfigDocument::new();
        doc.set("libra_server", "first.example.com");
        repo.save(&doc).await.unwrap();
        assert!(!repo.backup_path().exists());

        doc.set("libra_server", "second.example.com");
        repo.save(&doc).await.unwrap();

        let backup = std::fs::read_to_string(repo.backup_path()).unwrap();
        assert_eq!(backup, "libra_server=first.example.com\n");
        let loaded = repo.load().await.unwrap();
        assert_eq!(loaded.get("libra_server"), Some("second.example.com"));
    }

    #[tokio::test]
    async fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("express.conf");
        std::fs::write(&path, "not a setting\n").unwrap();
        let error = ConfigRepository::at(&path).load().await.unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
        assert!(error.to_string().contains("express.conf"));
    }
}
