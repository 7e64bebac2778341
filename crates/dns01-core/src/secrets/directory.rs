// # Directory Secret Store
//
// File-based implementation of SecretStore.
//
// ## Layout
//
// Each secret is a directory and each key a file inside it:
//
// ```text
// {root}/
//   {scope}/
//     {name}/
//       {key}      <- raw value
// ```
//
// This is what mounting Kubernetes secrets as volumes produces, including
// the `..data` symlink farm; entries starting with `.` are skipped.
//
// ## Consistency
//
// Nothing is cached. Every lookup reads the files again, so rotated secrets
// are picked up by the next challenge.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::Error;
use crate::traits::secret_store::{SecretData, SecretStore};

/// Directory-backed secret store
#[derive(Debug, Clone)]
pub struct DirectorySecretStore {
    root: PathBuf,
}

impl DirectorySecretStore {
    /// Open a directory secret store rooted at `root`
    ///
    /// Fails with `Error::ClientConstruction` if `root` is not an existing
    /// directory.
    pub async fn new<P: AsRef<Path>>(root: P) -> Result<Self, Error> {
        let root = root.as_ref().to_path_buf();

        let metadata = fs::metadata(&root).await.map_err(|e| {
            Error::client_construction(format!(
                "Secret directory {} is not accessible: {}",
                root.display(),
                e
            ))
        })?;

        if !metadata.is_dir() {
            return Err(Error::client_construction(format!(
                "Secret path {} is not a directory",
                root.display()
            )));
        }

        tracing::debug!("Using secret directory: {}", root.display());
        Ok(Self { root })
    }

    /// Root directory of this store
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn secret_dir(&self, scope: &str, name: &str) -> Result<Option<PathBuf>, Error> {
        if name.is_empty() {
            return Ok(None);
        }

        for component in [scope, name] {
            if component == "."
                || component == ".."
                || component.contains('/')
                || component.contains('\\')
            {
                return Err(Error::secret_store(format!(
                    "Invalid secret reference \"{}/{}\"",
                    scope, name
                )));
            }
        }

        Ok(Some(self.root.join(scope).join(name)))
    }
}

#[async_trait]
impl SecretStore for DirectorySecretStore {
    async fn get_secret(&self, scope: &str, name: &str) -> Result<SecretData, Error> {
        let not_found = || Error::SecretNotFound {
            scope: scope.to_string(),
            name: name.to_string(),
        };

        let Some(dir) = self.secret_dir(scope, name)? else {
            return Err(not_found());
        };

        match fs::metadata(&dir).await {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => return Err(not_found()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => {
                return Err(Error::secret_store(format!(
                    "Failed to stat secret directory {}: {}",
                    dir.display(),
                    e
                )));
            }
        }

        let mut entries = fs::read_dir(&dir).await.map_err(|e| {
            Error::secret_store(format!(
                "Failed to list secret directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let mut data = SecretData::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            Error::secret_store(format!(
                "Failed to list secret directory {}: {}",
                dir.display(),
                e
            ))
        })? {
            let key = entry.file_name().to_string_lossy().into_owned();
            if key.starts_with('.') {
                continue;
            }

            // Follows symlinks, which is how mounted secrets point into `..data`
            let path = entry.path();
            let is_file = fs::metadata(&path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }

            let value = fs::read(&path).await.map_err(|e| {
                Error::secret_store(format!("Failed to read {}: {}", path.display(), e))
            })?;
            data.insert(key, value);
        }

        tracing::trace!("Loaded secret {}/{} ({} keys)", scope, name, data.len());
        Ok(data)
    }

    fn store_name(&self) -> &'static str {
        "directory"
    }
}
