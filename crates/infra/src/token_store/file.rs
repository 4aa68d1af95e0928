//! File-backed token cache
//!
//! One file holds the latest token body. The file's modification time is
//! the acquisition clock: writing the file resets the token's age to zero.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use proxyfleet_core::TokenStore;
use proxyfleet_domain::{CachedToken, ProxyFleetError, Result};
use tracing::{debug, instrument};

use crate::errors::InfraError;

/// Token cache stored in a single file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn storage_error(err: std::io::Error) -> ProxyFleetError {
    InfraError::from(err).into()
}

#[async_trait]
impl TokenStore for FileTokenStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<CachedToken>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No cached token file");
                return Ok(None);
            }
            Err(err) => return Err(storage_error(err)),
        };

        let token = contents.trim();
        if token.is_empty() {
            debug!("Cached token file is empty");
            return Ok(None);
        }

        let modified = tokio::fs::metadata(&self.path)
            .await
            .and_then(|meta| meta.modified())
            .map_err(storage_error)?;
        // A modification time in the future counts as brand new
        let age = SystemTime::now().duration_since(modified).unwrap_or(Duration::ZERO);

        debug!(age_secs = age.as_secs(), "Read cached token");
        Ok(Some(CachedToken::new(token, age)))
    }

    #[instrument(skip(self, access_token), fields(path = %self.path.display()))]
    async fn store(&self, access_token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(storage_error)?;
        }

        tokio::fs::write(&self.path, access_token).await.map_err(storage_error)?;
        debug!("Persisted token");
        Ok(())
    }
}
