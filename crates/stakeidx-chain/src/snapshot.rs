//! Stake sources read from JSON snapshot files.
//!
//! A snapshot directory holds one file per source, each a JSON object
//! mapping address to a (partial) stake record. A missing file means the
//! source has no accounts.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use stakeidx_core::{AccountsMap, StakeSource};

use crate::accounts::AccountsGetter;
use crate::error::ChainError;

/// [`AccountsGetter`] backed by a snapshot directory.
#[derive(Debug, Clone)]
pub struct SnapshotAccountsGetter {
    dir: PathBuf,
}

impl SnapshotAccountsGetter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name used for a source.
    pub fn file_name(source: StakeSource) -> &'static str {
        match source {
            StakeSource::Legacy => "legacy.json",
            StakeSource::Validators => "validators.json",
            StakeSource::Delegators => "delegators.json",
            StakeSource::LkMex => "lkmex.json",
        }
    }

    async fn load(&self, source: StakeSource) -> Result<AccountsMap, ChainError> {
        let path = self.dir.join(Self::file_name(source));

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("No snapshot for {} at {}", source, path.display());
                return Ok(AccountsMap::new());
            }
            Err(e) => {
                return Err(ChainError::Provider {
                    source_name: source.label().to_string(),
                    message: format!("cannot read {}: {}", path.display(), e),
                });
            }
        };

        let accounts: AccountsMap =
            serde_json::from_str(&content).map_err(|e| ChainError::Provider {
                source_name: source.label().to_string(),
                message: format!("invalid snapshot {}: {}", path.display(), e),
            })?;

        tracing::debug!("Loaded {} {} from {}", accounts.len(), source, path.display());
        Ok(accounts)
    }
}

#[async_trait]
impl AccountsGetter for SnapshotAccountsGetter {
    async fn get_legacy_delegators_accounts(&self) -> Result<AccountsMap, ChainError> {
        self.load(StakeSource::Legacy).await
    }

    async fn get_validators_accounts(&self) -> Result<AccountsMap, ChainError> {
        self.load(StakeSource::Validators).await
    }

    async fn get_delegators_accounts(&self) -> Result<AccountsMap, ChainError> {
        self.load(StakeSource::Delegators).await
    }

    async fn get_lkmex_stake_accounts(&self) -> Result<AccountsMap, ChainError> {
        self.load(StakeSource::LkMex).await
    }
}
