//! Providers of address-keyed stake records.

use async_trait::async_trait;
use stakeidx_core::{AccountsMap, StakeSource};

use crate::error::ChainError;

/// Fetches the accounts with stake for each of the four sources.
///
/// Any error aborts the whole aggregation.
#[async_trait]
pub trait AccountsGetter: Send + Sync {
    async fn get_legacy_delegators_accounts(&self) -> Result<AccountsMap, ChainError>;

    async fn get_validators_accounts(&self) -> Result<AccountsMap, ChainError>;

    async fn get_delegators_accounts(&self) -> Result<AccountsMap, ChainError>;

    async fn get_lkmex_stake_accounts(&self) -> Result<AccountsMap, ChainError>;

    /// Dispatches to the getter for `source`.
    async fn get_accounts(&self, source: StakeSource) -> Result<AccountsMap, ChainError> {
        match source {
            StakeSource::Legacy => self.get_legacy_delegators_accounts().await,
            StakeSource::Validators => self.get_validators_accounts().await,
            StakeSource::Delegators => self.get_delegators_accounts().await,
            StakeSource::LkMex => self.get_lkmex_stake_accounts().await,
        }
    }
}
