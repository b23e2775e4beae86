//! Aggregation of all accounts with stake and the index they go to.

use serde::{Deserialize, Serialize};
use stakeidx_core::{
    AccountsMap, Denomination, MergedAccounts, StakeSource, calculate_total_stake_for_accounts,
    merge_accounts, overlapping_addresses,
};

use crate::accounts::AccountsGetter;
use crate::error::ChainError;
use crate::rest::{ApiCredentials, RestClient};
use crate::status::{PATH_NODE_STATUS_META, extract_epoch};

/// Everything an indexer needs to write one epoch's accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexPayload {
    pub index: String,
    pub addresses: Vec<String>,
    pub accounts: AccountsMap,
}

impl IndexPayload {
    pub fn new(index: String, merged: MergedAccounts) -> Self {
        Self {
            index,
            addresses: merged.addresses,
            accounts: merged.accounts,
        }
    }
}

/// Queries the metachain status and names the index `<base>_<epoch>`.
///
/// A missing epoch yields `<base>_`; an error in the response is fatal.
pub async fn resolve_index_name<R: RestClient + ?Sized>(
    rest_client: &R,
    base_index_name: &str,
) -> Result<String, ChainError> {
    tracing::info!("Compute name of the new index...");

    let response = rest_client
        .call_get_rest_endpoint(PATH_NODE_STATUS_META, &ApiCredentials::empty())
        .await?;
    if !response.error.is_empty() {
        return Err(ChainError::Api(format!(
            "cannot compute accounts index {}",
            response.error
        )));
    }

    let epoch = extract_epoch(&response.data);
    Ok(format!("{}_{}", base_index_name, epoch))
}

/// Combines the stake sources and resolves the destination index.
pub struct AccountsProcessor<R, G> {
    rest_client: R,
    accounts_getter: G,
    base_index_name: String,
    denomination: Denomination,
}

impl<R: RestClient, G: AccountsGetter> AccountsProcessor<R, G> {
    pub fn new(rest_client: R, accounts_getter: G, base_index_name: impl Into<String>) -> Self {
        Self {
            rest_client,
            accounts_getter,
            base_index_name: base_index_name.into(),
            denomination: Denomination::RAW,
        }
    }

    /// Scale the approximate totals by `denomination`.
    pub fn with_denomination(mut self, denomination: Denomination) -> Self {
        self.denomination = denomination;
        self
    }

    pub fn base_index_name(&self) -> &str {
        &self.base_index_name
    }

    async fn fetch(&self, source: StakeSource) -> Result<AccountsMap, ChainError> {
        let accounts = self.accounts_getter.get_accounts(source).await?;
        tracing::info!("Fetched {} {}", accounts.len(), source);
        Ok(accounts)
    }

    /// Fetches the four sources, merges them and computes every total.
    pub async fn get_all_accounts_with_stake(&self) -> Result<MergedAccounts, ChainError> {
        let legacy = self.fetch(StakeSource::Legacy).await?;
        let validators = self.fetch(StakeSource::Validators).await?;
        let delegators = self.fetch(StakeSource::Delegators).await?;
        let lk_mex = self.fetch(StakeSource::LkMex).await?;

        let overlap = overlapping_addresses([&legacy, &validators, &delegators, &lk_mex]).len();

        let mut merged = merge_accounts(legacy, validators, delegators, lk_mex);
        calculate_total_stake_for_accounts(&mut merged.accounts, self.denomination);

        tracing::info!(
            "Merged {} accounts with stake ({} in more than one source)",
            merged.len(),
            overlap
        );
        Ok(merged)
    }

    /// Name of the index for the current epoch: `<base>_<epoch>`.
    pub async fn compute_accounts_index(&self) -> Result<String, ChainError> {
        resolve_index_name(&self.rest_client, &self.base_index_name).await
    }

    /// Resolves the index, then aggregates the accounts for it.
    pub async fn prepare_index(&self) -> Result<IndexPayload, ChainError> {
        let index = self.compute_accounts_index().await?;
        tracing::info!("Accounts go to index {}", index);
        let merged = self.get_all_accounts_with_stake().await?;
        Ok(IndexPayload::new(index, merged))
    }
}
