//! Merging of the four address-keyed stake sources.
//!
//! Sources are folded in [`StakeSource::MERGE_ORDER`]. The first source to
//! mention an address creates its record; every later source only
//! overwrites the fields it owns. The merged map owns each record outright.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Serialize};

use crate::types::{AccountStakeRecord, AccountsMap, StakeSource};

/// One record per address plus the order in which addresses were first seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedAccounts {
    pub accounts: AccountsMap,
    pub addresses: Vec<String>,
}

impl MergedAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn get(&self, address: &str) -> Option<&AccountStakeRecord> {
        self.accounts.get(address)
    }

    /// Records in first-seen order.
    pub fn iter_ordered(&self) -> impl Iterator<Item = &AccountStakeRecord> {
        self.addresses
            .iter()
            .filter_map(|address| self.accounts.get(address))
    }

    /// Folds one source into the map.
    ///
    /// New addresses are inserted as-is and appended to the address list;
    /// known addresses only receive the fields owned by `source`.
    pub fn fold_source<I>(&mut self, source: StakeSource, records: I) -> usize
    where
        I: IntoIterator<Item = (String, AccountStakeRecord)>,
    {
        let mut inserted = 0;
        let mut updated = 0;

        for (address, mut record) in records {
            match self.accounts.entry(address) {
                Entry::Occupied(mut existing) => {
                    existing.get_mut().absorb(source, &record);
                    updated += 1;
                }
                Entry::Vacant(slot) => {
                    let address = slot.key().clone();
                    record.address.clone_from(&address);
                    slot.insert(record);
                    self.addresses.push(address);
                    inserted += 1;
                }
            }
        }

        tracing::debug!("Merged {}: {} new, {} updated", source, inserted, updated);
        inserted
    }
}

/// Merges the four stake sources into one record per address.
///
/// Each argument may be any address/record collection. A `HashMap` keeps its
/// unspecified iteration order; pass an ordered collection (a `Vec` of pairs,
/// a `BTreeMap`, ...) for a deterministic address list within a source.
pub fn merge_accounts<L, V, D, K>(
    legacy: L,
    validators: V,
    delegators: D,
    lk_mex: K,
) -> MergedAccounts
where
    L: IntoIterator<Item = (String, AccountStakeRecord)>,
    V: IntoIterator<Item = (String, AccountStakeRecord)>,
    D: IntoIterator<Item = (String, AccountStakeRecord)>,
    K: IntoIterator<Item = (String, AccountStakeRecord)>,
{
    let mut merged = MergedAccounts::new();
    merged.fold_source(StakeSource::Legacy, legacy);
    merged.fold_source(StakeSource::Validators, validators);
    merged.fold_source(StakeSource::Delegators, delegators);
    merged.fold_source(StakeSource::LkMex, lk_mex);

    tracing::debug!("Merged {} accounts with stake", merged.len());
    merged
}

/// Returns the addresses that appear in more than one source, with the count.
pub fn overlapping_addresses<'a, I>(sources: I) -> HashMap<&'a str, usize>
where
    I: IntoIterator<Item = &'a AccountsMap>,
{
    let mut seen: HashMap<&'a str, usize> = HashMap::new();
    for source in sources {
        for address in source.keys() {
            *seen.entry(address.as_str()).or_default() += 1;
        }
    }
    seen.retain(|_, count| *count > 1);
    seen
}
