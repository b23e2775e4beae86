pub mod accounts;
pub mod error;
pub mod processor;
pub mod rest;
pub mod snapshot;
pub mod status;

pub use accounts::AccountsGetter;
pub use error::*;
pub use processor::{AccountsProcessor, IndexPayload, resolve_index_name};
pub use rest::{ApiCredentials, GenericApiResponse, HttpRestClient, RestClient};
pub use snapshot::SnapshotAccountsGetter;
pub use status::{EPOCH_FIELD_PATH, PATH_NODE_STATUS_META, extract_epoch, lookup_path};
