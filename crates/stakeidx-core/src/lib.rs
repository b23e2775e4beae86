//! Core domain logic for per-account stake aggregation.
//!
//! This crate provides:
//! - Account stake records and stake sources (`types` module)
//! - Arbitrary-precision balance summation (`balance` module)
//! - Merging of the four address-keyed stake sources (`merge` module)
//!
//! With the `config` feature enabled:
//! - Configuration management (`config` module)

pub mod balance;
pub mod merge;
pub mod types;

#[cfg(feature = "config")]
pub mod config;

// Re-export commonly used items from core modules
pub use balance::*;
pub use merge::*;
pub use types::*;

// Re-export key config types when feature is enabled
#[cfg(feature = "config")]
pub use config::{AppConfig, ConfigError};
