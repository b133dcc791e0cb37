//! Vault module — encrypted secret storage.
//!
//! This module provides:
//! - `Entry` and `EntryMetadata` types (`entry`)
//! - Binary vault file format with atomic installation (`format`)
//! - `Vault` / `UnlockedVault` for initializing, unlocking, and
//!   managing a vault (`store`)

pub mod entry;
pub mod format;
pub mod store;

// Re-export the most commonly used items.
pub use entry::{Entry, EntryMetadata};
pub use format::{VaultFile, CURRENT_VERSION};
pub use store::{UnlockedVault, Vault, MIN_PASSWORD_LEN};
