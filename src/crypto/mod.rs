//! Cryptographic primitives for uzp.
//!
//! This module provides:
//! - AES-256-GCM sealing and opening with explicit nonces (`cipher`)
//! - Argon2id password-based key derivation (`kdf`)
//! - HKDF-based vault key derivation and the `MasterKey` wrapper (`keys`)

pub mod cipher;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, open, derive_master_key, ...};
pub use cipher::{generate_nonce, open, seal, NONCE_LEN};
pub use kdf::{derive_master_key, derive_master_key_with_params, generate_salt, Argon2Params};
pub use keys::MasterKey;
