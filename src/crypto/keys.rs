//! The `MasterKey` wrapper and HKDF-SHA256 sub-key derivation.
//!
//! Argon2id output is treated as the master key; the key actually fed
//! to the AEAD is expanded from it with HKDF (RFC 5869) under a fixed
//! context string.  Keeping the two separate means future sub-keys
//! (e.g. a search index key) can be derived without touching the file
//! format.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::errors::{Result, UzpError};

/// Length of derived sub-keys (256 bits).
const KEY_LEN: usize = 32;

/// Context string binding the vault encryption key to its purpose.
const VAULT_KEY_INFO: &[u8] = b"uzp-vault-encryption-key";

/// Internal helper: run HKDF-SHA256 expand with the given `info`.
///
/// We skip the `extract` step and use the master key directly as the
/// pseudo-random key (PRK), because the master key already has high
/// entropy (it came from Argon2id).
fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<[u8; KEY_LEN]> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = [0u8; KEY_LEN];
    hk.expand(info, &mut okm)
        .map_err(|e| UzpError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// A wrapper around a 32-byte master key that automatically zeroes
/// its memory when dropped.
///
/// Use this to hold the master key in memory so it cannot linger
/// after it is no longer needed.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Derive the vault encryption key from this master key.
    ///
    /// The caller owns the returned bytes and must zeroize them after
    /// the seal/open operation completes.
    pub fn derive_vault_key(&self) -> Result<[u8; KEY_LEN]> {
        hkdf_derive(&self.bytes, VAULT_KEY_INFO)
    }
}
