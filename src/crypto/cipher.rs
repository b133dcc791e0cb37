//! AES-256-GCM authenticated sealing and opening.
//!
//! Unlike the common prepend-the-nonce layout, the nonce here is a
//! caller-supplied argument: the vault file stores it as its own header
//! field, and the header bytes are bound into the authentication tag as
//! associated data.  Flipping a single bit anywhere — ciphertext, tag,
//! nonce, or associated data — makes `open` fail.
//!
//! `seal` is deterministic for a fixed nonce, so callers must generate
//! a fresh nonce for every call (`generate_nonce`).

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;

use crate::errors::{Result, UzpError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Generate a fresh random 12-byte nonce from the OS RNG.
///
/// Every seal operation needs its own nonce; reusing one under the
/// same key voids both confidentiality and integrity.
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Encrypt and authenticate `plaintext` with a 32-byte `key`.
///
/// `aad` is authenticated but not encrypted; `open` must be given the
/// same bytes.  Returns ciphertext with the 16-byte auth tag appended.
pub fn seal(key: &[u8], nonce: &[u8; NONCE_LEN], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| UzpError::EncryptionFailed(format!("invalid key length: {e}")))?;

    cipher
        .encrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|e| UzpError::EncryptionFailed(format!("encryption error: {e}")))
}

/// Decrypt and verify data that was produced by `seal`.
///
/// Fails with `AuthenticationFailed` on any mismatch of key, nonce,
/// ciphertext, tag, or associated data.  A wrong password surfaces
/// here too — the derived key differs, so the tag never matches —
/// indistinguishable from corruption by design.
pub fn open(key: &[u8], nonce: &[u8; NONCE_LEN], sealed: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| UzpError::AuthenticationFailed)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), Payload { msg: sealed, aad })
        .map_err(|_| UzpError::AuthenticationFailed)
}
