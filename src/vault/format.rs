//! Binary vault file format and atomic installation.
//!
//! A `.vault` file has this layout:
//!
//! ```text
//! [UZPV: 4 bytes][version: 1][kdf alg: 1][salt: 32]
//! [memory_kib: 4 LE][iterations: 4 LE][parallelism: 4 LE]
//! [nonce: 12][payload_len: 4 LE][sealed payload]
//! ```
//!
//! - **Magic** (`UZPV`): identifies the file as a uzp vault.
//! - **Version**: format version (currently `1`); precedes everything
//!   else so future layouts stay recognizable.  Unknown versions are
//!   rejected, never misparsed.
//! - **KDF algorithm id**: `1` = Argon2id.
//! - **Salt / cost fields / nonce**: stored in clear; none of them are
//!   secret, and the unlock path needs them before any key exists.
//! - **Sealed payload**: AES-256-GCM ciphertext + tag, length-prefixed.
//!   Bytes after the payload are ignored so a v1 reader tolerates
//!   future trailing additions.
//!
//! The header bytes (everything before `payload_len`) double as the
//! AEAD associated data, so the auth tag also covers them.
//!
//! Writes go to a temp file in the same directory, are synced, and are
//! then installed in one step: `hard_link` for first-time creation
//! (fails if the target exists, which closes the check-then-create
//! race between concurrent `init` invocations) or `rename` for an
//! atomic overwrite on save.  A crash before the install step leaves
//! the previous state untouched.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::RngCore;

use crate::crypto::kdf::{Argon2Params, SALT_LEN};
use crate::crypto::NONCE_LEN;
use crate::errors::{Result, UzpError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every vault file.
const MAGIC: &[u8; 4] = b"UZPV";

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

/// KDF algorithm identifier for Argon2id.
pub const KDF_ALG_ARGON2ID: u8 = 1;

/// Fixed-size header: 4 (magic) + 1 (version) + 1 (kdf alg) + 32 (salt)
/// + 12 (three u32 cost fields) + 12 (nonce).
pub const HEADER_LEN: usize = 4 + 1 + 1 + SALT_LEN + 12 + NONCE_LEN;

/// Header plus the 4-byte payload length prefix.
const PREFIX_LEN: usize = HEADER_LEN + 4;

// ---------------------------------------------------------------------------
// VaultFile
// ---------------------------------------------------------------------------

/// The decoded contents of a vault file.
///
/// `header_bytes` preserves the exact header bytes from disk so the
/// AEAD verifies the tag over what was actually stored — no
/// re-encoding round trip.
pub struct VaultFile {
    pub version: u8,
    pub kdf_alg: u8,
    pub salt: [u8; SALT_LEN],
    pub params: Argon2Params,
    pub nonce: [u8; NONCE_LEN],
    pub sealed: Vec<u8>,
    /// The raw header bytes exactly as stored on disk (AEAD aad).
    pub header_bytes: Vec<u8>,
}

impl VaultFile {
    /// Encode the header fields into their on-disk byte layout.
    ///
    /// The result is both the file prefix and the associated data the
    /// payload is sealed under.
    pub fn encode_header(
        salt: &[u8; SALT_LEN],
        params: &Argon2Params,
        nonce: &[u8; NONCE_LEN],
    ) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN);
        buf.extend_from_slice(MAGIC);
        buf.push(CURRENT_VERSION);
        buf.push(KDF_ALG_ARGON2ID);
        buf.extend_from_slice(salt);
        buf.extend_from_slice(&params.memory_kib.to_le_bytes());
        buf.extend_from_slice(&params.iterations.to_le_bytes());
        buf.extend_from_slice(&params.parallelism.to_le_bytes());
        buf.extend_from_slice(nonce);
        buf
    }

    /// Assemble the full file image: header, payload length, payload.
    pub fn encode(header_bytes: &[u8], sealed: &[u8]) -> Result<Vec<u8>> {
        let payload_len = u32::try_from(sealed.len()).map_err(|_| {
            UzpError::SerializationError(format!(
                "sealed payload length {} exceeds u32::MAX",
                sealed.len()
            ))
        })?;

        let mut buf = Vec::with_capacity(header_bytes.len() + 4 + sealed.len());
        buf.extend_from_slice(header_bytes);
        buf.extend_from_slice(&payload_len.to_le_bytes());
        buf.extend_from_slice(sealed);
        Ok(buf)
    }

    /// Decode a vault file image, validating magic, version, and framing.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < PREFIX_LEN {
            return Err(UzpError::InvalidVaultFormat(
                "file too small to be a valid vault".into(),
            ));
        }

        if &data[0..4] != MAGIC {
            return Err(UzpError::InvalidVaultFormat(
                "missing UZPV magic bytes".into(),
            ));
        }

        let version = data[4];
        if version != CURRENT_VERSION {
            return Err(UzpError::InvalidVaultFormat(format!(
                "unsupported version {version}, expected {CURRENT_VERSION}"
            )));
        }

        let kdf_alg = data[5];
        if kdf_alg != KDF_ALG_ARGON2ID {
            return Err(UzpError::InvalidVaultFormat(format!(
                "unknown KDF algorithm id {kdf_alg}"
            )));
        }

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&data[6..6 + SALT_LEN]);

        let costs = 6 + SALT_LEN;
        let params = Argon2Params {
            memory_kib: read_u32(data, costs)?,
            iterations: read_u32(data, costs + 4)?,
            parallelism: read_u32(data, costs + 8)?,
        };

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&data[costs + 12..costs + 12 + NONCE_LEN]);

        let payload_len = read_u32(data, HEADER_LEN)? as usize;
        let payload_end = PREFIX_LEN + payload_len;
        if payload_end > data.len() {
            return Err(UzpError::InvalidVaultFormat(
                "payload length exceeds file size".into(),
            ));
        }

        // Bytes past payload_end are tolerated: a future minor revision
        // may append fields a v1 reader does not know about.
        Ok(Self {
            version,
            kdf_alg,
            salt,
            params,
            nonce,
            sealed: data[PREFIX_LEN..payload_end].to_vec(),
            header_bytes: data[..HEADER_LEN].to_vec(),
        })
    }
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    data.get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| UzpError::InvalidVaultFormat("truncated field".into()))
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read and decode a vault file from disk.
pub fn read_vault(path: &Path) -> Result<VaultFile> {
    if !path.exists() {
        return Err(UzpError::VaultNotFound(path.to_path_buf()));
    }

    let data = fs::read(path)?;
    VaultFile::decode(&data)
}

/// Check whether `path` holds a well-formed vault file.
///
/// Presence and framing only — no key derivation, no decryption.
pub fn probe(path: &Path) -> bool {
    match fs::read(path) {
        Ok(data) => VaultFile::decode(&data).is_ok(),
        Err(_) => false,
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Write `data` to a fresh temp file next to `path` and sync it.
///
/// The temp file lives in the same directory so the final install step
/// stays on one filesystem.  The random suffix keeps concurrent
/// writers from clobbering each other's temp files.
fn write_temp(path: &Path, data: &[u8]) -> Result<PathBuf> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let mut suffix = [0u8; 8];
    rand::rngs::OsRng.fill_bytes(&mut suffix);
    let tmp_path = parent.join(format!(
        ".{}.{:016x}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy(),
        u64::from_le_bytes(suffix)
    ));

    let result = (|| -> Result<()> {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    Ok(tmp_path)
}

/// Install a brand-new vault file atomically and exclusively.
///
/// The temp file is linked to the target with `hard_link`, which fails
/// if the target already exists.  Two racing `init` invocations thus
/// get exactly one winner; the loser sees `VaultAlreadyExists` and no
/// file is ever merged or overwritten.  On any failure the temp file
/// is removed, leaving the directory exactly as before.
pub fn write_new_vault(path: &Path, data: &[u8]) -> Result<()> {
    let tmp_path = write_temp(path, data)?;

    let linked = fs::hard_link(&tmp_path, path);
    let _ = fs::remove_file(&tmp_path);

    linked.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            UzpError::VaultAlreadyExists(path.to_path_buf())
        } else {
            UzpError::Io(e)
        }
    })
}

/// Replace an existing vault file atomically.
///
/// Used by save after unlock: rename over the target, so a reader sees
/// either the old vault or the new one, never a partial write.
pub fn write_vault(path: &Path, data: &[u8]) -> Result<()> {
    let tmp_path = write_temp(path, data)?;

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(UzpError::Io(e));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> Vec<u8> {
        VaultFile::encode_header(&[7u8; SALT_LEN], &Argon2Params::default(), &[9u8; NONCE_LEN])
    }

    #[test]
    fn encode_decode_round_trip() {
        let header = sample_header();
        let sealed = vec![1, 2, 3, 4, 5];
        let data = VaultFile::encode(&header, &sealed).unwrap();

        let decoded = VaultFile::decode(&data).unwrap();
        assert_eq!(decoded.version, CURRENT_VERSION);
        assert_eq!(decoded.kdf_alg, KDF_ALG_ARGON2ID);
        assert_eq!(decoded.salt, [7u8; SALT_LEN]);
        assert_eq!(decoded.params, Argon2Params::default());
        assert_eq!(decoded.nonce, [9u8; NONCE_LEN]);
        assert_eq!(decoded.sealed, sealed);
        assert_eq!(decoded.header_bytes, header);
    }

    #[test]
    fn rejects_bad_magic() {
        let header = sample_header();
        let mut data = VaultFile::encode(&header, &[0u8; 4]).unwrap();
        data[0] = b'X';
        assert!(matches!(
            VaultFile::decode(&data),
            Err(UzpError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn rejects_unknown_version() {
        let header = sample_header();
        let mut data = VaultFile::encode(&header, &[0u8; 4]).unwrap();
        data[4] = 99;
        assert!(matches!(
            VaultFile::decode(&data),
            Err(UzpError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn rejects_unknown_kdf_algorithm() {
        let header = sample_header();
        let mut data = VaultFile::encode(&header, &[0u8; 4]).unwrap();
        data[5] = 2;
        assert!(matches!(
            VaultFile::decode(&data),
            Err(UzpError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn rejects_truncated_file() {
        let header = sample_header();
        let data = VaultFile::encode(&header, &[0u8; 16]).unwrap();
        assert!(VaultFile::decode(&data[..data.len() - 1]).is_err());
        assert!(VaultFile::decode(&data[..10]).is_err());
        assert!(VaultFile::decode(&[]).is_err());
    }

    #[test]
    fn rejects_overlong_payload_length() {
        let header = sample_header();
        let mut data = VaultFile::encode(&header, &[0u8; 4]).unwrap();
        // Claim a payload longer than the file.
        data[HEADER_LEN..HEADER_LEN + 4].copy_from_slice(&1000u32.to_le_bytes());
        assert!(matches!(
            VaultFile::decode(&data),
            Err(UzpError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn ignores_trailing_bytes() {
        let header = sample_header();
        let sealed = vec![42u8; 20];
        let mut data = VaultFile::encode(&header, &sealed).unwrap();
        data.extend_from_slice(b"future-extension-fields");

        let decoded = VaultFile::decode(&data).unwrap();
        assert_eq!(decoded.sealed, sealed);
    }

    #[test]
    fn probe_rejects_foreign_and_missing_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("x.vault");

        assert!(!probe(&path));

        fs::write(&path, b"not a vault at all").unwrap();
        assert!(!probe(&path));

        let header = sample_header();
        let data = VaultFile::encode(&header, &[0u8; 16]).unwrap();
        fs::write(&path, &data).unwrap();
        assert!(probe(&path));
    }

    #[test]
    fn write_new_vault_refuses_existing_target() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("x.vault");

        write_new_vault(&path, b"first").unwrap();
        let err = write_new_vault(&path, b"second").unwrap_err();
        assert!(matches!(err, UzpError::VaultAlreadyExists(_)));

        // Loser must not have altered the winner's file.
        assert_eq!(fs::read(&path).unwrap(), b"first");

        // No temp files left behind.
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn write_vault_replaces_existing_target() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("x.vault");

        write_new_vault(&path, b"old").unwrap();
        write_vault(&path, b"new").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }
}
