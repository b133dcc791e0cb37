//! High-level vault operations used by CLI commands.
//!
//! `Vault` is an explicitly constructed handle holding the configured
//! vault path — there is no ambient global — so tests can point each
//! instance at its own temporary file.  `initialize` creates the
//! encrypted file; `unlock` re-derives the key and opens it, yielding
//! an `UnlockedVault` for entry operations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::cipher::{generate_nonce, open, seal};
use crate::crypto::kdf::{derive_master_key_with_params, generate_salt, Argon2Params, SALT_LEN};
use crate::crypto::keys::MasterKey;
use crate::errors::{Result, UzpError};

use super::entry::{Entry, EntryMetadata};
use super::format::{self, VaultFile};

/// Minimum master password length, enforced here as defense-in-depth
/// independently of the CLI prompt's own check.
pub const MIN_PASSWORD_LEN: usize = 8;

/// A locked vault handle: a configured path plus the KDF costs to use
/// when creating a new file.
pub struct Vault {
    /// Path to the `.vault` file on disk.
    path: PathBuf,

    /// Argon2 costs for first-time initialization.  Existing vaults
    /// always use the costs stored in their own header.
    params: Argon2Params,
}

impl Vault {
    /// Create a handle for the vault file at `path` with default
    /// Argon2 costs.
    pub fn at(path: &Path) -> Self {
        Self::with_params(path, Argon2Params::default())
    }

    /// Create a handle with explicit Argon2 costs (from `Settings`).
    pub fn with_params(path: &Path, params: Argon2Params) -> Self {
        Self {
            path: path.to_path_buf(),
            params,
        }
    }

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` iff a well-formed vault file is present.
    ///
    /// Presence and framing only — no password is involved and nothing
    /// is decrypted.
    pub fn exists(&self) -> bool {
        format::probe(&self.path)
    }

    /// Create a brand-new vault file protected by `password`.
    ///
    /// Generates a random salt and nonce, derives the master key, seals
    /// the canonical empty entry list, and installs the file with an
    /// exclusive atomic link.  Fails with `VaultAlreadyExists` when any
    /// file is already at the path (a racing `init` loses here too),
    /// and with `WeakPassword` when the password is under 8 bytes.
    ///
    /// On every failure path the filesystem is left exactly as before;
    /// password-derived material is zeroized before returning.
    pub fn initialize(&self, password: &[u8]) -> Result<()> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(UzpError::WeakPassword(MIN_PASSWORD_LEN));
        }

        // Fast-path refusal.  The exclusive install below closes the
        // race this check alone would leave open.
        if self.exists() {
            return Err(UzpError::VaultAlreadyExists(self.path.clone()));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let salt = generate_salt();

        let mut master_bytes = derive_master_key_with_params(password, &salt, &self.params)?;
        let master_key = MasterKey::new(master_bytes);
        master_bytes.zeroize();

        let nonce = generate_nonce();
        let header = VaultFile::encode_header(&salt, &self.params, &nonce);

        // The canonical empty entry list.  A wrong password on unlock
        // fails at the auth tag, not by comparing plaintext.
        let plaintext = Zeroizing::new(
            serde_json::to_vec(&Vec::<Entry>::new())
                .map_err(|e| UzpError::SerializationError(format!("entries: {e}")))?,
        );

        let mut vault_key = master_key.derive_vault_key()?;
        let sealed = seal(&vault_key, &nonce, &plaintext, &header);
        vault_key.zeroize();
        let sealed = sealed?;

        let data = VaultFile::encode(&header, &sealed)?;
        format::write_new_vault(&self.path, &data)
    }

    /// Open the vault with `password`, returning an unlocked handle.
    ///
    /// Re-derives the master key from the stored salt and costs, then
    /// opens the sealed payload with the stored nonce and the header
    /// bytes as associated data.  A wrong password and a tampered file
    /// are indistinguishable: both surface as `AuthenticationFailed`.
    pub fn unlock(&self, password: &[u8]) -> Result<UnlockedVault> {
        let file = format::read_vault(&self.path)?;

        let mut master_bytes = derive_master_key_with_params(password, &file.salt, &file.params)?;
        let master_key = MasterKey::new(master_bytes);
        master_bytes.zeroize();

        let mut vault_key = master_key.derive_vault_key()?;
        let plaintext = open(&vault_key, &file.nonce, &file.sealed, &file.header_bytes);
        vault_key.zeroize();
        let plaintext = Zeroizing::new(plaintext?);

        let entry_list: Vec<Entry> = serde_json::from_slice(&plaintext)
            .map_err(|e| UzpError::InvalidVaultFormat(format!("entry JSON: {e}")))?;

        let entries = entry_list
            .into_iter()
            .map(|e| (e.name.clone(), e))
            .collect();

        Ok(UnlockedVault {
            path: self.path.clone(),
            salt: file.salt,
            params: file.params,
            entries,
            master_key,
        })
    }
}

/// An unlocked vault: decrypted entries plus the key material needed
/// to re-seal them on `save`.
pub struct UnlockedVault {
    path: PathBuf,

    /// Salt and costs from the vault header; reused on save so the
    /// password keeps deriving the same master key.
    salt: [u8; SALT_LEN],
    params: Argon2Params,

    /// In-memory map of entry name -> entry, sorted for deterministic
    /// serialization.
    entries: BTreeMap<String, Entry>,

    /// The derived master key (zeroized on drop).
    master_key: MasterKey,
}

impl UnlockedVault {
    /// Add a new entry.  Fails if the name is already taken.
    pub fn add_entry(&mut self, name: &str, value: &str) -> Result<()> {
        Self::validate_entry_name(name)?;

        if self.entries.contains_key(name) {
            return Err(UzpError::EntryAlreadyExists(name.to_string()));
        }

        let now = Utc::now();
        self.entries.insert(
            name.to_string(),
            Entry {
                name: name.to_string(),
                value: value.to_string(),
                created_at: now,
                updated_at: now,
            },
        );
        Ok(())
    }

    /// Return the plaintext value of an entry.
    pub fn get_entry(&self, name: &str) -> Result<&str> {
        Self::validate_entry_name(name)?;
        self.entries
            .get(name)
            .map(|e| e.value.as_str())
            .ok_or_else(|| UzpError::EntryNotFound(name.to_string()))
    }

    /// Remove an entry from the vault.
    pub fn remove_entry(&mut self, name: &str) -> Result<()> {
        Self::validate_entry_name(name)?;
        if self.entries.remove(name).is_none() {
            return Err(UzpError::EntryNotFound(name.to_string()));
        }
        Ok(())
    }

    /// List metadata for all entries, sorted by name.
    pub fn list_entries(&self) -> Vec<EntryMetadata> {
        self.entries
            .values()
            .map(|e| EntryMetadata {
                name: e.name.clone(),
                created_at: e.created_at,
                updated_at: e.updated_at,
            })
            .collect()
    }

    /// Returns the number of entries in the vault.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Serialize the entries and write the vault to disk atomically.
    ///
    /// Every save seals under a fresh nonce — the nonce in the file is
    /// never reused with the same key.  The file is replaced with a
    /// rename, so readers see the old vault or the new one, never a
    /// partial write.
    pub fn save(&mut self) -> Result<()> {
        let entry_list: Vec<&Entry> = self.entries.values().collect();
        let plaintext = Zeroizing::new(
            serde_json::to_vec(&entry_list)
                .map_err(|e| UzpError::SerializationError(format!("entries: {e}")))?,
        );

        let nonce = generate_nonce();
        let header = VaultFile::encode_header(&self.salt, &self.params, &nonce);

        let mut vault_key = self.master_key.derive_vault_key()?;
        let sealed = seal(&vault_key, &nonce, &plaintext, &header);
        vault_key.zeroize();
        let sealed = sealed?;

        let data = VaultFile::encode(&header, &sealed)?;
        format::write_vault(&self.path, &data)
    }

    /// Validate that an entry name is safe.
    ///
    /// Allowed: ASCII letters, digits, underscores, hyphens, periods.
    /// Must be non-empty and at most 256 characters.
    fn validate_entry_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(UzpError::CommandFailed(
                "entry name cannot be empty".into(),
            ));
        }
        if name.len() > 256 {
            return Err(UzpError::CommandFailed(
                "entry name cannot exceed 256 characters".into(),
            ));
        }
        if !name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
        {
            return Err(UzpError::CommandFailed(format!(
                "entry name '{name}' contains invalid characters — only ASCII letters, digits, underscores, hyphens, and periods are allowed"
            )));
        }
        Ok(())
    }
}
