//! Entry and EntryMetadata types stored inside the sealed payload.
//!
//! The whole entry list is serialized to JSON and sealed as one AEAD
//! payload, so values appear on disk only in encrypted form.  A fresh
//! vault holds the canonical empty list, serialized as `[]` — unlocking
//! with a bad password fails at the auth tag, never by inspecting
//! plaintext.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single secret entry in the vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// The name of the entry (e.g. "github-token").
    pub name: String,

    /// The plaintext value.  Exists in the clear only inside the
    /// sealed payload and in unlocked memory.
    pub value: String,

    /// When this entry was first created.
    pub created_at: DateTime<Utc>,

    /// When this entry was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Lightweight metadata about an entry (no value).
///
/// Returned by `UnlockedVault::list_entries` so callers can display
/// names and timestamps without handling secret material.
#[derive(Debug, Clone)]
pub struct EntryMetadata {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
