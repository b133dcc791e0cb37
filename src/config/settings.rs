use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, UzpError};

/// User-level configuration, loaded from `~/.uzp/config.toml`.
///
/// Every field has a sensible default so uzp works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Absolute path of the vault file.  Defaults to `<uzp dir>/uzp.vault`.
    #[serde(default)]
    pub vault_path: Option<String>,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_path: None,
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the uzp directory.
    const FILE_NAME: &'static str = "config.toml";

    /// Load settings from `<uzp_dir>/config.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(uzp_dir: &Path) -> Result<Self> {
        let config_path = uzp_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            UzpError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Build the full path of the vault file.
    ///
    /// The `vault_path` config key wins; otherwise `<uzp_dir>/uzp.vault`.
    pub fn vault_path(&self, uzp_dir: &Path) -> PathBuf {
        match &self.vault_path {
            Some(p) => PathBuf::from(p),
            None => uzp_dir.join("uzp.vault"),
        }
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn argon2_params(&self) -> crate::crypto::kdf::Argon2Params {
        crate::crypto::kdf::Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }
}

/// Resolve the default uzp directory: `~/.uzp`.
///
/// Uses `$HOME` on Unix with a `%USERPROFILE%` fallback for Windows.
pub fn default_uzp_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(".uzp"))
        .ok_or_else(|| {
            UzpError::ConfigError("cannot locate home directory (HOME is not set)".into())
        })
}

// ── Tests ────────────────────────────────────────────────────────────
