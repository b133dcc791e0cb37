//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::{default_uzp_dir, Settings};
use crate::errors::{Result, UzpError};
use crate::vault::{Vault, MIN_PASSWORD_LEN};

/// uzp CLI: single-file encrypted secret vault.
#[derive(Parser)]
#[command(
    name = "uzp",
    about = "Encrypted secret vault protected by a master password",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file path (default: ~/.uzp/uzp.vault)
    #[arg(long, global = true)]
    pub vault: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Initialize a new vault with a master password
    Init,

    /// Add an entry (prompts for the value)
    Add {
        /// Entry name (e.g. github-token)
        name: String,
    },

    /// Print an entry's value
    Get {
        /// Entry name
        name: String,
    },

    /// List all entries
    List,

    /// Remove an entry
    Rm {
        /// Entry name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Build the `Vault` handle from CLI arguments and user settings.
///
/// `--vault <path>` wins; otherwise `vault_path` from
/// `~/.uzp/config.toml`; otherwise `~/.uzp/uzp.vault`.  Argon2 costs
/// come from the config file (defaults when absent).
pub fn build_vault(cli: &Cli) -> Result<Vault> {
    let (settings, uzp_dir) = match default_uzp_dir() {
        Ok(dir) => {
            let settings = Settings::load(&dir)?;
            (settings, Some(dir))
        }
        // No home directory: fine as long as the path came from --vault.
        Err(e) => match cli.vault {
            Some(_) => (Settings::default(), None),
            None => return Err(e),
        },
    };

    let path = match &cli.vault {
        Some(p) => PathBuf::from(p),
        None => {
            // uzp_dir is always Some here: the None case above either
            // took the --vault arm or returned early.
            let dir = uzp_dir.ok_or_else(|| {
                UzpError::ConfigError("cannot locate home directory (HOME is not set)".into())
            })?;
            settings.vault_path(&dir)
        }
    };

    Ok(Vault::with_params(&path, settings.argon2_params()))
}

/// Get the vault password, trying in order:
/// 1. `UZP_PASSWORD` env var (CI/scripting)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("UZP_PASSWORD") {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .interact()
        .map_err(|e| UzpError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation (used during `init`).
///
/// Also respects `UZP_PASSWORD` for scripted usage.  Enforces the
/// minimum password length; the vault core checks it again.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("UZP_PASSWORD") {
        if !pw.is_empty() {
            if pw.len() < MIN_PASSWORD_LEN {
                return Err(UzpError::WeakPassword(MIN_PASSWORD_LEN));
            }
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Enter master password")
            .with_confirmation("Confirm master password", "Passwords do not match, try again")
            .interact()
            .map_err(|e| UzpError::CommandFailed(format!("password prompt: {e}")))?;

        if password.len() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}
