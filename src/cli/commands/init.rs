//! `uzp init` — create a new vault with a master password.

use crate::cli::{build_vault, output, prompt_new_password, Cli};
use crate::errors::{Result, UzpError};

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let vault = build_vault(cli)?;

    // Refuse early, before prompting for a password.  The vault core
    // repeats this check and the install itself is exclusive.
    if vault.exists() {
        output::tip("Use `uzp add <NAME>` to store secrets in the existing vault.");
        return Err(UzpError::VaultAlreadyExists(vault.path().to_path_buf()));
    }

    let password = prompt_new_password()?;

    vault.initialize(password.as_bytes())?;

    output::success("Vault initialized successfully!");
    output::info(&format!("Vault created at {}", vault.path().display()));
    output::tip("Run `uzp add <NAME>` to store your first secret.");
    output::tip("Run `uzp list` to see all entries.");

    Ok(())
}
