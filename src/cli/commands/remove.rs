//! `uzp rm` — remove an entry from the vault.

use dialoguer::Confirm;

use crate::cli::{build_vault, output, prompt_password, Cli};
use crate::errors::{Result, UzpError};

/// Execute the `rm` command.
pub fn execute(cli: &Cli, name: &str, force: bool) -> Result<()> {
    let vault = build_vault(cli)?;
    let password = prompt_password()?;
    let mut unlocked = vault.unlock(password.as_bytes())?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove entry '{name}'?"))
            .default(false)
            .interact()
            .map_err(|e| UzpError::CommandFailed(format!("failed to read confirmation: {e}")))?;

        if !confirmed {
            return Err(UzpError::UserCancelled);
        }
    }

    unlocked.remove_entry(name)?;
    unlocked.save()?;

    output::success(&format!("Removed '{name}'"));
    Ok(())
}
