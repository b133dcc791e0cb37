//! `uzp add` — add an entry to the vault.

use zeroize::Zeroizing;

use crate::cli::{build_vault, output, prompt_password, Cli};
use crate::errors::{Result, UzpError};

/// Execute the `add` command.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    let vault = build_vault(cli)?;
    let password = prompt_password()?;
    let mut unlocked = vault.unlock(password.as_bytes())?;

    // The value is read without echo, same as the password.
    let value = Zeroizing::new(
        dialoguer::Password::new()
            .with_prompt(format!("Enter value for '{name}'"))
            .interact()
            .map_err(|e| UzpError::CommandFailed(format!("value prompt: {e}")))?,
    );

    unlocked.add_entry(name, &value)?;
    unlocked.save()?;

    output::success(&format!("Added '{name}'"));
    Ok(())
}
