//! `uzp list` — list all entries.

use crate::cli::{build_vault, output, prompt_password, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let vault = build_vault(cli)?;
    let password = prompt_password()?;
    let unlocked = vault.unlock(password.as_bytes())?;

    output::print_entries_table(&unlocked.list_entries());
    Ok(())
}
