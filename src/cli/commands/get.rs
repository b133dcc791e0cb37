//! `uzp get` — print an entry's value.

use crate::cli::{build_vault, prompt_password, Cli};
use crate::errors::Result;

/// Execute the `get` command.
///
/// The value goes to stdout unadorned so it can be piped.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    let vault = build_vault(cli)?;
    let password = prompt_password()?;
    let unlocked = vault.unlock(password.as_bytes())?;

    println!("{}", unlocked.get_entry(name)?);
    Ok(())
}
