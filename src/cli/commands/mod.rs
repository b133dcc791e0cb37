//! Implementations of the individual CLI subcommands.

pub mod add;
pub mod get;
pub mod init;
pub mod list;
pub mod remove;
