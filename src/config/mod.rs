//! Configuration module — user settings loaded from `~/.uzp/config.toml`.

pub mod settings;

pub use settings::{default_uzp_dir, Settings};
