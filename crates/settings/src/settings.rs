//! Configuration for keywire.
//!
//! Provides compile-time limits and TOML config file support: user alias
//! tables layered over the built-in ones, and keybindings mapping shortcuts
//! to action names.

pub mod constants;
pub mod file;

pub use file::{
    config_path, ensure_config_file, load_config, load_config_from, Config, ConfiguredAliases,
    KeybindingEntry,
};
