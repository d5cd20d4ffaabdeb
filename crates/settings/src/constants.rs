//! Centralized configuration constants for keywire.

/// Config file location, relative to the platform config directory.
pub mod paths {
    /// Directory under the platform config dir.
    pub const APP_DIR: &str = "keywire";
    /// Config file name inside [`APP_DIR`].
    pub const CONFIG_FILE: &str = "config.toml";
}

/// Settings file validation limits.
pub mod settings {
    /// Maximum settings file size in bytes (64 KB).
    /// Settings files should be tiny; anything larger is suspicious.
    pub const MAX_FILE_SIZE: u64 = 64 * 1024;

    /// Maximum length for alias words, shortcut specs and action names.
    pub const MAX_STRING_LENGTH: usize = 256;
}
