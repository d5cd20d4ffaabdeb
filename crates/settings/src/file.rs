//! TOML config file support.
//!
//! Config location: `~/.config/keywire/config.toml`

use collections::{FxHashMap, IndexMap};
use key_encoding::{
    BuiltinAliases, FunctionalKey, KeyEvent, KeyEventType, KeyModifiers, ProtocolTables,
    ShortcutAliases, ShortcutKey, ShortcutParser,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants::{paths, settings::MAX_FILE_SIZE, settings::MAX_STRING_LENGTH};

/// Custom keybinding: maps a shortcut to an action name.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct KeybindingEntry {
    /// Shortcut spec (e.g., "ctrl+shift+t", "alt+left")
    pub keys: String,
    /// Action name (e.g., "new-tab", "quit")
    pub action: String,
    /// Fire on key release instead of press/repeat.
    #[serde(default)]
    pub on_release: bool,
}

impl KeybindingEntry {
    /// Event types this binding reacts to.
    pub fn event_types(&self) -> KeyEventType {
        if self.on_release {
            KeyEventType::RELEASE
        } else {
            KeyEventType::PRESS | KeyEventType::REPEAT
        }
    }

    pub fn matches<A: ShortcutAliases>(
        &self,
        parser: &ShortcutParser<A>,
        event: &KeyEvent,
    ) -> bool {
        parser.matches(event, &self.keys, self.event_types())
    }
}

/// User-facing config parsed from TOML.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Extra spellings for functional keys: word -> key name (e.g. `bksp = "backspace"`).
    pub functional_key_aliases: IndexMap<String, String>,
    /// Extra words for printable keys: word -> single character.
    pub character_key_aliases: IndexMap<String, String>,
    /// Extra modifier words: word -> modifier name (e.g. `win = "super"`).
    pub modifier_aliases: IndexMap<String, String>,
    /// Keybindings, later entries take precedence.
    pub keybindings: Vec<KeybindingEntry>,
}

impl Config {
    /// Build the alias source for a [`ShortcutParser`]: the user tables
    /// layered over the built-in ones. Entries that name nothing are
    /// skipped with a warning.
    pub fn aliases(&self) -> ConfiguredAliases {
        let builtin = BuiltinAliases::new();
        let tables = ProtocolTables::global();

        let mut functional = FxHashMap::default();
        for (word, target) in &self.functional_key_aliases {
            if !is_usable_word("functional key alias", word) {
                continue;
            }
            let upper = target.to_uppercase();
            match tables
                .functional_by_name(&upper)
                .or_else(|| builtin.functional_alias(&upper))
            {
                Some(key) => {
                    functional.insert(word.to_uppercase(), key);
                }
                None => tracing::warn!(
                    "Ignoring functional key alias {:?}: unknown key {:?}",
                    word,
                    target
                ),
            }
        }

        let mut character = FxHashMap::default();
        for (word, target) in &self.character_key_aliases {
            if !is_usable_word("character key alias", word) {
                continue;
            }
            let mut chars = target.chars();
            let resolved = match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => builtin.character_alias(&target.to_uppercase()),
            };
            match resolved {
                Some(c) => {
                    character.insert(word.to_uppercase(), c);
                }
                None => tracing::warn!(
                    "Ignoring character key alias {:?}: {:?} is not a single character",
                    word,
                    target
                ),
            }
        }

        let mut modifiers = FxHashMap::default();
        for (word, target) in &self.modifier_aliases {
            if !is_usable_word("modifier alias", word) {
                continue;
            }
            match builtin.modifier(&target.to_uppercase()) {
                Some(modifier) => {
                    modifiers.insert(word.to_uppercase(), modifier);
                }
                None => tracing::warn!(
                    "Ignoring modifier alias {:?}: unknown modifier {:?}",
                    word,
                    target
                ),
            }
        }

        ConfiguredAliases {
            builtin,
            functional,
            character,
            modifiers,
        }
    }

    /// Action bound to `event`, if any. The last matching binding wins.
    pub fn action_for<A: ShortcutAliases>(
        &self,
        parser: &ShortcutParser<A>,
        event: &KeyEvent,
    ) -> Option<&str> {
        self.keybindings
            .iter()
            .rev()
            .find(|binding| binding.matches(parser, event))
            .map(|binding| binding.action.as_str())
    }

    /// Bindings that can never fire: an unknown modifier word, a key word
    /// that names no key, or a spec over the length limit.
    pub fn unusable_keybindings<A: ShortcutAliases>(
        &self,
        parser: &ShortcutParser<A>,
    ) -> Vec<&KeybindingEntry> {
        self.keybindings
            .iter()
            .filter(|binding| {
                if binding.keys.len() > MAX_STRING_LENGTH {
                    return true;
                }
                let parsed = parser.parse(&binding.keys);
                parsed.has_unrecognized_modifiers()
                    || matches!(parsed.key, ShortcutKey::Unrecognized(_) | ShortcutKey::Empty)
            })
            .collect()
    }
}

fn is_usable_word(kind: &str, word: &str) -> bool {
    if word.is_empty() || word.len() > MAX_STRING_LENGTH || word.contains('+') {
        tracing::warn!("Ignoring {} {:?}: not a usable shortcut word", kind, word);
        return false;
    }
    true
}

/// Built-in alias tables with the user's entries checked first.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredAliases {
    builtin: BuiltinAliases,
    functional: FxHashMap<String, FunctionalKey>,
    character: FxHashMap<String, char>,
    modifiers: FxHashMap<String, KeyModifiers>,
}

impl ConfiguredAliases {
    /// Number of user entries that survived validation.
    pub fn user_entries(&self) -> usize {
        self.functional.len() + self.character.len() + self.modifiers.len()
    }
}

impl ShortcutAliases for ConfiguredAliases {
    fn functional_alias(&self, word: &str) -> Option<FunctionalKey> {
        self.functional
            .get(word)
            .copied()
            .or_else(|| self.builtin.functional_alias(word))
    }

    fn character_alias(&self, word: &str) -> Option<char> {
        self.character
            .get(word)
            .copied()
            .or_else(|| self.builtin.character_alias(word))
    }

    fn modifier(&self, word: &str) -> Option<KeyModifiers> {
        self.modifiers
            .get(word)
            .copied()
            .or_else(|| self.builtin.modifier(word))
    }
}

/// Default config file content with comments (generated by `keywire init-config`).
const DEFAULT_CONFIG: &str = r##"# keywire configuration
#
# Shortcuts are written as modifier words and a key joined with "+",
# e.g. "ctrl+shift+a", "alt+left", "cmd+plus". Case does not matter
# except for single characters.

# Extra names for functional keys (value is a key name such as "page_up")
[functional-key-aliases]
# bksp = "backspace"

# Extra names for printable keys (value is a single character)
[character-key-aliases]
# hash = "#"

# Extra modifier words (value is shift, alt, ctrl, super, hyper, meta, caps_lock or num_lock)
[modifier-aliases]
# win = "super"

# Keybindings: later entries win when several match
# [[keybindings]]
# keys = "ctrl+shift+t"
# action = "new-tab"
#
# [[keybindings]]
# keys = "esc"
# action = "dismiss"
# on-release = true
"##;

/// Return the config file path.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(paths::APP_DIR).join(paths::CONFIG_FILE))
}

/// Ensure the config file exists, creating a default if missing.
/// Returns the path to the config file.
pub fn ensure_config_file() -> Option<PathBuf> {
    let path = config_path()?;
    ensure_config_file_at(&path)?;
    Some(path)
}

fn ensure_config_file_at(path: &Path) -> Option<()> {
    if !path.exists() {
        let parent = path.parent()?;
        std::fs::create_dir_all(parent).ok()?;
        std::fs::write(path, DEFAULT_CONFIG).ok()?;
        tracing::info!("Created default config at {:?}", path);
    }
    Some(())
}

/// Load and parse the config file. Returns default on any error.
pub fn load_config() -> Config {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Config::default(),
    }
}

/// Load and parse the config file at `path`. Returns default on any error.
pub fn load_config_from(path: &Path) -> Config {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to read config: {}", e);
            }
            return Config::default();
        }
    };

    // Size guard
    if content.len() > MAX_FILE_SIZE as usize {
        tracing::warn!(
            "Config file too large ({} bytes), using defaults",
            content.len()
        );
        return Config::default();
    }

    match toml::from_str(&content) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("Failed to parse config.toml: {}", e);
            Config::default()
        }
    }
}
