//! Alias tables consulted by the shortcut parser.
//!
//! The parser only sees the [`ShortcutAliases`] trait. [`BuiltinAliases`]
//! carries the stock names; the settings layer wraps it with user entries.

use crate::event::KeyModifiers;
use crate::tables::FunctionalKey;
use collections::FxHashMap;

/// Source of the three name tables used to normalize shortcut specs.
/// Every lookup receives the word already upper-cased.
#[cfg_attr(test, mockall::automock)]
pub trait ShortcutAliases {
    /// Alternate spelling of a functional key, e.g. `PGUP`.
    fn functional_alias(&self, word: &str) -> Option<FunctionalKey>;
    /// Word for a printable key, e.g. `SPACE` or `PLUS`.
    fn character_alias(&self, word: &str) -> Option<char>;
    /// Modifier word, e.g. `CTRL` or `CMD`.
    fn modifier(&self, word: &str) -> Option<KeyModifiers>;
}

const FUNCTIONAL_KEY_ALIASES: &[(&str, FunctionalKey)] = &[
    ("ESC", FunctionalKey::Escape),
    ("PGUP", FunctionalKey::PageUp),
    ("PAGEUP", FunctionalKey::PageUp),
    ("PGDN", FunctionalKey::PageDown),
    ("PAGEDOWN", FunctionalKey::PageDown),
    ("RETURN", FunctionalKey::Enter),
    ("ARROWUP", FunctionalKey::Up),
    ("ARROWDOWN", FunctionalKey::Down),
    ("ARROWRIGHT", FunctionalKey::Right),
    ("ARROWLEFT", FunctionalKey::Left),
    ("DEL", FunctionalKey::Delete),
    ("KP_PLUS", FunctionalKey::KpAdd),
    ("KP_MINUS", FunctionalKey::KpSubtract),
];

const CHARACTER_KEY_ALIASES: &[(&str, char)] = &[
    ("SPACE", ' '),
    ("EXCLAM", '!'),
    ("DOUBLE_QUOTE", '"'),
    ("NUMBER_SIGN", '#'),
    ("DOLLAR", '$'),
    ("AMPERSAND", '&'),
    ("APOSTROPHE", '\''),
    ("PARENTHESIS_LEFT", '('),
    ("PARENTHESIS_RIGHT", ')'),
    ("COMMA", ','),
    ("MINUS", '-'),
    ("HYPHEN", '-'),
    ("PERIOD", '.'),
    ("SLASH", '/'),
    ("COLON", ':'),
    ("SEMICOLON", ';'),
    ("LESS", '<'),
    ("EQUAL", '='),
    ("GREATER", '>'),
    ("AT", '@'),
    ("BRACKET_LEFT", '['),
    ("BACKSLASH", '\\'),
    ("BRACKET_RIGHT", ']'),
    ("UNDERSCORE", '_'),
    ("GRAVE_ACCENT", '`'),
    ("PARAGRAPH", '§'),
    ("MASCULINE", 'º'),
    ("A_GRAVE", 'à'),
    ("E_GRAVE", 'è'),
    ("A_ACUTE", 'á'),
    ("E_ACUTE", 'é'),
    ("PLUS", '+'),
    ("ASTERISK", '*'),
    ("QUESTION", '?'),
    ("CIRCUMFLEX", '^'),
    ("BAR", '|'),
    ("TILDE", '~'),
];

const MODIFIER_NAMES: &[(&str, KeyModifiers)] = &[
    ("SHIFT", KeyModifiers::SHIFT),
    ("⇧", KeyModifiers::SHIFT),
    ("ALT", KeyModifiers::ALT),
    ("OPTION", KeyModifiers::ALT),
    ("OPT", KeyModifiers::ALT),
    ("⌥", KeyModifiers::ALT),
    ("CTRL", KeyModifiers::CTRL),
    ("CONTROL", KeyModifiers::CTRL),
    ("⌃", KeyModifiers::CTRL),
    ("SUPER", KeyModifiers::SUPER),
    ("CMD", KeyModifiers::SUPER),
    ("COMMAND", KeyModifiers::SUPER),
    ("⌘", KeyModifiers::SUPER),
    ("HYPER", KeyModifiers::HYPER),
    ("META", KeyModifiers::META),
    ("CAPS_LOCK", KeyModifiers::CAPS_LOCK),
    ("NUM_LOCK", KeyModifiers::NUM_LOCK),
];

/// The stock alias tables.
#[derive(Debug, Clone)]
pub struct BuiltinAliases {
    functional: FxHashMap<&'static str, FunctionalKey>,
    character: FxHashMap<&'static str, char>,
    modifiers: FxHashMap<&'static str, KeyModifiers>,
}

impl BuiltinAliases {
    pub fn new() -> Self {
        Self {
            functional: FUNCTIONAL_KEY_ALIASES.iter().copied().collect(),
            character: CHARACTER_KEY_ALIASES.iter().copied().collect(),
            modifiers: MODIFIER_NAMES.iter().copied().collect(),
        }
    }
}

impl Default for BuiltinAliases {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcutAliases for BuiltinAliases {
    fn functional_alias(&self, word: &str) -> Option<FunctionalKey> {
        self.functional.get(word).copied()
    }

    fn character_alias(&self, word: &str) -> Option<char> {
        self.character.get(word).copied()
    }

    fn modifier(&self, word: &str) -> Option<KeyModifiers> {
        self.modifiers.get(word).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookups_expect_upper_case() {
        let aliases = BuiltinAliases::new();
        assert_eq!(aliases.functional_alias("PGUP"), Some(FunctionalKey::PageUp));
        assert_eq!(aliases.functional_alias("pgup"), None);
        assert_eq!(aliases.character_alias("SPACE"), Some(' '));
        assert_eq!(aliases.modifier("CMD"), Some(KeyModifiers::SUPER));
        assert_eq!(aliases.modifier("⌥"), Some(KeyModifiers::ALT));
        assert_eq!(aliases.modifier("WIN"), None);
    }

    #[test]
    fn every_functional_alias_targets_a_different_spelling() {
        for &(word, key) in FUNCTIONAL_KEY_ALIASES {
            assert_ne!(word, key.name());
        }
    }
}
