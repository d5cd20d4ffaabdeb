//! Shortcut specs (`ctrl+shift+a`) and matching decoded events against them.

use crate::aliases::ShortcutAliases;
use crate::event::{Key, KeyEvent, KeyEventType, KeyModifiers};
use crate::tables::ProtocolTables;
use collections::FxHashMap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Key half of a parsed shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShortcutKey {
    Key(Key),
    /// The spec had nothing after its last `+`-separated modifier.
    Empty,
    /// A multi-character word that names no key. Never matches a decoded
    /// event, but is kept so the shortcut still prints as written.
    Unrecognized(String),
}

impl ShortcutKey {
    /// Whether an event's key is the key this shortcut names.
    pub fn matches(&self, key: Option<Key>) -> bool {
        match (self, key) {
            (ShortcutKey::Key(expected), Some(actual)) => *expected == actual,
            (ShortcutKey::Empty, None) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ShortcutKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortcutKey::Key(key) => write!(f, "{key}"),
            ShortcutKey::Empty => Ok(()),
            ShortcutKey::Unrecognized(word) => f.write_str(word),
        }
    }
}

/// A shortcut spec normalized to a modifier set and a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedShortcut {
    pub mods: KeyModifiers,
    pub key: ShortcutKey,
}

impl ParsedShortcut {
    /// True when at least one modifier word was not in the modifier table.
    pub fn has_unrecognized_modifiers(&self) -> bool {
        self.mods.contains(KeyModifiers::UNRECOGNIZED)
    }
}

impl fmt::Display for ParsedShortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.mods.difference(KeyModifiers::UNRECOGNIZED).is_empty() {
            write!(f, "{}+", self.mods)?;
        }
        write!(f, "{}", self.key)
    }
}

impl KeyEvent {
    /// Match against an already parsed shortcut.
    ///
    /// The event type must intersect `event_type`, and lock modifiers are
    /// ignored. A shifted key reported alongside SHIFT also matches a
    /// shortcut written without shift, so `shift+1` reporting `!` matches `!`.
    pub fn matches_parsed_shortcut(
        &self,
        shortcut: &ParsedShortcut,
        event_type: KeyEventType,
    ) -> bool {
        if !self.event_type.intersects(event_type) {
            return false;
        }
        let mods = self.mods.without_locks();
        if mods == shortcut.mods && shortcut.key.matches(self.key) {
            return true;
        }
        self.shifted_key.is_some()
            && mods.contains(KeyModifiers::SHIFT)
            && mods.difference(KeyModifiers::SHIFT) == shortcut.mods
            && shortcut.key.matches(self.shifted_key)
    }
}

/// Parses shortcut specs against an alias source and memoizes the results.
///
/// The cache is keyed by the exact spec string and only grows; a
/// configuration defines a bounded set of specs. It sits behind a mutex so
/// one parser can be shared between threads.
pub struct ShortcutParser<A> {
    aliases: A,
    tables: &'static ProtocolTables,
    cache: Mutex<FxHashMap<String, Arc<ParsedShortcut>>>,
}

impl<A: ShortcutAliases> ShortcutParser<A> {
    pub fn new(aliases: A) -> Self {
        Self::with_tables(aliases, ProtocolTables::global())
    }

    pub fn with_tables(aliases: A, tables: &'static ProtocolTables) -> Self {
        Self {
            aliases,
            tables,
            cache: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn aliases(&self) -> &A {
        &self.aliases
    }

    /// Number of distinct specs parsed so far.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Parse `spec`, returning the cached result when it was seen before.
    pub fn parse(&self, spec: &str) -> Arc<ParsedShortcut> {
        if let Some(parsed) = self.cache.lock().get(spec) {
            return Arc::clone(parsed);
        }
        let parsed = Arc::new(self.parse_uncached(spec));
        tracing::debug!("parsed shortcut {:?} as {}", spec, parsed);
        Arc::clone(
            self.cache
                .lock()
                .entry(spec.to_string())
                .or_insert(parsed),
        )
    }

    fn parse_uncached(&self, spec: &str) -> ParsedShortcut {
        // A trailing `+` is the plus key itself, not a separator.
        let rewritten;
        let spec = match spec.strip_suffix('+') {
            Some(head) => {
                rewritten = format!("{head}plus");
                rewritten.as_str()
            }
            None => spec,
        };

        let mut words: Vec<&str> = spec.split('+').collect();
        let key_word = words.pop().unwrap_or_default();

        let mut mods = KeyModifiers::empty();
        for word in words {
            match self.aliases.modifier(&word.to_uppercase()) {
                Some(modifier) => mods |= modifier,
                None => {
                    tracing::debug!("unknown modifier {:?} in shortcut {:?}", word, spec);
                    mods |= KeyModifiers::UNRECOGNIZED;
                }
            }
        }

        ParsedShortcut {
            mods,
            key: self.resolve_key(key_word),
        }
    }

    fn resolve_key(&self, word: &str) -> ShortcutKey {
        let upper = word.to_uppercase();
        if let Some(key) = self.aliases.functional_alias(&upper) {
            return ShortcutKey::Key(Key::Functional(key));
        }
        if let Some(key) = self.tables.functional_by_name(&upper) {
            return ShortcutKey::Key(Key::Functional(key));
        }
        if let Some(c) = self.aliases.character_alias(&upper) {
            return ShortcutKey::Key(Key::Char(c));
        }
        let mut chars = word.chars();
        match (chars.next(), chars.next()) {
            (None, _) => ShortcutKey::Empty,
            (Some(c), None) => ShortcutKey::Key(Key::Char(c)),
            _ => ShortcutKey::Unrecognized(word.to_string()),
        }
    }

    pub fn matches(&self, event: &KeyEvent, spec: &str, event_type: KeyEventType) -> bool {
        event.matches_parsed_shortcut(&self.parse(spec), event_type)
    }

    pub fn matches_press_or_repeat(&self, event: &KeyEvent, spec: &str) -> bool {
        self.matches(event, spec, KeyEventType::PRESS | KeyEventType::REPEAT)
    }

    pub fn matches_release(&self, event: &KeyEvent, spec: &str) -> bool {
        self.matches(event, spec, KeyEventType::RELEASE)
    }

    /// Press/repeat match, or else the event's text equals `spec` exactly.
    pub fn matches_case_sensitive_text_or_key(&self, event: &KeyEvent, spec: &str) -> bool {
        self.matches_press_or_repeat(event, spec) || event.text == spec
    }

    /// Press/repeat match, or else the event's text equals `spec` ignoring case.
    pub fn matches_case_insensitive_text_or_key(&self, event: &KeyEvent, spec: &str) -> bool {
        self.matches_press_or_repeat(event, spec)
            || event.text.to_lowercase() == spec.to_lowercase()
    }
}

impl<A: fmt::Debug> fmt::Debug for ShortcutParser<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortcutParser")
            .field("aliases", &self.aliases)
            .field("cached", &self.cache.lock().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::{BuiltinAliases, MockShortcutAliases};
    use crate::tables::FunctionalKey;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn parser() -> ShortcutParser<BuiltinAliases> {
        ShortcutParser::new(BuiltinAliases::new())
    }

    fn shortcut(mods: KeyModifiers, key: impl Into<Key>) -> ParsedShortcut {
        ParsedShortcut {
            mods,
            key: ShortcutKey::Key(key.into()),
        }
    }

    #[test_case("a", KeyModifiers::empty(), Key::Char('a') ; "bare letter")]
    #[test_case("ctrl+a", KeyModifiers::CTRL, Key::Char('a') ; "ctrl letter")]
    #[test_case("Ctrl+Shift+A", KeyModifiers::CTRL | KeyModifiers::SHIFT, Key::Char('A') ; "case kept on letter")]
    #[test_case("cmd+opt+x", KeyModifiers::SUPER | KeyModifiers::ALT, Key::Char('x') ; "mac words")]
    #[test_case("ctrl+enter", KeyModifiers::CTRL, Key::Functional(FunctionalKey::Enter) ; "functional name")]
    #[test_case("alt+Page_Up", KeyModifiers::ALT, Key::Functional(FunctionalKey::PageUp) ; "mixed case functional")]
    #[test_case("shift+pgdn", KeyModifiers::SHIFT, Key::Functional(FunctionalKey::PageDown) ; "functional alias")]
    #[test_case("esc", KeyModifiers::empty(), Key::Functional(FunctionalKey::Escape) ; "escape alias")]
    #[test_case("ctrl+space", KeyModifiers::CTRL, Key::Char(' ') ; "character alias")]
    #[test_case("ctrl++", KeyModifiers::CTRL, Key::Char('+') ; "trailing plus")]
    #[test_case("+", KeyModifiers::empty(), Key::Char('+') ; "lone plus")]
    #[test_case("ctrl+plus", KeyModifiers::CTRL, Key::Char('+') ; "plus word")]
    #[test_case("f12", KeyModifiers::empty(), Key::Functional(FunctionalKey::F12) ; "function key")]
    fn parses(spec: &str, mods: KeyModifiers, key: Key) {
        assert_eq!(*parser().parse(spec), shortcut(mods, key));
    }

    #[test]
    fn aliases_normalize_to_the_same_shortcut() {
        let parser = parser();
        assert_eq!(parser.parse("control+pgup"), parser.parse("ctrl+page_up"));
        assert_eq!(parser.parse("⌘+a"), parser.parse("super+a"));
    }

    #[test]
    fn unknown_modifier_sets_reserved_bit() {
        let parsed = parser().parse("ctrl+win+a");
        assert!(parsed.has_unrecognized_modifiers());
        assert_eq!(parsed.mods, KeyModifiers::CTRL | KeyModifiers::UNRECOGNIZED);
        assert!(!parser().parse("ctrl+a").has_unrecognized_modifiers());
    }

    #[tracing_test::traced_test]
    #[test]
    fn unknown_modifier_is_logged() {
        parser().parse("hyperx+a");
        assert!(logs_contain("unknown modifier"));
    }

    #[test]
    fn unrecognized_key_word_never_matches() {
        let parser = parser();
        let parsed = parser.parse("ctrl+frobnicate");
        assert_eq!(parsed.key, ShortcutKey::Unrecognized("frobnicate".into()));
        assert_eq!(parsed.to_string(), "ctrl+frobnicate");
        let event = KeyEvent::new('f').with_mods(KeyModifiers::CTRL);
        assert!(!parser.matches(&event, "ctrl+frobnicate", KeyEventType::PRESS));
    }

    #[test]
    fn empty_spec_matches_keyless_event() {
        let parser = parser();
        assert_eq!(parser.parse("").key, ShortcutKey::Empty);
        assert!(parser.matches(&KeyEvent::default(), "", KeyEventType::PRESS));
        assert!(!parser.matches(&KeyEvent::new('a'), "", KeyEventType::PRESS));
    }

    #[test]
    fn display_round_trips_words() {
        assert_eq!(parser().parse("control+shift+pgup").to_string(), "shift+ctrl+PAGE_UP");
        assert_eq!(parser().parse("a").to_string(), "a");
    }

    #[test]
    fn cached_parse_skips_alias_lookups() {
        let mut aliases = MockShortcutAliases::new();
        aliases
            .expect_modifier()
            .withf(|word: &str| word == "CTRL")
            .times(1)
            .returning(|_| Some(KeyModifiers::CTRL));
        aliases.expect_functional_alias().times(1).returning(|_| None);
        aliases.expect_character_alias().times(1).returning(|_| None);

        let parser = ShortcutParser::new(aliases);
        let first = parser.parse("ctrl+x");
        let second = parser.parse("ctrl+x");
        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(parser.cached_len(), 1);
        assert_eq!(*first, shortcut(KeyModifiers::CTRL, 'x'));
    }

    #[test]
    fn cache_is_keyed_by_exact_spec() {
        let parser = parser();
        parser.parse("ctrl+a");
        parser.parse("CTRL+a");
        parser.parse("ctrl+a");
        assert_eq!(parser.cached_len(), 2);
    }

    #[test]
    fn shifted_key_fallback() {
        let parser = parser();
        let bang = KeyEvent::new('1')
            .with_shifted_key('!')
            .with_mods(KeyModifiers::SHIFT);
        assert!(parser.matches(&bang, "!", KeyEventType::PRESS));
        assert!(parser.matches(&bang, "shift+1", KeyEventType::PRESS));
        assert!(!parser.matches(&bang, "1", KeyEventType::PRESS));

        // The fallback is symmetric: a reported shifted `a` matches `a`.
        let upper_a = KeyEvent::new('A')
            .with_shifted_key('a')
            .with_mods(KeyModifiers::SHIFT);
        assert!(parser.matches(&upper_a, "a", KeyEventType::PRESS));
        assert!(parser.matches(&upper_a, "shift+A", KeyEventType::PRESS));
    }

    #[test]
    fn shifted_fallback_needs_both_shift_and_shifted_key() {
        let parser = parser();
        let unshifted = KeyEvent::new('A').with_shifted_key('a');
        assert!(!parser.matches(&unshifted, "a", KeyEventType::PRESS));

        let no_shifted_key = KeyEvent::new('A').with_mods(KeyModifiers::SHIFT);
        assert!(!parser.matches(&no_shifted_key, "a", KeyEventType::PRESS));
    }

    #[test]
    fn shifted_fallback_keeps_other_modifiers() {
        let parser = parser();
        let event = KeyEvent::new('1')
            .with_shifted_key('!')
            .with_mods(KeyModifiers::SHIFT | KeyModifiers::CTRL);
        assert!(parser.matches(&event, "ctrl+!", KeyEventType::PRESS));
        assert!(!parser.matches(&event, "!", KeyEventType::PRESS));
    }

    #[test]
    fn shifted_fallback_needs_shift() {
        let parser = parser();
        let event = KeyEvent::new('1').with_shifted_key('!');
        assert!(!parser.matches(&event, "!", KeyEventType::PRESS));
    }

    #[test]
    fn locks_are_ignored() {
        let parser = parser();
        let event = KeyEvent::new('x')
            .with_mods(KeyModifiers::CTRL | KeyModifiers::CAPS_LOCK | KeyModifiers::NUM_LOCK);
        assert!(parser.matches(&event, "ctrl+x", KeyEventType::PRESS));
    }

    #[test]
    fn event_type_mask() {
        let parser = parser();
        let press = KeyEvent::new('q').with_mods(KeyModifiers::CTRL);
        let repeat = press.clone().with_type(KeyEventType::REPEAT);
        let release = press.clone().with_type(KeyEventType::RELEASE);

        assert!(!parser.matches_release(&press, "ctrl+q"));
        assert!(parser.matches_release(&release, "ctrl+q"));
        assert!(parser.matches_press_or_repeat(&press, "ctrl+q"));
        assert!(parser.matches_press_or_repeat(&repeat, "ctrl+q"));
        assert!(!parser.matches_press_or_repeat(&release, "ctrl+q"));
        assert!(!parser.matches(&repeat, "ctrl+q", KeyEventType::PRESS));
    }

    #[test]
    fn text_fallbacks() {
        let parser = parser();
        let event = KeyEvent::new('e').with_text("é");
        assert!(parser.matches_case_sensitive_text_or_key(&event, "é"));
        assert!(!parser.matches_case_sensitive_text_or_key(&event, "É"));
        assert!(parser.matches_case_insensitive_text_or_key(&event, "É"));
        assert!(parser.matches_case_sensitive_text_or_key(&event, "e"));
    }

    #[test]
    fn parser_is_shareable_across_threads() {
        let parser = Arc::new(parser());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let parser = Arc::clone(&parser);
                let spec = if i % 2 == 0 { "ctrl+a" } else { "alt+b" };
                std::thread::spawn(move || parser.parse(spec))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(parser.cached_len(), 2);
    }
}
