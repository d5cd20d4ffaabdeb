//! Key event data model.

use crate::tables::FunctionalKey;
use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Press, repeat and release as independent bits, so a caller can match
    /// against a union such as `PRESS | REPEAT`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyEventType: u8 {
        const PRESS = 1;
        const REPEAT = 2;
        const RELEASE = 4;
    }
}

impl Default for KeyEventType {
    fn default() -> Self {
        Self::PRESS
    }
}

impl fmt::Display for KeyEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::PRESS {
            f.write_str("PRESS")
        } else if *self == Self::REPEAT {
            f.write_str("REPEAT")
        } else if *self == Self::RELEASE {
            f.write_str("RELEASE")
        } else {
            write!(f, "KeyEventType:{}", self.bits())
        }
    }
}

bitflags! {
    /// Modifier state as reported on the wire (before the +1 bias).
    ///
    /// `CAPS_LOCK` and `NUM_LOCK` are lock state, not chord modifiers. Use
    /// [`KeyModifiers::without_locks`] before comparing chords.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u16 {
        const SHIFT = 1;
        const ALT = 2;
        const CTRL = 4;
        const SUPER = 8;
        const HYPER = 16;
        const META = 32;
        const CAPS_LOCK = 64;
        const NUM_LOCK = 128;
        /// Set by the shortcut parser for modifier words it does not know.
        /// Never produced by the decoder for well-formed input.
        const UNRECOGNIZED = Self::META.bits() << 8;
    }
}

impl KeyModifiers {
    const LOCKS: Self = Self::CAPS_LOCK.union(Self::NUM_LOCK);

    pub fn without_locks(self) -> Self {
        self.difference(Self::LOCKS)
    }

    pub fn has_caps_lock(self) -> bool {
        self.contains(Self::CAPS_LOCK)
    }
}

impl fmt::Display for KeyModifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(KeyModifiers, &str); 8] = [
            (KeyModifiers::SHIFT, "shift"),
            (KeyModifiers::ALT, "alt"),
            (KeyModifiers::CTRL, "ctrl"),
            (KeyModifiers::SUPER, "super"),
            (KeyModifiers::HYPER, "hyper"),
            (KeyModifiers::META, "meta"),
            (KeyModifiers::CAPS_LOCK, "caps_lock"),
            (KeyModifiers::NUM_LOCK, "num_lock"),
        ];
        let mut first = true;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("+")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// A key identity: either one of the protocol's functional keys or the
/// single character a printable key produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Functional(FunctionalKey),
    Char(char),
}

impl Key {
    pub fn as_functional(self) -> Option<FunctionalKey> {
        match self {
            Key::Functional(key) => Some(key),
            Key::Char(_) => None,
        }
    }
}

impl From<FunctionalKey> for Key {
    fn from(key: FunctionalKey) -> Self {
        Key::Functional(key)
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Key::Char(c)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Functional(key) => f.write_str(key.name()),
            Key::Char(c) => write!(f, "{c}"),
        }
    }
}

/// A decoded (or synthesized) keyboard event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyEvent {
    pub event_type: KeyEventType,
    pub mods: KeyModifiers,
    /// Primary key. `None` only for key number 0.
    pub key: Option<Key>,
    /// The key's value with shift held, when the terminal reports it.
    pub shifted_key: Option<Key>,
    /// The key at the same position in the base layout, when reported.
    pub alternate_key: Option<Key>,
    /// Text the key would produce; empty when not reported.
    pub text: String,
    /// Free for consumers to mark the event as dealt with.
    pub handled: bool,
    /// Payload this event was decoded from. Empty when synthesized.
    pub csi: String,
}

impl KeyEvent {
    /// A synthesized press of `key` with no modifiers.
    pub fn new(key: impl Into<Key>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn with_mods(mut self, mods: KeyModifiers) -> Self {
        self.mods = mods;
        self
    }

    pub fn with_type(mut self, event_type: KeyEventType) -> Self {
        self.event_type = event_type;
        self
    }

    pub fn with_shifted_key(mut self, key: impl Into<Key>) -> Self {
        self.shifted_key = Some(key.into());
        self
    }

    pub fn with_alternate_key(mut self, key: impl Into<Key>) -> Self {
        self.alternate_key = Some(key.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn has_caps_lock(&self) -> bool {
        self.mods.has_caps_lock()
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{ ", self.event_type)?;
        if !self.mods.difference(KeyModifiers::UNRECOGNIZED).is_empty() {
            write!(f, "{}+", self.mods)?;
        }
        if let Some(key) = self.key {
            write!(f, "{key}")?;
        }
        f.write_str(" ")?;
        if !self.text.is_empty() {
            write!(f, "Text: {} ", self.text)?;
        }
        if let Some(key) = self.shifted_key {
            write!(f, "ShiftedKey: {key} ")?;
        }
        if let Some(key) = self.alternate_key {
            write!(f, "AlternateKey: {key} ")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_defaults_to_press() {
        assert_eq!(KeyEventType::default(), KeyEventType::PRESS);
        assert_eq!(KeyEvent::default().event_type, KeyEventType::PRESS);
    }

    #[test]
    fn event_type_display() {
        assert_eq!(KeyEventType::PRESS.to_string(), "PRESS");
        assert_eq!(KeyEventType::RELEASE.to_string(), "RELEASE");
        assert_eq!(
            (KeyEventType::PRESS | KeyEventType::REPEAT).to_string(),
            "KeyEventType:3"
        );
    }

    #[test]
    fn unrecognized_bit_sits_above_the_wire_modifiers() {
        assert_eq!(KeyModifiers::UNRECOGNIZED.bits(), 8192);
        assert!(!KeyModifiers::from_bits_retain(255).contains(KeyModifiers::UNRECOGNIZED));
    }

    #[test]
    fn without_locks_strips_only_locks() {
        let mods = KeyModifiers::CTRL | KeyModifiers::CAPS_LOCK | KeyModifiers::NUM_LOCK;
        assert_eq!(mods.without_locks(), KeyModifiers::CTRL);
        assert!(mods.has_caps_lock());
        assert!(!mods.without_locks().has_caps_lock());
    }

    #[test]
    fn modifiers_display_in_wire_order() {
        let mods = KeyModifiers::CTRL | KeyModifiers::SHIFT | KeyModifiers::NUM_LOCK;
        assert_eq!(mods.to_string(), "shift+ctrl+num_lock");
        assert_eq!(KeyModifiers::empty().to_string(), "");
    }

    #[test]
    fn key_display() {
        assert_eq!(Key::from(FunctionalKey::PageUp).to_string(), "PAGE_UP");
        assert_eq!(Key::from('x').to_string(), "x");
    }

    #[test]
    fn event_display() {
        let event = KeyEvent::new('a')
            .with_mods(KeyModifiers::CTRL)
            .with_shifted_key('A')
            .with_text("a");
        assert_eq!(event.to_string(), "PRESS{ ctrl+a Text: a ShiftedKey: A }");

        let release = KeyEvent::new(FunctionalKey::Escape).with_type(KeyEventType::RELEASE);
        assert_eq!(release.to_string(), "RELEASE{ ESCAPE }");
    }

    #[test]
    fn synthesized_events_have_no_payload() {
        let event = KeyEvent::new(FunctionalKey::Enter);
        assert!(event.csi.is_empty());
        assert!(!event.handled);
    }
}
