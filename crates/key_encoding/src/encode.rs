//! CSI payload encoding.
//!
//! Produces the shortest payload that decodes back to an equivalent event.
//! Sections at their default value are left out, except that a letter
//! trailer needs a placeholder key number of `1` once anything follows it.

use crate::event::{Key, KeyEvent, KeyEventType};
use crate::tables::{FunctionalKey, ProtocolTables};
use std::fmt::Write;

impl ProtocolTables {
    /// Encode `event` as a CSI payload (without the `ESC [` introducer).
    pub fn encode(&self, event: &KeyEvent) -> String {
        let key = self.csi_number(event.key);
        let shifted_key = self.csi_number(event.shifted_key);
        let alternate_key = self.csi_number(event.alternate_key);
        let functional = event.key.and_then(Key::as_functional);

        let trailer = match functional {
            Some(key) if self.uses_tilde(key) => '~',
            Some(FunctionalKey::Enter) | None => 'u',
            Some(_) => self.letter_for_number(key).unwrap_or('u'),
        };

        let action = if event.event_type == KeyEventType::REPEAT {
            2
        } else if event.event_type == KeyEventType::RELEASE {
            3
        } else {
            1
        };
        let has_alternates = shifted_key != 0 || alternate_key != 0;
        let has_text = !event.text.is_empty();
        let has_mods_section = !event.mods.is_empty() || action > 1;

        let mut result = String::with_capacity(32);
        if trailer.is_ascii_uppercase() {
            if has_alternates || has_mods_section || has_text {
                result.push('1');
            }
        } else {
            let _ = write!(result, "{key}");
        }

        if has_alternates {
            result.push(':');
            if shifted_key != 0 {
                let _ = write!(result, "{shifted_key}");
            }
            if alternate_key != 0 {
                let _ = write!(result, ":{alternate_key}");
            }
        }

        if has_mods_section {
            let _ = write!(result, ";{}", u32::from(event.mods.bits()) + 1);
            if action > 1 {
                let _ = write!(result, ":{action}");
            }
        } else if has_text {
            result.push(';');
        }

        if has_text {
            result.push(';');
            for (i, c) in event.text.chars().enumerate() {
                if i > 0 {
                    result.push(':');
                }
                let _ = write!(result, "{}", u32::from(c));
            }
        }

        result.push(trailer);
        result
    }

    /// Wire number for a key: the legacy CSI number when one exists, the
    /// functional number otherwise, or the code point of a character key.
    fn csi_number(&self, key: Option<Key>) -> u32 {
        match key {
            None => 0,
            Some(Key::Functional(FunctionalKey::Enter | FunctionalKey::F3)) => 13,
            Some(Key::Functional(key)) => self.legacy_for_functional(key).unwrap_or(key.code()),
            Some(Key::Char(c)) => u32::from(c),
        }
    }
}

impl KeyEvent {
    /// Encode with the shared protocol tables.
    pub fn as_csi(&self) -> String {
        ProtocolTables::global().encode(self)
    }

    /// The full escape sequence, `ESC [` followed by the payload.
    pub fn as_escape_sequence(&self) -> String {
        format!("\x1b[{}", self.as_csi())
    }
}
