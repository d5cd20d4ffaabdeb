//! CSI payload decoding.
//!
//! A payload is everything after `ESC [`, final byte included:
//!
//! ```text
//! key[:shifted[:alternate]][;modbias[:action]][;text[:text...]]trailer
//! ```
//!
//! Decoding never fails loudly. Anything that cannot be a keyboard event
//! yields `None`, and an unknown key number is taken as a Unicode code point.

use crate::event::{Key, KeyEvent, KeyEventType, KeyModifiers};
use crate::tables::{FunctionalKey, ProtocolTables};
use smallvec::SmallVec;

/// Final bytes that can end a keyboard payload.
const KEYBOARD_TRAILERS: &str = "u~ABCDEHFPQRS";

/// Bracketed paste start/end markers. They end in `~` but are not keys.
const PASTE_MARKERS: [&str; 2] = ["200~", "201~"];

type Numbers = SmallVec<[u32; 4]>;

impl ProtocolTables {
    /// Decode a CSI payload into a key event.
    pub fn decode(&self, csi: &str) -> Option<KeyEvent> {
        let trailer = csi.chars().next_back()?;
        if !KEYBOARD_TRAILERS.contains(trailer) || PASTE_MARKERS.contains(&csi) {
            tracing::trace!("not a keyboard payload: {:?}", csi);
            return None;
        }

        let body = &csi[..csi.len() - trailer.len_utf8()];
        let mut sections = body.split(';');
        let first = match sections.next() {
            Some(section) => parse_section(section, 0)?,
            None => Numbers::new(),
        };
        let second = match sections.next() {
            Some(section) => parse_section(section, 1)?,
            None => Numbers::new(),
        };
        let third = match sections.next() {
            Some(section) => parse_section(section, 0)?,
            None => Numbers::new(),
        };

        let number = match self.number_for_letter(trailer) {
            Some(number) => number,
            None => first.first().copied().unwrap_or(0),
        };

        let mut event = KeyEvent {
            key: self.key_for_number(number, trailer),
            shifted_key: first
                .get(1)
                .and_then(|&n| self.key_for_number(n, trailer)),
            alternate_key: first
                .get(2)
                .and_then(|&n| self.key_for_number(n, trailer)),
            csi: csi.to_string(),
            ..KeyEvent::default()
        };

        if let Some(&bias) = second.first() {
            // Truncation keeps the low 16 bits; a zero bias reads as no modifiers.
            event.mods = KeyModifiers::from_bits_retain(bias.saturating_sub(1) as u16);
        }
        event.event_type = match second.get(1) {
            Some(2) => KeyEventType::REPEAT,
            Some(3) => KeyEventType::RELEASE,
            _ => KeyEventType::PRESS,
        };
        event.text = third.iter().map(|&cp| code_point_char(cp)).collect();

        Some(event)
    }

    /// Resolve a wire key number to a key. `13` is Enter with a `u` trailer
    /// and F3 otherwise; both terminals and the protocol use it for each.
    pub(crate) fn key_for_number(&self, number: u32, trailer: char) -> Option<Key> {
        match number {
            0 => None,
            13 if trailer == 'u' => Some(Key::Functional(FunctionalKey::Enter)),
            13 => Some(Key::Functional(FunctionalKey::F3)),
            _ => {
                let number = self
                    .functional_for_legacy(number)
                    .map_or(number, FunctionalKey::code);
                Some(match FunctionalKey::from_code(number) {
                    Some(key) => Key::Functional(key),
                    None => Key::Char(code_point_char(number)),
                })
            }
        }
    }
}

impl KeyEvent {
    /// Decode a CSI payload with the shared protocol tables.
    pub fn from_csi(csi: &str) -> Option<Self> {
        ProtocolTables::global().decode(csi)
    }
}

/// Split a `;` section on `:`. Empty parts take `missing`; anything that is
/// not a plain decimal number rejects the whole payload.
fn parse_section(section: &str, missing: u32) -> Option<Numbers> {
    section
        .split(':')
        .map(|part| {
            if part.is_empty() {
                Some(missing)
            } else if part.bytes().all(|b| b.is_ascii_digit()) {
                part.parse().ok()
            } else {
                None
            }
        })
        .collect()
}

fn code_point_char(cp: u32) -> char {
    char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER)
}
