//! Static protocol tables.
//!
//! The functional key set is fixed by the protocol: every named, non-printable
//! key has a number in the private use area starting at 57344. A handful of keys
//! also have a shorter legacy CSI number (`2~` for Insert, `11~` for F1, ...) or
//! are sent with a single letter trailer (`A` for Up, `H` for Home, ...).
//!
//! [`ProtocolTables`] holds these associations plus their inverses. Build one
//! with [`ProtocolTables::new`] or borrow the process-wide instance from
//! [`ProtocolTables::global`].

use collections::{FxHashMap, FxHashSet};
use once_cell::sync::Lazy;

macro_rules! functional_keys {
    ($($variant:ident = $code:literal => $name:literal,)+) => {
        /// A named key with a fixed number in the protocol.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u32)]
        pub enum FunctionalKey {
            $($variant = $code,)+
        }

        impl FunctionalKey {
            /// Every functional key, in protocol number order.
            pub const ALL: &'static [FunctionalKey] = &[$(FunctionalKey::$variant,)+];

            /// Protocol number of this key (57344 and up).
            pub const fn code(self) -> u32 {
                self as u32
            }

            /// Canonical upper-case name, e.g. `PAGE_UP`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(FunctionalKey::$variant => $name,)+
                }
            }

            pub const fn from_code(code: u32) -> Option<Self> {
                match code {
                    $($code => Some(FunctionalKey::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

functional_keys! {
    Escape = 57344 => "ESCAPE",
    Enter = 57345 => "ENTER",
    Tab = 57346 => "TAB",
    Backspace = 57347 => "BACKSPACE",
    Insert = 57348 => "INSERT",
    Delete = 57349 => "DELETE",
    Left = 57350 => "LEFT",
    Right = 57351 => "RIGHT",
    Up = 57352 => "UP",
    Down = 57353 => "DOWN",
    PageUp = 57354 => "PAGE_UP",
    PageDown = 57355 => "PAGE_DOWN",
    Home = 57356 => "HOME",
    End = 57357 => "END",
    CapsLock = 57358 => "CAPS_LOCK",
    ScrollLock = 57359 => "SCROLL_LOCK",
    NumLock = 57360 => "NUM_LOCK",
    PrintScreen = 57361 => "PRINT_SCREEN",
    Pause = 57362 => "PAUSE",
    Menu = 57363 => "MENU",
    F1 = 57364 => "F1",
    F2 = 57365 => "F2",
    F3 = 57366 => "F3",
    F4 = 57367 => "F4",
    F5 = 57368 => "F5",
    F6 = 57369 => "F6",
    F7 = 57370 => "F7",
    F8 = 57371 => "F8",
    F9 = 57372 => "F9",
    F10 = 57373 => "F10",
    F11 = 57374 => "F11",
    F12 = 57375 => "F12",
    F13 = 57376 => "F13",
    F14 = 57377 => "F14",
    F15 = 57378 => "F15",
    F16 = 57379 => "F16",
    F17 = 57380 => "F17",
    F18 = 57381 => "F18",
    F19 = 57382 => "F19",
    F20 = 57383 => "F20",
    F21 = 57384 => "F21",
    F22 = 57385 => "F22",
    F23 = 57386 => "F23",
    F24 = 57387 => "F24",
    F25 = 57388 => "F25",
    F26 = 57389 => "F26",
    F27 = 57390 => "F27",
    F28 = 57391 => "F28",
    F29 = 57392 => "F29",
    F30 = 57393 => "F30",
    F31 = 57394 => "F31",
    F32 = 57395 => "F32",
    F33 = 57396 => "F33",
    F34 = 57397 => "F34",
    F35 = 57398 => "F35",
    Kp0 = 57399 => "KP_0",
    Kp1 = 57400 => "KP_1",
    Kp2 = 57401 => "KP_2",
    Kp3 = 57402 => "KP_3",
    Kp4 = 57403 => "KP_4",
    Kp5 = 57404 => "KP_5",
    Kp6 = 57405 => "KP_6",
    Kp7 = 57406 => "KP_7",
    Kp8 = 57407 => "KP_8",
    Kp9 = 57408 => "KP_9",
    KpDecimal = 57409 => "KP_DECIMAL",
    KpDivide = 57410 => "KP_DIVIDE",
    KpMultiply = 57411 => "KP_MULTIPLY",
    KpSubtract = 57412 => "KP_SUBTRACT",
    KpAdd = 57413 => "KP_ADD",
    KpEnter = 57414 => "KP_ENTER",
    KpEqual = 57415 => "KP_EQUAL",
    KpSeparator = 57416 => "KP_SEPARATOR",
    KpLeft = 57417 => "KP_LEFT",
    KpRight = 57418 => "KP_RIGHT",
    KpUp = 57419 => "KP_UP",
    KpDown = 57420 => "KP_DOWN",
    KpPageUp = 57421 => "KP_PAGE_UP",
    KpPageDown = 57422 => "KP_PAGE_DOWN",
    KpHome = 57423 => "KP_HOME",
    KpEnd = 57424 => "KP_END",
    KpInsert = 57425 => "KP_INSERT",
    KpDelete = 57426 => "KP_DELETE",
    KpBegin = 57427 => "KP_BEGIN",
    MediaPlay = 57428 => "MEDIA_PLAY",
    MediaPause = 57429 => "MEDIA_PAUSE",
    MediaPlayPause = 57430 => "MEDIA_PLAY_PAUSE",
    MediaReverse = 57431 => "MEDIA_REVERSE",
    MediaStop = 57432 => "MEDIA_STOP",
    MediaFastForward = 57433 => "MEDIA_FAST_FORWARD",
    MediaRewind = 57434 => "MEDIA_REWIND",
    MediaTrackNext = 57435 => "MEDIA_TRACK_NEXT",
    MediaTrackPrevious = 57436 => "MEDIA_TRACK_PREVIOUS",
    MediaRecord = 57437 => "MEDIA_RECORD",
    LowerVolume = 57438 => "LOWER_VOLUME",
    RaiseVolume = 57439 => "RAISE_VOLUME",
    MuteVolume = 57440 => "MUTE_VOLUME",
    LeftShift = 57441 => "LEFT_SHIFT",
    LeftControl = 57442 => "LEFT_CONTROL",
    LeftAlt = 57443 => "LEFT_ALT",
    LeftSuper = 57444 => "LEFT_SUPER",
    LeftHyper = 57445 => "LEFT_HYPER",
    LeftMeta = 57446 => "LEFT_META",
    RightShift = 57447 => "RIGHT_SHIFT",
    RightControl = 57448 => "RIGHT_CONTROL",
    RightAlt = 57449 => "RIGHT_ALT",
    RightSuper = 57450 => "RIGHT_SUPER",
    RightHyper = 57451 => "RIGHT_HYPER",
    RightMeta = 57452 => "RIGHT_META",
    IsoLevel3Shift = 57453 => "ISO_LEVEL3_SHIFT",
    IsoLevel5Shift = 57454 => "ISO_LEVEL5_SHIFT",
}

impl std::fmt::Display for FunctionalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Legacy CSI numbers that stand in for a functional key.
const LEGACY_CSI_NUMBERS: &[(u32, FunctionalKey)] = &[
    (2, FunctionalKey::Insert),
    (3, FunctionalKey::Delete),
    (5, FunctionalKey::PageUp),
    (6, FunctionalKey::PageDown),
    (7, FunctionalKey::Home),
    (8, FunctionalKey::End),
    (9, FunctionalKey::Tab),
    (11, FunctionalKey::F1),
    (12, FunctionalKey::F2),
    (13, FunctionalKey::Enter),
    (14, FunctionalKey::F4),
    (15, FunctionalKey::F5),
    (17, FunctionalKey::F6),
    (18, FunctionalKey::F7),
    (19, FunctionalKey::F8),
    (20, FunctionalKey::F9),
    (21, FunctionalKey::F10),
    (23, FunctionalKey::F11),
    (24, FunctionalKey::F12),
    (27, FunctionalKey::Escape),
    (127, FunctionalKey::Backspace),
];

/// Letter trailers and the CSI number each one stands for. The number is
/// either a functional key number or a legacy CSI number.
const LETTER_TRAILERS: &[(char, u32)] = &[
    ('A', FunctionalKey::Up.code()),
    ('B', FunctionalKey::Down.code()),
    ('C', FunctionalKey::Right.code()),
    ('D', FunctionalKey::Left.code()),
    ('E', FunctionalKey::KpBegin.code()),
    ('F', 8),
    ('H', 7),
    ('P', 11),
    ('Q', 12),
    ('S', 14),
];

/// Keys serialized with a `~` trailer instead of `u`.
const TILDE_TRAILER_KEYS: &[FunctionalKey] = &[
    FunctionalKey::Insert,
    FunctionalKey::Delete,
    FunctionalKey::PageUp,
    FunctionalKey::PageDown,
    FunctionalKey::F3,
    FunctionalKey::F5,
    FunctionalKey::F6,
    FunctionalKey::F7,
    FunctionalKey::F8,
    FunctionalKey::F9,
    FunctionalKey::F10,
    FunctionalKey::F11,
    FunctionalKey::F12,
];

static GLOBAL: Lazy<ProtocolTables> = Lazy::new(ProtocolTables::new);

/// Lookup tables for the wire protocol, including the inverse maps derived
/// from the fixed associations.
#[derive(Debug, Clone)]
pub struct ProtocolTables {
    name_to_functional: FxHashMap<&'static str, FunctionalKey>,
    legacy_to_functional: FxHashMap<u32, FunctionalKey>,
    functional_to_legacy: FxHashMap<FunctionalKey, u32>,
    letter_to_number: FxHashMap<char, u32>,
    number_to_letter: FxHashMap<u32, char>,
    tilde_keys: FxHashSet<FunctionalKey>,
}

impl ProtocolTables {
    pub fn new() -> Self {
        let name_to_functional: FxHashMap<_, _> = FunctionalKey::ALL
            .iter()
            .map(|&key| (key.name(), key))
            .collect();

        let legacy_to_functional: FxHashMap<_, _> = LEGACY_CSI_NUMBERS.iter().copied().collect();
        let mut functional_to_legacy = FxHashMap::default();
        for &(number, key) in LEGACY_CSI_NUMBERS {
            if functional_to_legacy.insert(key, number).is_some() {
                util::debug_panic!("functional key {key} has more than one legacy CSI number");
            }
        }

        let letter_to_number: FxHashMap<_, _> = LETTER_TRAILERS.iter().copied().collect();
        let mut number_to_letter = FxHashMap::default();
        for &(letter, number) in LETTER_TRAILERS {
            if number_to_letter.insert(number, letter).is_some() {
                util::debug_panic!("CSI number {number} has more than one letter trailer");
            }
        }

        Self {
            name_to_functional,
            legacy_to_functional,
            functional_to_legacy,
            letter_to_number,
            number_to_letter,
            tilde_keys: TILDE_TRAILER_KEYS.iter().copied().collect(),
        }
    }

    /// Shared instance, built on first use.
    pub fn global() -> &'static ProtocolTables {
        &GLOBAL
    }

    /// Look up a functional key by its canonical upper-case name.
    pub fn functional_by_name(&self, name: &str) -> Option<FunctionalKey> {
        self.name_to_functional.get(name).copied()
    }

    pub fn functional_for_legacy(&self, number: u32) -> Option<FunctionalKey> {
        self.legacy_to_functional.get(&number).copied()
    }

    pub fn legacy_for_functional(&self, key: FunctionalKey) -> Option<u32> {
        self.functional_to_legacy.get(&key).copied()
    }

    pub fn number_for_letter(&self, letter: char) -> Option<u32> {
        self.letter_to_number.get(&letter).copied()
    }

    pub fn letter_for_number(&self, number: u32) -> Option<char> {
        self.number_to_letter.get(&number).copied()
    }

    /// Whether `key` is serialized with a `~` trailer.
    pub fn uses_tilde(&self, key: FunctionalKey) -> bool {
        self.tilde_keys.contains(&key)
    }
}

impl Default for ProtocolTables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn functional_range_is_contiguous() {
        assert_eq!(FunctionalKey::ALL.len(), 111);
        for (offset, key) in FunctionalKey::ALL.iter().enumerate() {
            assert_eq!(key.code(), 57344 + offset as u32, "gap before {key}");
        }
    }

    #[test]
    fn from_code_inverts_code() {
        for &key in FunctionalKey::ALL {
            assert_eq!(FunctionalKey::from_code(key.code()), Some(key));
        }
        assert_eq!(FunctionalKey::from_code(57343), None);
        assert_eq!(FunctionalKey::from_code(57455), None);
    }

    #[test]
    fn names_resolve_back_to_keys() {
        let tables = ProtocolTables::new();
        for &key in FunctionalKey::ALL {
            assert_eq!(tables.functional_by_name(key.name()), Some(key));
        }
        assert_eq!(tables.functional_by_name("page_up"), None);
        assert_eq!(tables.functional_by_name("NOPE"), None);
    }

    #[test_case(2, FunctionalKey::Insert ; "insert")]
    #[test_case(3, FunctionalKey::Delete ; "delete")]
    #[test_case(11, FunctionalKey::F1 ; "f1")]
    #[test_case(13, FunctionalKey::Enter ; "enter")]
    #[test_case(24, FunctionalKey::F12 ; "f12")]
    #[test_case(27, FunctionalKey::Escape ; "escape")]
    #[test_case(127, FunctionalKey::Backspace ; "backspace")]
    fn legacy_numbers_map_both_ways(number: u32, key: FunctionalKey) {
        let tables = ProtocolTables::new();
        assert_eq!(tables.functional_for_legacy(number), Some(key));
        assert_eq!(tables.legacy_for_functional(key), Some(number));
    }

    #[test]
    fn keys_without_legacy_number() {
        let tables = ProtocolTables::new();
        assert_eq!(tables.legacy_for_functional(FunctionalKey::F3), None);
        assert_eq!(tables.legacy_for_functional(FunctionalKey::Up), None);
        assert_eq!(tables.functional_for_legacy(16), None);
    }

    #[test_case('A', 57352 ; "up")]
    #[test_case('D', 57350 ; "left")]
    #[test_case('E', 57427 ; "keypad begin")]
    #[test_case('F', 8 ; "end")]
    #[test_case('H', 7 ; "home")]
    #[test_case('S', 14 ; "f4")]
    fn letter_trailers_map_both_ways(letter: char, number: u32) {
        let tables = ProtocolTables::new();
        assert_eq!(tables.number_for_letter(letter), Some(number));
        assert_eq!(tables.letter_for_number(number), Some(letter));
    }

    #[test]
    fn r_is_not_a_letter_trailer() {
        assert_eq!(ProtocolTables::new().number_for_letter('R'), None);
    }

    #[test]
    fn tilde_set() {
        let tables = ProtocolTables::global();
        assert!(tables.uses_tilde(FunctionalKey::Insert));
        assert!(tables.uses_tilde(FunctionalKey::F3));
        assert!(tables.uses_tilde(FunctionalKey::F12));
        assert!(!tables.uses_tilde(FunctionalKey::F1));
        assert!(!tables.uses_tilde(FunctionalKey::F13));
        assert!(!tables.uses_tilde(FunctionalKey::Home));
    }
}
