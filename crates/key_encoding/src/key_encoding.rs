//! Kitty keyboard protocol codec.
//!
//! Decodes CSI key payloads into [`KeyEvent`]s, encodes events back into
//! payloads, and matches events against human-written shortcuts such as
//! `ctrl+shift+a`. Framing (cutting payloads out of the terminal byte
//! stream) is the caller's job.
//!
//! ```ignore
//! let event = KeyEvent::from_csi("97;5u").unwrap();
//! let parser = ShortcutParser::new(BuiltinAliases::new());
//! assert!(parser.matches_press_or_repeat(&event, "ctrl+a"));
//! assert_eq!(event.as_csi(), "97;5u");
//! ```

mod aliases;
mod decode;
mod encode;
mod event;
mod shortcut;
mod tables;

pub use aliases::{BuiltinAliases, ShortcutAliases};
pub use event::{Key, KeyEvent, KeyEventType, KeyModifiers};
pub use shortcut::{ParsedShortcut, ShortcutKey, ShortcutParser};
pub use tables::{FunctionalKey, ProtocolTables};
