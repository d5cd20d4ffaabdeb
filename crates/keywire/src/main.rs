//! keywire - inspect kitty keyboard protocol traffic from the command line.
//!
//! Decodes CSI payloads, encodes shortcuts into payloads, and checks payloads
//! against shortcuts and configured keybindings.

use anyhow::{bail, Context, Result};
use key_encoding::{KeyEvent, KeyEventType, ParsedShortcut, ShortcutKey, ShortcutParser};
use settings::{Config, ConfiguredAliases};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Check if debug mode is enabled via environment variable.
fn is_debug_mode() -> bool {
    std::env::var("KEYWIRE_DEBUG").is_ok()
}

/// Initialize the logging system. Logs go to stderr so stdout stays pipeable.
fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_filter = if is_debug_mode() {
        "keywire=trace,key_encoding=trace,settings=trace,info"
    } else {
        "keywire=info,warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();

    if is_debug_mode() {
        debug!("keywire v{} (DEBUG MODE ENABLED)", env!("CARGO_PKG_VERSION"));
        debug!("Set RUST_LOG for custom log levels, e.g. RUST_LOG=key_encoding=trace");
    }
}

#[derive(Debug, PartialEq)]
enum Command {
    Decode(Vec<String>),
    Encode {
        spec: String,
        event_type: KeyEventType,
        text: Option<String>,
    },
    Match {
        payload: String,
        specs: Vec<String>,
    },
    Action(Vec<String>),
    InitConfig,
    Help,
}

#[derive(Debug, PartialEq)]
struct Cli {
    config: Option<PathBuf>,
    command: Command,
}

fn parse_args(args: &[String]) -> Result<Cli> {
    let mut args = args;
    let mut config = None;
    if args.first().map(String::as_str) == Some("--config") {
        let path = args.get(1).context("--config needs a path")?;
        config = Some(PathBuf::from(path));
        args = &args[2..];
    }

    let rest = args.get(1..).unwrap_or_default();
    let command = match args.first().map(String::as_str) {
        Some("decode") if !rest.is_empty() => Command::Decode(rest.to_vec()),
        Some("encode") => {
            let spec = rest.first().context("Usage: keywire encode <shortcut>")?;
            let mut event_type = KeyEventType::PRESS;
            let mut text = None;
            let mut options = rest[1..].iter();
            while let Some(option) = options.next() {
                match option.as_str() {
                    "press" => event_type = KeyEventType::PRESS,
                    "repeat" => event_type = KeyEventType::REPEAT,
                    "release" => event_type = KeyEventType::RELEASE,
                    "--text" => {
                        let value = options.next().context("--text needs a value")?;
                        text = Some(value.clone());
                    }
                    other => bail!("Unknown encode option: {other}"),
                }
            }
            Command::Encode {
                spec: spec.clone(),
                event_type,
                text,
            }
        }
        Some("match") if rest.len() >= 2 => Command::Match {
            payload: rest[0].clone(),
            specs: rest[1..].to_vec(),
        },
        Some("action") if !rest.is_empty() => Command::Action(rest.to_vec()),
        Some("init-config") => Command::InitConfig,
        Some("help" | "--help" | "-h") | None => Command::Help,
        Some(cmd) => bail!("Unknown command or missing arguments: {cmd}"),
    };

    Ok(Cli { config, command })
}

/// Accept payloads with or without the `ESC [` introducer, written either
/// raw or as a `\e[` / `\x1b[` escape.
fn strip_introducer(payload: &str) -> &str {
    ["\x1b[", "\\e[", "\\x1b[", "\\033["]
        .iter()
        .find_map(|prefix| payload.strip_prefix(prefix))
        .unwrap_or(payload)
}

fn decode(payload: &str) -> Result<KeyEvent> {
    KeyEvent::from_csi(strip_introducer(payload))
        .with_context(|| format!("{payload:?} is not a keyboard event"))
}

fn event_for_shortcut(parsed: &ParsedShortcut, event_type: KeyEventType) -> Result<KeyEvent> {
    if parsed.has_unrecognized_modifiers() {
        bail!("{parsed} uses an unknown modifier");
    }
    let ShortcutKey::Key(key) = &parsed.key else {
        bail!("{parsed:?} does not name a key");
    };
    Ok(KeyEvent::new(*key).with_mods(parsed.mods).with_type(event_type))
}

fn load(config: Option<&PathBuf>) -> Config {
    match config {
        Some(path) => settings::load_config_from(path),
        None => settings::load_config(),
    }
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let config = load(cli.config.as_ref());
    let parser = ShortcutParser::new(config.aliases());
    for binding in config.unusable_keybindings(&parser) {
        warn!(
            "Keybinding {:?} for {:?} can never match",
            binding.keys, binding.action
        );
    }

    match cli.command {
        Command::Decode(payloads) => {
            for payload in &payloads {
                let event = decode(payload)?;
                writeln!(out, "{event}")?;
            }
        }
        Command::Encode {
            spec,
            event_type,
            text,
        } => {
            let mut event = event_for_shortcut(&parser.parse(&spec), event_type)?;
            if let Some(text) = text {
                event = event.with_text(text);
            }
            writeln!(out, "{}", event.as_csi())?;
        }
        Command::Match { payload, specs } => {
            let event = decode(&payload)?;
            for spec in &specs {
                let verdict = if parser.matches(&event, spec, KeyEventType::all()) {
                    "match"
                } else {
                    "no match"
                };
                writeln!(out, "{spec}: {verdict}")?;
            }
        }
        Command::Action(payloads) => {
            for payload in &payloads {
                let event = decode(payload)?;
                writeln!(out, "{}", action_line(&config, &parser, &event))?;
            }
        }
        Command::InitConfig => {
            let path = settings::ensure_config_file()
                .context("Could not create config file in the config directory")?;
            info!("Config file: {:?}", path);
            writeln!(out, "{}", path.display())?;
        }
        Command::Help => print_help(out)?,
    }
    Ok(())
}

fn action_line(
    config: &Config,
    parser: &ShortcutParser<ConfiguredAliases>,
    event: &KeyEvent,
) -> String {
    match config.action_for(parser, event) {
        Some(action) => action.to_string(),
        None => "-".to_string(),
    }
}

fn print_help(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "keywire v{}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out)?;
    writeln!(out, "USAGE:")?;
    writeln!(out, "    keywire [--config <path>] <COMMAND>")?;
    writeln!(out)?;
    writeln!(out, "COMMANDS:")?;
    writeln!(out, "    decode <payload>...             Print the key event in each payload")?;
    writeln!(out, "    encode <shortcut> [press|repeat|release] [--text <text>]")?;
    writeln!(out, "                                    Print the CSI payload for a shortcut")?;
    writeln!(out, "    match <payload> <shortcut>...   Check a payload against shortcuts")?;
    writeln!(out, "    action <payload>...             Print the configured action")?;
    writeln!(out, "    init-config                     Write a default config file")
}

fn main() -> Result<()> {
    init_logging();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;
    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}
