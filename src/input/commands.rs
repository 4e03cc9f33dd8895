//! Reader commands and their names
//!
//! Commands arrive as text lines. Each command has a long name and a short
//! alias; arguments follow separated by whitespace.

use crate::{ChantError, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Command name without its arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Start,
    Stop,
    Toggle,
    Next,
    Prev,
    Goto,
    Click,
    Speed,
    Voice,
    Voices,
    Status,
    Help,
    Quit,
}

/// A parsed command with its arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Start continuous reading at the top of the current page
    Start,
    /// Stop reading
    Stop,
    /// Start or stop
    Toggle,
    NextPage,
    PrevPage,
    /// Jump to a page, 0-based (typed 1-based)
    GoTo(usize),
    /// Pointer click in display coordinates
    Click(f32, f32),
    /// Reading speed in words per minute
    Speed(u32),
    /// Select a voice by id or name
    Voice(String),
    /// List available voices
    Voices,
    Status,
    Help,
    Quit,
}

/// Command names and aliases
pub static COMMANDS: Lazy<HashMap<&'static str, CommandKind>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // Playback
    map.insert("start", CommandKind::Start);
    map.insert("s", CommandKind::Start);
    map.insert("stop", CommandKind::Stop);
    map.insert("x", CommandKind::Stop);
    map.insert("toggle", CommandKind::Toggle);
    map.insert("t", CommandKind::Toggle);

    // Pages
    map.insert("next", CommandKind::Next);
    map.insert("n", CommandKind::Next);
    map.insert("prev", CommandKind::Prev);
    map.insert("p", CommandKind::Prev);
    map.insert("goto", CommandKind::Goto);
    map.insert("g", CommandKind::Goto);

    // Pointer
    map.insert("click", CommandKind::Click);
    map.insert("c", CommandKind::Click);

    // Settings
    map.insert("speed", CommandKind::Speed);
    map.insert("w", CommandKind::Speed);
    map.insert("voice", CommandKind::Voice);
    map.insert("v", CommandKind::Voice);
    map.insert("voices", CommandKind::Voices);

    map.insert("status", CommandKind::Status);
    map.insert("help", CommandKind::Help);
    map.insert("h", CommandKind::Help);
    map.insert("?", CommandKind::Help);
    map.insert("quit", CommandKind::Quit);
    map.insert("q", CommandKind::Quit);

    map
});

/// One-line summaries for the `help` command
pub const HELP: &[&str] = &[
    "start|s            read from the top of the page",
    "stop|x             stop reading",
    "toggle|t|<enter>   start or stop",
    "next|n, prev|p     turn the page",
    "goto|g <page>      jump to a page (first page is 1)",
    "click|c <x> <y>    jump to the word at a display point",
    "speed|w <wpm>      set reading speed",
    "voice|v <id>       select a voice",
    "voices             list voices",
    "status             show position and speed",
    "quit|q             exit",
];

fn malformed(message: impl Into<String>) -> ChantError {
    ChantError::MalformedInput(message.into())
}

fn arg<'a>(args: &[&'a str], index: usize, what: &str) -> Result<&'a str> {
    args.get(index)
        .copied()
        .ok_or_else(|| malformed(format!("missing {}", what)))
}

fn number<T: std::str::FromStr>(text: &str, what: &str) -> Result<T> {
    text.parse()
        .map_err(|_| malformed(format!("{} is not a valid {}", text, what)))
}

/// Parse one input line
///
/// A blank line toggles reading. Page numbers are typed 1-based and
/// returned 0-based.
pub fn parse_command(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(Command::Toggle);
    };
    let args: Vec<&str> = words.collect();

    let kind = COMMANDS
        .get(name.to_lowercase().as_str())
        .copied()
        .ok_or_else(|| malformed(format!("unknown command '{}'", name)))?;

    let command = match kind {
        CommandKind::Start => Command::Start,
        CommandKind::Stop => Command::Stop,
        CommandKind::Toggle => Command::Toggle,
        CommandKind::Next => Command::NextPage,
        CommandKind::Prev => Command::PrevPage,
        CommandKind::Goto => {
            let page: usize = number(arg(&args, 0, "page number")?, "page number")?;
            if page == 0 {
                return Err(malformed("pages are numbered from 1"));
            }
            Command::GoTo(page - 1)
        }
        CommandKind::Click => {
            let x: f32 = number(arg(&args, 0, "x coordinate")?, "coordinate")?;
            let y: f32 = number(arg(&args, 1, "y coordinate")?, "coordinate")?;
            if !x.is_finite() || !y.is_finite() {
                return Err(malformed("coordinates must be finite"));
            }
            Command::Click(x, y)
        }
        CommandKind::Speed => Command::Speed(number(arg(&args, 0, "speed")?, "speed")?),
        CommandKind::Voice => {
            if args.is_empty() {
                return Err(malformed("missing voice id"));
            }
            Command::Voice(args.join(" "))
        }
        CommandKind::Voices => Command::Voices,
        CommandKind::Status => Command::Status,
        CommandKind::Help => Command::Help,
        CommandKind::Quit => Command::Quit,
    };
    Ok(command)
}
