//! Command dispatch
//!
//! Applies parsed commands to the reading session.

use super::commands::{Command, HELP};
use crate::state::State;
use crate::Result;
use log::debug;

/// What the event loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading input
    Continue,
    /// Leave the event loop
    Quit,
}

/// Execute one command against the session
pub fn execute(command: &Command, state: &mut State) -> Result<Flow> {
    debug!("Command: {:?}", command);

    match command {
        Command::Start => state.start_reading(),
        Command::Stop => state.stop_reading(),
        Command::Toggle => {
            state.toggle_reading();
        }
        Command::NextPage => state.next_page(),
        Command::PrevPage => state.prev_page(),
        Command::GoTo(page) => state.go_to_page(*page),
        Command::Click(x, y) => {
            state.pointer_clicked(*x, *y)?;
        }
        Command::Speed(wpm) => {
            let applied = state.set_speed(*wpm);
            state.announce(&format!("Speed {} wpm", applied));
        }
        Command::Voice(id) => {
            if state.set_voice(id) {
                state.announce(&format!("Voice {}", id));
            }
        }
        Command::Voices => {
            let voices = state.voices();
            if voices.is_empty() {
                state.announce("No voices available");
            }
            for voice in voices {
                state.announce(&format!("{:<24} {:<8} {}", voice.id, voice.language, voice.name));
            }
        }
        Command::Status => {
            let status = state.status_line();
            state.announce(&status);
        }
        Command::Help => {
            for line in HELP {
                state.announce(line);
            }
        }
        Command::Quit => {
            state.stop_reading();
            return Ok(Flow::Quit);
        }
    }
    Ok(Flow::Continue)
}
