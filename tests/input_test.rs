//! Input system tests
//!
//! Tests that typed lines become commands and that commands drive the
//! reading session.

use chantview::document::{BBox, MemoryDocument, PageTokenSet};
use chantview::input::{execute, parse_command, Command, Flow, LineBuffer};
use chantview::presentation::{HighlightStyle, TerminalPresentation};
use chantview::speech::Narrator;
use chantview::state::config::Config;
use chantview::state::State;
use chantview::{ChantError, Result};

/// Narrator that says nothing
struct Silent;

impl Narrator for Silent {
    fn speak(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
    fn stop(&mut self) -> Result<()> {
        Ok(())
    }
    fn set_rate(&mut self, _wpm: u32) -> Result<()> {
        Ok(())
    }
    fn set_voice(&mut self, _voice_id: &str) -> Result<()> {
        Ok(())
    }
}

fn state(pages: usize) -> State {
    let pages = (0..pages)
        .map(|_| {
            PageTokenSet::from_words(
                vec![
                    ("alpha", BBox::new(10.0, 400.0, 60.0, 420.0)),
                    ("beta", BBox::new(70.0, 400.0, 120.0, 420.0)),
                ],
                800.0,
            )
        })
        .collect();
    State::new(
        Config::defaults(),
        Box::new(MemoryDocument::new(pages)),
        Box::new(Silent),
        Box::new(TerminalPresentation::new(2.0, HighlightStyle::default())),
    )
}

#[test]
fn test_parse_commands() {
    assert_eq!(parse_command("start").unwrap(), Command::Start);
    assert_eq!(parse_command("goto 3").unwrap(), Command::GoTo(2));
    assert_eq!(parse_command("c 150 820").unwrap(), Command::Click(150.0, 820.0));
    assert_eq!(parse_command("speed 250").unwrap(), Command::Speed(250));
    assert_eq!(
        parse_command("voice Microsoft An").unwrap(),
        Command::Voice("Microsoft An".to_string())
    );
}

#[test]
fn test_malformed_input_is_rejected() {
    for line in ["goto x", "goto -1", "click 10", "speed fast", "dance", "voice"] {
        match parse_command(line) {
            Err(ChantError::MalformedInput(_)) => {}
            other => panic!("{:?} parsed as {:?}", line, other),
        }
    }
}

#[test]
fn test_typed_lines_drive_session() {
    let mut state = state(3);
    let mut buffer = LineBuffer::new();

    let lines = buffer.push(b"goto 3\nstart\n");
    for line in &lines {
        let command = parse_command(line).unwrap();
        assert_eq!(execute(&command, &mut state).unwrap(), Flow::Continue);
    }
    assert_eq!(state.reading().page, 2);
    assert!(state.is_playing());

    let command = parse_command("prev").unwrap();
    execute(&command, &mut state).unwrap();
    assert_eq!(state.reading().page, 1);

    let command = parse_command("").unwrap();
    execute(&command, &mut state).unwrap();
    assert!(!state.is_playing());
}

#[test]
fn test_click_and_speed_commands() {
    let mut state = state(1);

    execute(&Command::Click(190.0, 820.0), &mut state).unwrap();
    assert_eq!(state.reading().body_index, 1);

    execute(&Command::Speed(9999), &mut state).unwrap();
    assert_eq!(state.wpm(), 500);

    assert!(state.status_line().starts_with("Page 1 of 1, word 2 of 2"));
}

#[test]
fn test_quit_stops_reading() {
    let mut state = state(2);
    state.start_reading();
    assert_eq!(execute(&Command::Quit, &mut state).unwrap(), Flow::Quit);
    assert!(!state.is_playing());
}
