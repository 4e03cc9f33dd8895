//! Command input
//!
//! Input arrives as text lines on standard input. Lines are collected by the
//! line buffer, parsed into commands and dispatched to the session.

pub mod commands;
pub mod handler;
pub mod line_buffer;

pub use commands::{parse_command, Command};
pub use handler::{execute, Flow};
pub use line_buffer::LineBuffer;
