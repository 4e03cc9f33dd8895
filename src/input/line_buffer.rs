//! Line buffer for collecting command input
//!
//! Standard input is read in arbitrary chunks; this collects bytes until a
//! line terminator arrives and hands back complete lines.

use log::{debug, trace};

/// Accumulates raw input bytes into complete lines
#[derive(Debug, Default)]
pub struct LineBuffer {
    /// Bytes of the line currently being typed
    buffer: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes`, returning every line they complete
    ///
    /// Handles `\n` and `\r\n` endings and applies backspace to the pending
    /// line. Invalid UTF-8 is replaced rather than rejected.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();

        for &byte in bytes {
            match byte {
                b'\n' => {
                    if self.buffer.last() == Some(&b'\r') {
                        self.buffer.pop();
                    }
                    let line = String::from_utf8_lossy(&self.buffer).into_owned();
                    debug!("LineBuffer: accepting input '{}'", line);
                    lines.push(line);
                    self.buffer.clear();
                }

                // Backspace - remove last character, not just its last byte
                0x08 | 0x7f => {
                    while let Some(last) = self.buffer.pop() {
                        if last & 0xC0 != 0x80 {
                            break;
                        }
                    }
                    trace!("LineBuffer: backspace, {} bytes pending", self.buffer.len());
                }

                _ => self.buffer.push(byte),
            }
        }
        lines
    }

    /// Text typed since the last complete line
    pub fn pending(&self) -> String {
        String::from_utf8_lossy(&self.buffer).into_owned()
    }

    /// Take whatever is pending as a final line (at end of input)
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let line = self.pending();
        self.buffer.clear();
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_split_across_chunks() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push(b"go").is_empty());
        assert_eq!(buffer.push(b"to 3\nsta"), vec!["goto 3".to_string()]);
        assert_eq!(buffer.pending(), "sta");
        assert_eq!(buffer.push(b"rt\r\n"), vec!["start".to_string()]);
    }

    #[test]
    fn test_backspace_removes_whole_character() {
        let mut buffer = LineBuffer::new();
        buffer.push("speeđ".as_bytes());
        buffer.push(b"\x7f");
        assert_eq!(buffer.pending(), "spee");
        buffer.push(b"d\x08d");
        assert_eq!(buffer.pending(), "speed");
    }

    #[test]
    fn test_finish_flushes_unterminated_line() {
        let mut buffer = LineBuffer::new();
        buffer.push(b"quit");
        assert_eq!(buffer.finish(), Some("quit".to_string()));
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn test_empty_lines_are_kept() {
        let mut buffer = LineBuffer::new();
        assert_eq!(buffer.push(b"\n\n"), vec![String::new(), String::new()]);
    }
}
