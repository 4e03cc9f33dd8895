//! espeak-ng narrator
//!
//! Runs one espeak-ng process per word and waits for it to exit, which makes
//! `speak` naturally synchronous. An abort kills the process mid-word.
//!
//! Dependencies:
//! - espeak-ng (install with: sudo apt install espeak-ng)

use crate::speech::{AbortHandle, Narrator, Utterance, VoiceInfo};
use crate::{ChantError, Result};
use log::{debug, error};
use std::process::{Child, Command, Stdio};

/// espeak-ng accepts 80..=450 words per minute
const MIN_SPEED: u32 = 80;
const MAX_SPEED: u32 = 450;

/// Voices bundled with every espeak-ng install
const VOICES: &[(&str, &str, &str)] = &[
    ("vi", "Vietnamese", "vi"),
    ("en", "English", "en"),
    ("en-us", "English (America)", "en-US"),
    ("en-gb", "English (Great Britain)", "en-GB"),
    ("hi", "Hindi", "hi"),
    ("th", "Thai", "th"),
    ("my", "Myanmar (Burmese)", "my"),
    ("si", "Sinhala", "si"),
    ("fr", "French", "fr"),
    ("de", "German", "de"),
];

/// Narrator driving an espeak-ng subprocess
pub struct EspeakNarrator {
    /// Process speaking the current word
    current_process: Option<Child>,

    /// Speed in words per minute
    wpm: u32,

    /// espeak-ng voice name
    voice: String,

    /// Path to espeak-ng
    espeak_path: String,

    abort: AbortHandle,
}

impl EspeakNarrator {
    /// Create a narrator, verifying espeak-ng is installed
    pub fn new() -> Result<Self> {
        debug!("Creating espeak-ng narrator");

        let espeak_path = Self::find_espeak()?;
        debug!("Found espeak-ng at: {}", espeak_path);

        Ok(Self {
            current_process: None,
            wpm: 300,
            voice: "vi".to_string(),
            espeak_path,
            abort: AbortHandle::new(),
        })
    }

    /// Find espeak-ng executable
    fn find_espeak() -> Result<String> {
        let paths = ["espeak-ng", "/usr/bin/espeak-ng", "/usr/local/bin/espeak-ng"];

        for path in paths {
            if let Ok(status) = Command::new(path)
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
            {
                if status.success() {
                    return Ok(path.to_string());
                }
            }
        }

        Err(ChantError::Speech(
            "espeak-ng not found. Install with: sudo apt install espeak-ng".to_string(),
        ))
    }

    /// Clamp words per minute into espeak-ng's accepted range
    fn espeak_speed(wpm: u32) -> u32 {
        wpm.clamp(MIN_SPEED, MAX_SPEED)
    }

    /// Kill the running process, if any
    fn cancel_process(&mut self) {
        if let Some(mut child) = self.current_process.take() {
            debug!("Killing espeak-ng process");
            match child.kill() {
                Ok(_) => {
                    let _ = child.wait(); // Clean up zombie
                }
                Err(e) => {
                    debug!("Failed to kill espeak-ng process: {}", e);
                }
            }
        }
    }
}

impl Narrator for EspeakNarrator {
    fn speak(&mut self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        self.cancel_process();
        self.abort.reset();
        debug!("Speaking: {}", text);

        let child = Command::new(&self.espeak_path)
            .arg("-v")
            .arg(&self.voice)
            .arg("-s")
            .arg(Self::espeak_speed(self.wpm).to_string())
            .arg("--")
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                error!("Failed to spawn espeak-ng: {}", e);
                ChantError::Speech(format!("Failed to start espeak-ng: {}", e))
            })?;
        self.current_process = Some(child);

        let abort = self.abort.clone();
        let mut exit = None;
        let outcome = match self.current_process.as_mut() {
            Some(child) => abort.wait_for(|| {
                exit = child.try_wait()?;
                Ok(exit.is_some())
            })?,
            None => Utterance::Finished,
        };

        match outcome {
            Utterance::Finished => {
                self.current_process = None;
                if let Some(status) = exit.filter(|s| !s.success()) {
                    error!("espeak-ng failed on '{}': {}", text, status);
                    return Err(ChantError::Speech(format!(
                        "espeak-ng exited with {} (voice '{}')",
                        status, self.voice
                    )));
                }
            }
            Utterance::Aborted => self.cancel_process(),
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        debug!("Stopping speech");
        self.abort.raise();
        self.cancel_process();
        Ok(())
    }

    fn set_rate(&mut self, wpm: u32) -> Result<()> {
        debug!("Setting rate to {} wpm", wpm);
        self.wpm = wpm;
        Ok(())
    }

    fn set_voice(&mut self, voice_id: &str) -> Result<()> {
        let voice_id = voice_id.trim();
        if voice_id.is_empty() {
            return Err(ChantError::Speech("Empty voice id".to_string()));
        }
        debug!("Setting voice to {}", voice_id);
        self.voice = voice_id.to_string();
        Ok(())
    }

    fn voices(&self) -> Result<Vec<VoiceInfo>> {
        Ok(VOICES
            .iter()
            .map(|(id, name, language)| VoiceInfo {
                id: id.to_string(),
                name: name.to_string(),
                language: language.to_string(),
            })
            .collect())
    }
}

impl Drop for EspeakNarrator {
    fn drop(&mut self) {
        debug!("Shutting down espeak-ng narrator");
        self.cancel_process();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_clamping() {
        assert_eq!(EspeakNarrator::espeak_speed(50), 80);
        assert_eq!(EspeakNarrator::espeak_speed(300), 300);
        assert_eq!(EspeakNarrator::espeak_speed(500), 450);
    }

    fn narrator_at(espeak_path: &str) -> EspeakNarrator {
        EspeakNarrator {
            current_process: None,
            wpm: 300,
            voice: "vi".to_string(),
            espeak_path: espeak_path.to_string(),
            abort: AbortHandle::new(),
        }
    }

    #[test]
    fn test_failed_process_is_an_error() {
        let mut narrator = narrator_at("false");
        assert!(matches!(narrator.speak("Namo"), Err(ChantError::Speech(_))));
        assert!(narrator.current_process.is_none());
    }

    #[test]
    fn test_successful_process_finishes() {
        let mut narrator = narrator_at("true");
        assert!(narrator.speak("Namo").is_ok());
        assert!(narrator.current_process.is_none());
    }

    #[test]
    fn test_missing_binary_is_an_error() {
        let mut narrator = narrator_at("/nonexistent/espeak-ng");
        assert!(narrator.speak("Namo").is_err());
    }

    #[test]
    fn test_voice_table_has_vietnamese() {
        assert!(VOICES.iter().any(|(id, _, _)| *id == "vi"));
    }

    #[test]
    fn test_create_espeak_narrator() {
        match EspeakNarrator::new() {
            Ok(mut narrator) => {
                assert!(narrator.set_voice("  ").is_err());
                assert!(narrator.set_voice("en").is_ok());
                assert!(!narrator.voices().unwrap().is_empty());
                println!("✓ espeak-ng backend available");
            }
            Err(e) => println!("⚠ espeak-ng backend not available: {}", e),
        }
    }
}
