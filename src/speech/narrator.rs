//! Narrator abstraction
//!
//! The reader hands the narrator one word at a time. `speak` blocks until the
//! word has been vocalized (or aborted) so at most one utterance is ever in
//! flight and the highlight never runs ahead of the voice.

use crate::{ChantError, Result};
use log::info;
use std::str::FromStr;

/// A voice offered by a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    pub id: String,
    pub name: String,
    /// BCP 47 style tag, e.g. `vi-VN`
    pub language: String,
}

/// Text-to-speech collaborator
pub trait Narrator: Send {
    /// Vocalize `text`, returning once playback has finished or been aborted
    fn speak(&mut self, text: &str) -> Result<()>;

    /// Abort any in-flight utterance
    fn stop(&mut self) -> Result<()>;

    /// Speaking rate in words per minute
    fn set_rate(&mut self, wpm: u32) -> Result<()>;

    /// Select a voice by backend id
    fn set_voice(&mut self, voice_id: &str) -> Result<()>;

    /// Voices this backend can use
    fn voices(&self) -> Result<Vec<VoiceInfo>> {
        Ok(Vec::new())
    }
}

/// Which narrator backend to create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Native platform TTS, falling back to espeak-ng
    #[default]
    Auto,
    Native,
    Espeak,
}

impl FromStr for Backend {
    type Err = ChantError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Backend::Auto),
            "native" | "tts" => Ok(Backend::Native),
            "espeak" | "espeak-ng" => Ok(Backend::Espeak),
            other => Err(ChantError::Config(format!("Unknown speech backend '{}'", other))),
        }
    }
}

/// Normalize `vi_VN` / `VI-vn` style tags for comparison
fn normalize_language(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

/// Choose the startup voice
///
/// An explicit id wins; otherwise the first voice whose language matches
/// `language` (exact tag or primary subtag); otherwise the first voice.
pub fn pick_voice<'a>(
    voices: &'a [VoiceInfo],
    preferred_id: Option<&str>,
    language: &str,
) -> Option<&'a VoiceInfo> {
    if let Some(id) = preferred_id.filter(|id| !id.trim().is_empty()) {
        if let Some(voice) = voices.iter().find(|v| v.id == id || v.name == id) {
            return Some(voice);
        }
    }

    let wanted = normalize_language(language);
    if !wanted.is_empty() {
        let matched = voices.iter().find(|v| {
            let lang = normalize_language(&v.language);
            lang == wanted || lang.split('-').next() == wanted.split('-').next()
        });
        if matched.is_some() {
            return matched;
        }
    }

    voices.first()
}

/// Create the narrator for `backend`
///
/// `Auto` tries the native platform TTS first (Speech Dispatcher on Linux,
/// AVFoundation on macOS) and falls back to an espeak-ng subprocess.
pub fn create_narrator(backend: Backend) -> Result<Box<dyn Narrator>> {
    use super::backends::espeak::EspeakNarrator;
    use super::backends::native::NativeNarrator;

    match backend {
        Backend::Native => {
            let narrator = NativeNarrator::new()?;
            info!("Using native TTS narrator");
            Ok(Box::new(narrator))
        }
        Backend::Espeak => {
            let narrator = EspeakNarrator::new()?;
            info!("Using espeak-ng narrator");
            Ok(Box::new(narrator))
        }
        Backend::Auto => {
            info!("Trying native TTS backend...");
            match NativeNarrator::new() {
                Ok(narrator) => {
                    info!("✓ Successfully initialized native TTS backend");
                    return Ok(Box::new(narrator));
                }
                Err(e) => info!("✗ Native TTS unavailable: {}", e),
            }

            info!("Trying espeak-ng backend...");
            match EspeakNarrator::new() {
                Ok(narrator) => {
                    info!("✓ Successfully initialized espeak-ng backend");
                    Ok(Box::new(narrator))
                }
                Err(e) => Err(ChantError::Speech(format!(
                    "No speech backend available. Tried:\n\
                     1. Native TTS (Linux: sudo apt install speech-dispatcher)\n\
                     2. espeak-ng (install: sudo apt install espeak-ng)\n\
                     Error: {}",
                    e
                ))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(id: &str, language: &str) -> VoiceInfo {
        VoiceInfo {
            id: id.to_string(),
            name: format!("{} voice", id),
            language: language.to_string(),
        }
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("auto".parse::<Backend>().unwrap(), Backend::Auto);
        assert_eq!("".parse::<Backend>().unwrap(), Backend::Auto);
        assert_eq!("Native".parse::<Backend>().unwrap(), Backend::Native);
        assert_eq!("espeak-ng".parse::<Backend>().unwrap(), Backend::Espeak);
        assert!("festival".parse::<Backend>().is_err());
    }

    #[test]
    fn test_pick_voice_prefers_language() {
        let voices = vec![voice("en", "en-US"), voice("linh", "vi_VN")];
        let picked = pick_voice(&voices, None, "vi").unwrap();
        assert_eq!(picked.id, "linh");
    }

    #[test]
    fn test_pick_voice_explicit_id() {
        let voices = vec![voice("en", "en-US"), voice("linh", "vi-VN")];
        assert_eq!(pick_voice(&voices, Some("en"), "vi").unwrap().id, "en");
        // Name matches too
        assert_eq!(pick_voice(&voices, Some("linh voice"), "en").unwrap().id, "linh");
    }

    #[test]
    fn test_pick_voice_falls_back_to_first() {
        let voices = vec![voice("en", "en-US"), voice("de", "de-DE")];
        assert_eq!(pick_voice(&voices, Some("missing"), "vi").unwrap().id, "en");
        assert!(pick_voice(&[], None, "vi").is_none());
    }
}
