//! Native TTS narrator using the tts crate
//!
//! The `tts` crate provides a unified interface to:
//! - Speech Dispatcher on Linux (via native bindings)
//! - AVFoundation on macOS/iOS (via native bindings)
//! - WinRT/SAPI on Windows
//!
//! The engine itself queues speech asynchronously; `speak` turns that into a
//! blocking call by polling `is_speaking` where the platform supports it.

use crate::speech::{AbortHandle, Narrator, Utterance, VoiceInfo};
use crate::{ChantError, Result};
use log::{debug, error, warn};
use tts::Tts as TtsCrate;

/// Words per minute mapped onto the engine's minimum rate
const SLOWEST_WPM: u32 = 50;
/// Words per minute mapped onto the engine's normal rate
const NORMAL_WPM: u32 = 200;
/// Words per minute mapped onto the engine's maximum rate
const FASTEST_WPM: u32 = 500;

/// Map words per minute onto an engine rate range
///
/// Piecewise linear through `(50, min)`, `(200, normal)`, `(500, max)` since
/// engines disagree on units (Speech Dispatcher uses -100..100 around 0,
/// AVFoundation 0.1..2.0 around 0.5).
pub fn wpm_to_engine_rate(wpm: u32, min: f32, normal: f32, max: f32) -> f32 {
    let wpm = wpm.clamp(SLOWEST_WPM, FASTEST_WPM) as f32;
    if wpm <= NORMAL_WPM as f32 {
        let t = (wpm - SLOWEST_WPM as f32) / (NORMAL_WPM - SLOWEST_WPM) as f32;
        min + t * (normal - min)
    } else {
        let t = (wpm - NORMAL_WPM as f32) / (FASTEST_WPM - NORMAL_WPM) as f32;
        normal + t * (max - normal)
    }
}

/// Narrator backed by the platform TTS engine
pub struct NativeNarrator {
    tts: TtsCrate,

    /// Rate last applied (words per minute); repeats skip the engine
    wpm: Option<u32>,

    /// Voice last applied; repeats skip the engine lookup
    voice_id: Option<String>,

    abort: AbortHandle,
}

impl NativeNarrator {
    /// Initialize the platform-appropriate TTS engine
    pub fn new() -> Result<Self> {
        debug!("Creating native TTS narrator");

        let tts = TtsCrate::default()
            .map_err(|e| ChantError::Speech(format!("Failed to initialize TTS: {}", e)))?;

        debug!("Native TTS narrator created successfully");

        Ok(Self {
            tts,
            wpm: None,
            voice_id: None,
            abort: AbortHandle::new(),
        })
    }
}

impl Narrator for NativeNarrator {
    fn speak(&mut self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        debug!("Speaking: {}", text);
        self.abort.reset();
        self.tts.speak(text, true).map_err(|e| {
            error!("Failed to speak: {}", e);
            ChantError::Speech(format!("Speak failed: {}", e))
        })?;

        if !self.tts.supported_features().is_speaking {
            // Cannot observe playback; the tick delay alone paces words
            return Ok(());
        }

        let tts = &self.tts;
        let outcome = self.abort.wait_for(|| {
            tts.is_speaking()
                .map(|speaking| !speaking)
                .map_err(|e| ChantError::Speech(format!("Failed to query speech state: {}", e)))
        })?;

        if outcome == Utterance::Aborted {
            self.tts
                .stop()
                .map_err(|e| ChantError::Speech(format!("Cancel failed: {}", e)))?;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        debug!("Stopping speech");
        self.abort.raise();
        self.tts.stop().map_err(|e| {
            error!("Failed to stop speech: {}", e);
            ChantError::Speech(format!("Cancel failed: {}", e))
        })?;
        Ok(())
    }

    fn set_rate(&mut self, wpm: u32) -> Result<()> {
        if self.wpm == Some(wpm) {
            return Ok(());
        }
        debug!("Setting rate to {} wpm", wpm);

        let features = self.tts.supported_features();
        if !features.rate {
            warn!("Rate control not supported on this platform");
            return Ok(());
        }

        let rate = wpm_to_engine_rate(
            wpm,
            self.tts.min_rate(),
            self.tts.normal_rate(),
            self.tts.max_rate(),
        );
        self.tts
            .set_rate(rate)
            .map_err(|e| ChantError::Speech(format!("Failed to set rate: {}", e)))?;
        self.wpm = Some(wpm);

        Ok(())
    }

    fn set_voice(&mut self, voice_id: &str) -> Result<()> {
        if self.voice_id.as_deref() == Some(voice_id) {
            return Ok(());
        }
        debug!("Setting voice to {}", voice_id);

        if !self.tts.supported_features().voice {
            warn!("Voice selection not supported on this platform");
            return Ok(());
        }

        let voices = self
            .tts
            .voices()
            .map_err(|e| ChantError::Speech(format!("Failed to get voices: {}", e)))?;

        let voice = voices
            .iter()
            .find(|v| v.id() == voice_id || v.name() == voice_id)
            .ok_or_else(|| ChantError::Speech(format!("Unknown voice '{}'", voice_id)))?;

        self.tts
            .set_voice(voice)
            .map_err(|e| ChantError::Speech(format!("Failed to set voice: {}", e)))?;
        self.voice_id = Some(voice.id());

        Ok(())
    }

    fn voices(&self) -> Result<Vec<VoiceInfo>> {
        if !self.tts.supported_features().voice {
            return Ok(Vec::new());
        }

        let voices = self
            .tts
            .voices()
            .map_err(|e| ChantError::Speech(format!("Failed to get voices: {}", e)))?;

        Ok(voices
            .iter()
            .map(|v| VoiceInfo {
                id: v.id(),
                name: v.name(),
                language: v.language().as_str().to_string(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_narrator() {
        // May fail without speech-dispatcher or in CI without audio
        match NativeNarrator::new() {
            Ok(_) => println!("✓ Native TTS backend initialized successfully"),
            Err(e) => println!("⚠ TTS initialization failed (may be expected in CI): {}", e),
        }
    }

    #[test]
    fn test_settings_are_cached() {
        // Needs a working TTS engine; skipped otherwise
        let Ok(mut narrator) = NativeNarrator::new() else {
            println!("⚠ Skipping cache test (TTS not available)");
            return;
        };
        if !narrator.tts.supported_features().rate {
            return;
        }

        narrator.set_rate(300).unwrap();
        assert_eq!(narrator.wpm, Some(300));
        narrator.set_rate(300).unwrap();
        narrator.set_rate(120).unwrap();
        assert_eq!(narrator.wpm, Some(120));

        let first = narrator.voices().unwrap_or_default().into_iter().next();
        if let Some(voice) = first {
            if narrator.set_voice(&voice.id).is_ok() {
                assert!(narrator.voice_id.is_some());
                assert!(narrator.set_voice(&voice.id).is_ok());
            }
        }
    }

    #[test]
    fn test_rate_mapping_anchors() {
        // Speech Dispatcher style range
        assert_eq!(wpm_to_engine_rate(50, -100.0, 0.0, 100.0), -100.0);
        assert_eq!(wpm_to_engine_rate(200, -100.0, 0.0, 100.0), 0.0);
        assert_eq!(wpm_to_engine_rate(500, -100.0, 0.0, 100.0), 100.0);
    }

    #[test]
    fn test_rate_mapping_interpolates_and_clamps() {
        let mid = wpm_to_engine_rate(350, 0.1, 0.5, 2.0);
        assert!((mid - 1.25).abs() < 1e-5);
        assert_eq!(wpm_to_engine_rate(10, 0.1, 0.5, 2.0), 0.1);
        assert_eq!(wpm_to_engine_rate(9000, 0.1, 0.5, 2.0), 2.0);
    }
}
