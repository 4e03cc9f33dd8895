//! Speech narration

pub mod abort;
pub mod backends;
pub mod narrator;

pub use abort::{interrupt, take_interrupt, AbortHandle, Utterance};
pub use narrator::{create_narrator, pick_voice, Backend, Narrator, VoiceInfo};
