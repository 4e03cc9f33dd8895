//! chantview - read a paginated document aloud, word by word
//!
//! Walks the body words of each page in reading order, narrating one word
//! per tick at a configurable speed while asking the presentation layer to
//! highlight it. Header and footer bands are skipped, pages roll over on
//! their own and a click anywhere on a word restarts reading there.

pub mod cursor;
pub mod document;
pub mod error;
pub mod input;
pub mod presentation;
pub mod region;
pub mod speech;
pub mod state;

pub use error::{ChantError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "chantview";
