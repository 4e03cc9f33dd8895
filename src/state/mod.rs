//! Reading session state
//!
//! `State` is the single owner of everything the reader mutates: the reading
//! cursor, the tick scheduler and the document, narrator and presentation
//! handles. Every command and every tick goes through it, so the cursor
//! invariants hold without locking as long as events are dispatched from one
//! loop.

pub mod config;
pub mod layout;
pub mod scheduler;

use crate::cursor::{on_page_exhausted, resolve_click, PageAction, PlayState, ReadingState};
use crate::document::Document;
use crate::presentation::Presentation;
use crate::speech::{pick_voice, Narrator, VoiceInfo};
use crate::Result;
use config::Config;
use layout::{LayoutCache, PageLayout};
use log::{debug, info, warn};
use scheduler::{tick_delay, Tick, TickScheduler};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Result of one advance of the reading cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Not playing, or a stale tick; nothing happened
    Idle,
    /// Narrated the body word at this index
    Spoke(usize),
    /// Page had nothing left to read; the page transition ran instead
    Exhausted(PageAction),
}

/// Reading session context
pub struct State {
    /// Configuration loaded from ~/.chantview.cfg
    pub config: Config,

    /// Page, body word and play state
    reading: ReadingState,

    document: Box<dyn Document>,

    /// Speech output; blocks for the length of each word
    narrator: Box<dyn Narrator>,

    presentation: Box<dyn Presentation>,

    /// Full and body token sets per visited page
    layouts: LayoutCache,

    scheduler: TickScheduler,

    /// Current reading speed in words per minute
    wpm: u32,

    /// Page-to-display scale used for click hit testing
    display_scale: f32,
}

impl State {
    /// Create a session at page 0, stopped
    ///
    /// Applies the configured speed to the narrator.
    pub fn new(
        config: Config,
        document: Box<dyn Document>,
        narrator: Box<dyn Narrator>,
        presentation: Box<dyn Presentation>,
    ) -> Self {
        let layouts = LayoutCache::new(config.region_filter());
        let wpm = config.wpm();
        let display_scale = config.display_scale();

        info!(
            "Session: {} pages, {} wpm, header {:.2}, footer {:.2}, scale {}",
            document.page_count(),
            wpm,
            layouts.filter().header_ratio,
            layouts.filter().footer_ratio,
            display_scale
        );

        let mut state = Self {
            config,
            reading: ReadingState::new(),
            document,
            narrator,
            presentation,
            layouts,
            scheduler: TickScheduler::new(),
            wpm,
            display_scale,
        };

        if let Err(e) = state.narrator.set_rate(wpm) {
            warn!("Failed to set speech rate: {}", e);
        }
        state
    }

    /// Save configuration to disk
    pub fn save_config(&self) -> Result<()> {
        self.config.save()
    }

    pub fn reading(&self) -> &ReadingState {
        &self.reading
    }

    pub fn is_playing(&self) -> bool {
        self.reading.is_playing()
    }

    pub fn total_pages(&self) -> usize {
        self.document.page_count()
    }

    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    /// Layout of `page` (clamped), from the cache
    pub fn layout(&mut self, page: usize) -> Result<Rc<PageLayout>> {
        let page = crate::document::clamp_page(page, self.total_pages());
        self.layouts.get(self.document.as_ref(), page)
    }

    /// Show the current page; called once when the session starts
    pub fn show_current_page(&mut self) {
        let total = self.total_pages();
        self.presentation.on_page_changed(self.reading.page, total);
    }

    /// Show an informational message through the presentation layer
    pub fn announce(&mut self, message: &str) {
        self.presentation.on_message(message);
    }

    /// Report a recoverable problem through the presentation layer
    pub fn report(&mut self, message: &str) {
        warn!("{}", message);
        self.presentation.on_message(message);
    }

    // ========== Narration ==========

    /// Speak one word; failures are reported and swallowed
    fn narrate(&mut self, text: &str) -> bool {
        match self.narrator.speak(text) {
            Ok(()) => true,
            Err(e) => {
                self.report(&format!("Could not speak '{}': {}", text, e));
                false
            }
        }
    }

    /// Voices offered by the narrator
    pub fn voices(&self) -> Vec<VoiceInfo> {
        self.narrator.voices().unwrap_or_else(|e| {
            warn!("Failed to list voices: {}", e);
            Vec::new()
        })
    }

    /// Apply the configured voice, or the first voice in the configured language
    pub fn select_default_voice(&mut self) {
        let voices = self.voices();
        let preferred = self.config.voice();
        let language = self.config.language();

        let Some(voice) = pick_voice(&voices, preferred.as_deref(), &language) else {
            debug!("Narrator offers no voices; keeping its default");
            return;
        };

        info!("Default voice: {} ({})", voice.name, voice.language);
        if let Err(e) = self.narrator.set_voice(&voice.id) {
            warn!("Failed to select voice {}: {}", voice.id, e);
        }
    }

    /// Switch voices; returns false (and reports why) if the narrator refuses
    pub fn set_voice(&mut self, voice_id: &str) -> bool {
        match self.narrator.set_voice(voice_id) {
            Ok(()) => {
                info!("Voice set to {}", voice_id);
                self.config.set("speech", "voice", voice_id);
                true
            }
            Err(e) => {
                self.report(&format!("Cannot use voice '{}': {}", voice_id, e));
                false
            }
        }
    }

    /// Change the reading speed, clamped into the configured range
    ///
    /// Takes effect from the next tick. Returns the applied speed.
    pub fn set_speed(&mut self, wpm: u32) -> u32 {
        let wpm = wpm.clamp(self.config.min_wpm(), self.config.max_wpm());
        self.wpm = wpm;
        self.config.set("reading", "wpm", &wpm.to_string());
        if let Err(e) = self.narrator.set_rate(wpm) {
            warn!("Failed to set speech rate: {}", e);
        }
        debug!("Speed set to {} wpm", wpm);
        wpm
    }

    // ========== Play / stop ==========

    /// Start continuous reading from the first body word of the current page
    pub fn start_reading(&mut self) {
        if self.total_pages() == 0 {
            self.report("Document has no pages");
            return;
        }
        if self.is_playing() {
            debug!("Already reading");
            return;
        }

        info!("Start reading at page {}", self.reading.page + 1);
        self.reading.body_index = 0;
        self.reading.play = PlayState::Playing;
        self.presentation.on_playback_changed(true);
        self.scheduler.schedule(Duration::ZERO, Instant::now());
    }

    /// Stop reading, dropping the pending tick and cutting off speech
    pub fn stop_reading(&mut self) {
        let was_playing = self.is_playing();
        self.reading.play = PlayState::Stopped;
        self.scheduler.cancel();
        if let Err(e) = self.narrator.stop() {
            warn!("Failed to stop narrator: {}", e);
        }

        if was_playing {
            info!("Stopped reading at page {}", self.reading.page + 1);
            self.presentation.on_playback_changed(false);
        }
    }

    /// Start if stopped, stop if reading
    pub fn toggle_reading(&mut self) -> bool {
        if self.is_playing() {
            self.stop_reading();
        } else {
            self.start_reading();
        }
        self.is_playing()
    }

    // ========== Ticks ==========

    /// The pending tick, if reading is scheduled
    pub fn pending_tick(&self) -> Option<Tick> {
        self.scheduler.pending()
    }

    /// Time until the next tick, used as the event loop timeout
    pub fn time_until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_until_next(now)
    }

    /// Run the pending tick if it is due
    pub fn run_due(&mut self, now: Instant) -> Result<Step> {
        match self.scheduler.take_due(now) {
            Some(tick) => self.on_tick(tick),
            None => Ok(Step::Idle),
        }
    }

    /// Handle a fired tick
    ///
    /// Ticks from before the last stop, or arriving while stopped, are
    /// ignored. After advancing, the next tick is scheduled using the speed
    /// in effect now.
    pub fn on_tick(&mut self, tick: Tick) -> Result<Step> {
        if !self.scheduler.is_current(&tick) || !self.is_playing() {
            debug!("Ignoring stale tick");
            return Ok(Step::Idle);
        }

        let step = match self.advance() {
            Ok(step) => step,
            Err(e) => {
                self.stop_reading();
                return Err(e);
            }
        };

        if self.is_playing() {
            self.scheduler.schedule(tick_delay(self.wpm), Instant::now());
        }
        Ok(step)
    }

    /// Advance the reading cursor by one word
    ///
    /// Highlights the word after the current one, narrates the current one
    /// and moves on. Reading the last body word of a page turns the page at
    /// once; a page with nothing left to read turns without narrating.
    pub fn advance(&mut self) -> Result<Step> {
        if !self.is_playing() {
            return Ok(Step::Idle);
        }

        let page = self.reading.page;
        let layout = self.layout(page)?;
        let body_len = layout.body.len();
        self.reading.clamp_index(body_len);

        if self.reading.is_exhausted(body_len) {
            debug!("Page {} exhausted", page + 1);
            return Ok(Step::Exhausted(self.turn_page()));
        }

        let index = self.reading.body_index;

        // Look-ahead: the next word is highlighted while this one is spoken
        if let Some(next) = layout.body_token(index + 1) {
            self.presentation.on_highlight_requested(page, next);
        }

        if let Some(token) = layout.body_token(index) {
            debug!("Word {}/{} on page {}: {}", index + 1, body_len, page + 1, token.text);
            self.narrate(&token.text);
        }

        self.reading.body_index += 1;
        if self.reading.body_index == body_len {
            self.turn_page();
        }

        Ok(Step::Spoke(index))
    }

    /// Roll over to the next page, or stop at the end of the document
    fn turn_page(&mut self) -> PageAction {
        let total = self.total_pages();
        let action = on_page_exhausted(self.reading.page, total);

        match action {
            PageAction::Turn(next) => {
                debug!("Turning to page {}", next + 1);
                self.reading.page = next;
                self.reading.body_index = 0;
                self.presentation.on_page_changed(next, total);
            }
            PageAction::Stop => {
                info!("End of document");
                self.reading.play = PlayState::Stopped;
                self.scheduler.cancel();
                self.presentation.on_playback_changed(false);
            }
        }
        action
    }

    // ========== Navigation ==========

    /// Show `page` (0-based, clamped) from its first word
    ///
    /// Reading continues on the new page if it was active.
    pub fn go_to_page(&mut self, page: usize) {
        let total = self.total_pages();
        if total == 0 {
            return;
        }
        if page >= total {
            debug!("Page {} clamped to {}", page.saturating_add(1), total);
        }

        self.reading.seek_page(page, total);
        self.presentation.on_page_changed(self.reading.page, total);
    }

    /// Go forward one page; no-op on the last page
    pub fn next_page(&mut self) {
        let next = self.reading.page + 1;
        if next < self.total_pages() {
            self.go_to_page(next);
        }
    }

    /// Go back one page; no-op on the first page
    pub fn prev_page(&mut self) {
        if self.reading.page > 0 {
            self.go_to_page(self.reading.page - 1);
        }
    }

    /// Jump to the word under a display-space point and speak it
    ///
    /// Reseeds the cursor at that word whether or not reading is active but
    /// does not start reading. Returns the body index hit, if any.
    pub fn pointer_clicked(&mut self, x: f32, y: f32) -> Result<Option<usize>> {
        let page = self.reading.page;
        let layout = self.layout(page)?;

        let Some(index) = resolve_click((x, y), &layout.full, &layout.body, self.display_scale) else {
            self.report(&format!("No word at ({:.0}, {:.0})", x, y));
            return Ok(None);
        };

        self.reading.body_index = index;
        if let Some(token) = layout.body_token(index) {
            debug!("Clicked word {} on page {}: {}", index + 1, page + 1, token.text);
            self.presentation.on_highlight_requested(page, token);
            self.narrate(&token.text);
        }
        Ok(Some(index))
    }

    /// One-line summary of the session for the `status` command
    pub fn status_line(&mut self) -> String {
        let page = self.reading.page;
        let body_len = self.layout(page).map(|l| l.body.len()).unwrap_or(0);
        format!(
            "Page {} of {}, word {} of {}, {} wpm, {}",
            page + 1,
            self.total_pages(),
            (self.reading.body_index + 1).min(body_len.max(1)),
            body_len,
            self.wpm,
            if self.is_playing() { "reading" } else { "stopped" }
        )
    }
}
