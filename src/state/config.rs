//! Configuration management

use crate::presentation::HighlightStyle;
use crate::region::{RegionFilter, FOOTER_RATIO, HEADER_RATIO};
use crate::speech::Backend;
use crate::{ChantError, Result};
use ini::Ini;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Default reading speed in words per minute
pub const DEFAULT_WPM: u32 = 300;
/// Default lower bound of the speed range
pub const DEFAULT_MIN_WPM: u32 = 50;
/// Default upper bound of the speed range
pub const DEFAULT_MAX_WPM: u32 = 500;
/// Default page-to-display scale
pub const DEFAULT_DISPLAY_SCALE: f32 = 2.0;

/// Application configuration
///
/// Reading speed, header/footer margins, display scale, highlight geometry
/// and narrator settings, persisted in `~/.chantview.cfg`.
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path
    path: PathBuf,
}

impl Config {
    /// Load configuration from `~/.chantview.cfg`, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(path)
                .map_err(|e| ChantError::IniParse(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(path)
                .map_err(|e| ChantError::IniParse(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self {
            ini,
            path: path.to_path_buf(),
        })
    }

    /// In-memory defaults, never written unless saved
    pub fn defaults() -> Self {
        Self {
            ini: Self::default_config(),
            path: Self::config_path(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        debug!("Saving config to {:?}", self.path);
        self.ini
            .write_to_file(&self.path)
            .map_err(|e| ChantError::Config(format!("Failed to save config: {}", e)))
    }

    /// Get config file path (~/.chantview.cfg)
    fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".chantview.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("reading"))
            .set("wpm", DEFAULT_WPM.to_string())
            .set("min_wpm", DEFAULT_MIN_WPM.to_string())
            .set("max_wpm", DEFAULT_MAX_WPM.to_string())
            .set("header_ratio", HEADER_RATIO.to_string())
            .set("footer_ratio", FOOTER_RATIO.to_string())
            .set("display_scale", DEFAULT_DISPLAY_SCALE.to_string());

        let highlight = HighlightStyle::default();
        ini.with_section(Some("highlight"))
            .set("margin", highlight.margin.to_string())
            .set("vertical_offset", highlight.vertical_offset.to_string());

        ini.with_section(Some("speech"))
            .set("backend", "auto")
            .set("voice", "")
            .set("language", "vi");

        ini
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get an unsigned integer value from config
    pub fn get_u32(&self, section: &str, key: &str, default: u32) -> u32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Get a float value from config
    pub fn get_float(&self, section: &str, key: &str, default: f32) -> f32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse::<f32>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(default)
    }

    /// Set a value in config
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.with_section(Some(section)).set(key, value);
    }

    // Reading settings

    /// Slowest selectable speed (at least 1 wpm)
    pub fn min_wpm(&self) -> u32 {
        self.get_u32("reading", "min_wpm", DEFAULT_MIN_WPM).max(1)
    }

    /// Fastest selectable speed (never below `min_wpm`)
    pub fn max_wpm(&self) -> u32 {
        self.get_u32("reading", "max_wpm", DEFAULT_MAX_WPM)
            .max(self.min_wpm())
    }

    /// Reading speed, clamped into the selectable range
    pub fn wpm(&self) -> u32 {
        self.get_u32("reading", "wpm", DEFAULT_WPM)
            .clamp(self.min_wpm(), self.max_wpm())
    }

    fn ratio(&self, key: &str, default: f32) -> f32 {
        let value = self.get_float("reading", key, default);
        if (0.0..1.0).contains(&value) {
            value
        } else {
            warn!("Ignoring out-of-range {} = {}", key, value);
            default
        }
    }

    /// Share of the page height treated as header
    pub fn header_ratio(&self) -> f32 {
        self.ratio("header_ratio", HEADER_RATIO)
    }

    /// Share of the page height treated as footer
    pub fn footer_ratio(&self) -> f32 {
        self.ratio("footer_ratio", FOOTER_RATIO)
    }

    pub fn region_filter(&self) -> RegionFilter {
        RegionFilter::new(self.header_ratio(), self.footer_ratio())
    }

    /// Page-to-display scale; must be positive
    pub fn display_scale(&self) -> f32 {
        let scale = self.get_float("reading", "display_scale", DEFAULT_DISPLAY_SCALE);
        if scale > 0.0 {
            scale
        } else {
            DEFAULT_DISPLAY_SCALE
        }
    }

    pub fn highlight_style(&self) -> HighlightStyle {
        let default = HighlightStyle::default();
        HighlightStyle {
            margin: self.get_float("highlight", "margin", default.margin),
            vertical_offset: self.get_float("highlight", "vertical_offset", default.vertical_offset),
        }
    }

    // Speech settings

    /// Narrator backend; unknown names fall back to auto-detection
    pub fn backend(&self) -> Backend {
        let name = self.get_string("speech", "backend", "auto");
        name.parse().unwrap_or_else(|e| {
            warn!("{}", e);
            Backend::Auto
        })
    }

    /// Explicit voice id, if configured
    pub fn voice(&self) -> Option<String> {
        let voice = self.get_string("speech", "voice", "");
        let voice = voice.trim();
        (!voice.is_empty()).then(|| voice.to_string())
    }

    /// Preferred voice language when no voice is configured
    pub fn language(&self) -> String {
        self.get_string("speech", "language", "vi")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::defaults();
        assert_eq!(config.wpm(), 300);
        assert_eq!(config.min_wpm(), 50);
        assert_eq!(config.max_wpm(), 500);
        assert_eq!(config.header_ratio(), 0.10);
        assert_eq!(config.footer_ratio(), 0.02);
        assert_eq!(config.display_scale(), 2.0);
        assert_eq!(config.highlight_style(), HighlightStyle::default());
        assert_eq!(config.backend(), Backend::Auto);
        assert_eq!(config.voice(), None);
        assert_eq!(config.language(), "vi");
    }

    #[test]
    fn test_wpm_clamped_to_range() {
        let mut config = Config::defaults();
        config.set("reading", "wpm", "9000");
        assert_eq!(config.wpm(), 500);
        config.set("reading", "wpm", "0");
        assert_eq!(config.wpm(), 50);
        config.set("reading", "wpm", "fast");
        assert_eq!(config.wpm(), 300);
    }

    #[test]
    fn test_min_max_sanitized() {
        let mut config = Config::defaults();
        config.set("reading", "min_wpm", "0");
        config.set("reading", "max_wpm", "0");
        assert_eq!(config.min_wpm(), 1);
        assert_eq!(config.max_wpm(), 1);
    }

    #[test]
    fn test_bad_ratios_fall_back() {
        let mut config = Config::defaults();
        config.set("reading", "header_ratio", "1.5");
        config.set("reading", "footer_ratio", "-0.1");
        assert_eq!(config.header_ratio(), HEADER_RATIO);
        assert_eq!(config.footer_ratio(), FOOTER_RATIO);

        config.set("reading", "header_ratio", "0.2");
        assert_eq!(config.region_filter(), RegionFilter::new(0.2, FOOTER_RATIO));
    }

    #[test]
    fn test_bad_scale_and_backend() {
        let mut config = Config::defaults();
        config.set("reading", "display_scale", "-3");
        assert_eq!(config.display_scale(), DEFAULT_DISPLAY_SCALE);
        config.set("speech", "backend", "festival");
        assert_eq!(config.backend(), Backend::Auto);
        config.set("speech", "voice", "  linh ");
        assert_eq!(config.voice(), Some("linh".to_string()));
    }
}
