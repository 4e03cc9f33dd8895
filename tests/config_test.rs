//! Configuration loading tests
//!
//! Tests that configuration files are created with defaults, read back and
//! sanitized when hand-edited.

use chantview::region::RegionFilter;
use chantview::speech::Backend;
use chantview::state::config::Config;
use std::fs;

#[test]
fn test_missing_config_is_created_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chantview.cfg");

    let config = Config::load_from(&path).expect("Failed to load config");
    assert!(path.exists());
    assert_eq!(config.path(), path.as_path());

    assert_eq!(config.wpm(), 300);
    assert_eq!(config.region_filter(), RegionFilter::default());
    assert_eq!(config.display_scale(), 2.0);
    assert_eq!(config.language(), "vi");

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("[reading]"));
    assert!(written.contains("[highlight]"));
    assert!(written.contains("[speech]"));
}

#[test]
fn test_existing_config_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chantview.cfg");
    fs::write(
        &path,
        "[reading]\nwpm=180\nheader_ratio=0.15\n\n[speech]\nbackend=espeak\nvoice=vi\n",
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.wpm(), 180);
    assert_eq!(config.header_ratio(), 0.15);
    // Keys missing from the file fall back to defaults
    assert_eq!(config.footer_ratio(), 0.02);
    assert_eq!(config.max_wpm(), 500);
    assert_eq!(config.backend(), Backend::Espeak);
    assert_eq!(config.voice().as_deref(), Some("vi"));
}

#[test]
fn test_save_round_trips_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chantview.cfg");

    let mut config = Config::load_from(&path).unwrap();
    config.set("reading", "wpm", "420");
    config.set("speech", "voice", "vi-VN");
    config.save().unwrap();

    let reloaded = Config::load_from(&path).unwrap();
    assert_eq!(reloaded.wpm(), 420);
    assert_eq!(reloaded.voice().as_deref(), Some("vi-VN"));
}

#[test]
fn test_unreadable_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chantview.cfg");
    fs::write(&path, "[reading\nwpm=1\n").unwrap();

    assert!(Config::load_from(&path).is_err());
}
