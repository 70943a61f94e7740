//! Tests for loading settings from disk.

use std::io::Write;
use strictly_align::{MatchConfig, Variant};
use strictly_align_cli::{BoardArgs, PlayerKind, Settings};
use tempfile::NamedTempFile;

fn write_settings(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_settings() {
    let file = write_settings(
        r#"
rows = 6
cols = 7
k = 4
variant = "gravity"
player_x = "cpu"
player_o = "human"
name_o = "Ada"
seed = 3
fork_tiers = true
"#,
    );

    let settings = Settings::from_file(file.path()).unwrap();
    assert_eq!(*settings.variant(), Variant::Gravity);
    assert_eq!(*settings.player_o(), PlayerKind::Human);
    assert_eq!(settings.name_o().as_deref(), Some("Ada"));
    assert_eq!(*settings.fork_tiers(), Some(true));
    assert_eq!(settings.match_config(), Ok(MatchConfig::connect_four()));
}

#[test]
fn test_empty_file_uses_defaults() {
    let file = write_settings("");
    let settings = Settings::from_file(file.path()).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_resolve_applies_flags_over_file() {
    let file = write_settings("rows = 4\ncols = 4\nk = 4\n");
    let args = BoardArgs {
        config: Some(file.path().to_path_buf()),
        k: Some(3),
        ..BoardArgs::default()
    };
    let settings = Settings::resolve(&args).unwrap();
    let config = settings.match_config().unwrap();
    assert_eq!((config.rows(), config.cols(), config.k()), (4, 4, 3));
}

#[test]
fn test_bad_toml_reports_location() {
    let file = write_settings("rows = \"many\"");
    let err = Settings::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("Failed to parse settings"));
    assert!(err.file.ends_with("settings.rs"));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Settings::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.message.contains("Failed to read settings file"));
}

#[test]
fn test_invalid_board_rejected() {
    let file = write_settings("rows = 2\ncols = 2\nk = 2\n");
    let settings = Settings::from_file(file.path()).unwrap();
    assert!(settings.match_config().is_err());
}
