use std::path::PathBuf;

use promptpad::config::{ConfigFlags, load_config_flags, parse_flag_tokens, save_config_flags};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".promptpadrc");
    let content = r"
# comment
--no-wrap

--tab-width 2

--debug-log=events.log
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.no_wrap);
    assert_eq!(flags.tab_width, Some(2));
    assert_eq!(flags.debug_log, Some(PathBuf::from("events.log")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".promptpadrc");
    let content = "--no-wrap\n--tab-width 8\n--debug-log file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "promptpad".to_string(),
        "--tab-width".to_string(),
        "2".to_string(),
        "--read-only".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.no_wrap, "file flags should remain enabled");
    assert!(effective.read_only, "cli flags should be applied");
    assert_eq!(effective.tab_width, Some(2), "cli should override tab width");
    assert_eq!(
        effective.debug_log,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "promptpad".to_string(),
        "--tab-width=6".to_string(),
        "--debug-log=events.log".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.tab_width, Some(6));
    assert_eq!(flags.debug_log, Some(PathBuf::from("events.log")));
}

#[test]
fn test_saved_file_round_trips_through_token_parser() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".promptpadrc");
    let flags = ConfigFlags {
        read_only: true,
        perf: true,
        ..ConfigFlags::default()
    };
    save_config_flags(&path, &flags).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# promptpad defaults"));
    assert_eq!(load_config_flags(&path).unwrap(), flags);
}

#[test]
fn test_config_union_merges_booleans() {
    let file = ConfigFlags {
        no_wrap: true,
        ..ConfigFlags::default()
    };
    let cli = ConfigFlags {
        read_only: true,
        perf: true,
        ..ConfigFlags::default()
    };
    let merged = file.union(&cli);
    assert!(merged.no_wrap);
    assert!(merged.read_only);
    assert!(merged.perf);
}
