use pdfsweep::config::Config;

#[test]
fn parse_example_config() {
    let raw = include_str!("../pdfsweep.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert!(cfg.conversion.progress_every >= 1);
    assert_eq!(cfg.conversion.done_dir_name, "done");
    assert!(!cfg.discovery.presentation_extensions.is_empty());
    assert!(!cfg.engine.password_error_patterns.is_empty());
}

#[test]
fn defaults_cover_all_families() {
    let cfg = Config::default();
    assert_eq!(
        cfg.discovery.presentation_extensions,
        vec!["pptx", "pptm", "ppt"]
    );
    assert_eq!(
        cfg.discovery.spreadsheet_extensions,
        vec!["xlsx", "xlsm", "xls"]
    );
    assert_eq!(
        cfg.discovery.wordprocessing_extensions,
        vec!["docx", "docm", "doc"]
    );
    assert!(!cfg.conversion.overwrite_existing);
}

#[test]
fn partial_config_fills_in_defaults() {
    let cfg: Config = toml::from_str("[conversion]\nprogress_every = 3\n").expect("parse TOML");
    assert_eq!(cfg.conversion.progress_every, 3);
    assert_eq!(cfg.conversion.done_dir_name, "done");
    assert_eq!(cfg.logging.level, "info");
}
