use std::io::Write as _;

use serial_test::serial;

use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("info".to_string());
    raw.backend.url = Some("https://stale.example".to_string());
    raw.backend.api_key = Some("file-key".to_string());

    let overrides = GlobalOverrides {
        log_level: Some("debug".to_string()),
        backend_url: Some("https://fresh.example".to_string()),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(
        settings.backend.url.as_ref().map(Url::as_str),
        Some("https://fresh.example/")
    );
    assert_eq!(settings.backend.api_key.as_deref(), Some("file-key"));
}

#[test]
fn defaults_apply_when_nothing_is_configured() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert_eq!(settings.blog.page_size.get(), DEFAULT_BLOG_PAGE_SIZE);
    assert_eq!(settings.doctors.page_size.get(), DEFAULT_DOCTOR_PAGE_SIZE);
    assert_eq!(settings.backend.posts_table, DEFAULT_POSTS_TABLE);
    assert!(settings.backend.url.is_none());
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn backend_url_requires_api_key() {
    let mut raw = RawSettings::default();
    raw.backend.url = Some("https://project.backend.example".to_string());
    raw.backend.api_key = Some("   ".to_string());

    let err = Settings::from_raw(raw).expect_err("missing key");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "backend.api_key",
            ..
        }
    ));
}

#[test]
fn zero_page_size_is_rejected() {
    let mut raw = RawSettings::default();
    raw.blog.page_size = Some(0);
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "blog.page_size",
            ..
        })
    ));
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = GlobalOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn parse_content_set_arguments() {
    let args = CliArgs::parse_from([
        "carewell",
        "content",
        "set",
        "hero.title",
        "\"Open Day\"",
        "--actor",
        "editor",
        "--write",
        "--log-level",
        "debug",
    ]);

    assert_eq!(args.overrides.log_level.as_deref(), Some("debug"));
    match args.command {
        Command::Content(ContentCommand::Set(set)) => {
            assert_eq!(set.path, "hero.title");
            assert_eq!(set.value, "\"Open Day\"");
            assert_eq!(set.admin.actor, "editor");
            assert!(set.admin.write);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_schedule_toggle_arguments() {
    let args = CliArgs::parse_from([
        "carewell",
        "schedule",
        "toggle",
        "dr-ayesha-khan",
        "2024-06-03",
        "10:00 AM",
    ]);

    match args.command {
        Command::Schedule(ScheduleCommand::Toggle {
            doctor_id,
            slot,
            admin,
            ..
        }) => {
            assert_eq!(doctor_id, "dr-ayesha-khan");
            assert_eq!(slot, "10:00 AM");
            assert_eq!(admin.actor, "admin");
            assert!(!admin.write);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
#[serial]
fn config_file_and_environment_layers_resolve() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tempfile");
    writeln!(
        file,
        "[blog]\npage_size = 4\n\n[backend]\nposts_table = \"articles\"\n"
    )
    .expect("write config");

    // SAFETY: serialized with every other test that touches the environment.
    unsafe { std::env::set_var("CAREWELL__DOCTORS__PAGE_SIZE", "12") };

    let args = CliArgs::parse_from([
        "carewell".to_string(),
        "--config-file".to_string(),
        file.path().display().to_string(),
        "route".to_string(),
        "#blog".to_string(),
    ]);
    let settings = load(&args);

    unsafe { std::env::remove_var("CAREWELL__DOCTORS__PAGE_SIZE") };

    let settings = settings.expect("settings");
    assert_eq!(settings.blog.page_size.get(), 4);
    assert_eq!(settings.doctors.page_size.get(), 12);
    assert_eq!(settings.backend.posts_table, "articles");
}
