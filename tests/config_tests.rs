// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, TimeZone, Utc};
use rusqlite::Connection;
use zakatdesk::config::{
    ClientConfig, DEFAULT_TIMEOUT_SECS, ENV_API_URL, ENV_TOKEN, KEY_API_URL, KEY_TIMEOUT,
    KEY_TOKEN, KEY_TOKEN_EXPIRES, mask_token, parse_expiry,
};
use zakatdesk::utils::{get_setting, set_setting};
use zakatdesk::{cli, commands, db};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_when_nothing_stored() {
    let conn = setup();
    let cfg = ClientConfig::load_with(&conn, no_env).unwrap();
    assert!(cfg.api_url.is_none());
    assert!(cfg.token.is_none());
    assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
    assert!(cfg.client().is_err());
}

#[test]
fn env_overrides_stored_values() {
    let conn = setup();
    set_setting(&conn, KEY_API_URL, "https://stored.example.org").unwrap();
    set_setting(&conn, KEY_TOKEN, "stored-token").unwrap();
    set_setting(&conn, KEY_TIMEOUT, "30").unwrap();

    let cfg = ClientConfig::load_with(&conn, |k| match k {
        k if k == ENV_TOKEN => Some("env-token".to_string()),
        k if k == ENV_API_URL => Some("   ".to_string()),
        _ => None,
    })
    .unwrap();
    assert_eq!(cfg.token.as_deref(), Some("env-token"));
    assert_eq!(cfg.api_url.as_deref(), Some("https://stored.example.org"));
    assert_eq!(cfg.timeout_secs, 30);
    assert_eq!(cfg.auth().unwrap().token(), "env-token");
}

#[test]
fn bad_timeout_is_reported() {
    let conn = setup();
    set_setting(&conn, KEY_TIMEOUT, "soon").unwrap();
    assert!(ClientConfig::load_with(&conn, no_env).is_err());
}

#[test]
fn expiry_accepts_rfc3339_and_plain_dates() {
    let ts = parse_expiry("2025-12-01T08:30:00+05:00").unwrap();
    assert_eq!(ts, Utc.with_ymd_and_hms(2025, 12, 1, 3, 30, 0).unwrap());
    let day = parse_expiry("2025-12-01").unwrap();
    assert_eq!(day, Utc.with_ymd_and_hms(2025, 12, 1, 23, 59, 59).unwrap());
    assert!(parse_expiry("next week").is_err());
}

#[test]
fn token_masking() {
    assert_eq!(mask_token("abc"), "***");
    assert_eq!(mask_token("abcdefghijkl"), "********ijkl");
}

#[test]
fn config_set_trims_and_stores() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "zakatdesk",
        "config",
        "set",
        "--url",
        " https://erp.example.org/api/ ",
        "--token",
        " secret-token ",
        "--expires",
        "2030-01-31",
        "--timeout",
        "20",
    ]);
    if let Some(("config", sub)) = matches.subcommand() {
        commands::settings::handle(&conn, sub).unwrap();
    } else {
        panic!("config command not parsed");
    }
    assert_eq!(
        get_setting(&conn, KEY_API_URL).unwrap().as_deref(),
        Some("https://erp.example.org/api")
    );
    assert_eq!(
        get_setting(&conn, KEY_TOKEN).unwrap().as_deref(),
        Some("secret-token")
    );
    assert!(get_setting(&conn, KEY_TOKEN_EXPIRES).unwrap().unwrap().starts_with("2030-01-31T23:59:59"));
    assert_eq!(get_setting(&conn, KEY_TIMEOUT).unwrap().as_deref(), Some("20"));
}

#[test]
fn config_set_rejects_non_http_urls() {
    let conn = setup();
    let matches =
        cli::build_cli().get_matches_from(["zakatdesk", "config", "set", "--url", "ftp://x"]);
    let (_, sub) = matches.subcommand().unwrap();
    assert!(commands::settings::handle(&conn, sub).is_err());
    assert!(get_setting(&conn, KEY_API_URL).unwrap().is_none());
}

#[test]
fn config_unset_only_known_keys() {
    let conn = setup();
    set_setting(&conn, KEY_TOKEN, "t").unwrap();
    let matches = cli::build_cli().get_matches_from(["zakatdesk", "config", "unset", KEY_TOKEN]);
    let (_, sub) = matches.subcommand().unwrap();
    commands::settings::handle(&conn, sub).unwrap();
    assert!(get_setting(&conn, KEY_TOKEN).unwrap().is_none());

    let matches = cli::build_cli().get_matches_from(["zakatdesk", "config", "unset", "colour"]);
    let (_, sub) = matches.subcommand().unwrap();
    assert!(commands::settings::handle(&conn, sub).is_err());
}

#[test]
fn doctor_flags_missing_and_expiring_settings() {
    let now = Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap();
    let issues = |cfg: &ClientConfig| -> Vec<String> {
        commands::doctor::diagnose(cfg, now)
            .into_iter()
            .map(|r| r[0].clone())
            .collect()
    };

    let empty = ClientConfig {
        timeout_secs: DEFAULT_TIMEOUT_SECS,
        ..ClientConfig::default()
    };
    assert_eq!(issues(&empty), vec!["missing_api_url", "missing_token"]);

    let mut cfg = ClientConfig {
        api_url: Some("https://erp.example.org".into()),
        token: Some("t".into()),
        token_expires_at: Some(now + Duration::days(1)),
        timeout_secs: DEFAULT_TIMEOUT_SECS,
    };
    assert_eq!(issues(&cfg), vec!["token_expiring_soon"]);

    cfg.token_expires_at = Some(now - Duration::hours(1));
    cfg.api_url = Some("http://erp.example.org".into());
    assert_eq!(issues(&cfg), vec!["insecure_api_url", "token_expired"]);

    cfg.token_expires_at = None;
    cfg.api_url = Some("https://erp.example.org".into());
    assert!(issues(&cfg).is_empty());
}
