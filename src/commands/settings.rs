// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{
    ClientConfig, KEY_API_URL, KEY_TIMEOUT, KEY_TOKEN, KEY_TOKEN_EXPIRES, KNOWN_KEYS, mask_token,
    parse_expiry,
};
use crate::utils::{delete_setting, maybe_print_json, pretty_table, set_setting};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("unset", sub)) => unset(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut changed = Vec::new();
    if let Some(url) = sub.get_one::<String>("url").map(|s| s.trim()) {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow!("API URL must start with http:// or https://, got '{}'", url));
        }
        set_setting(conn, KEY_API_URL, url.trim_end_matches('/'))?;
        changed.push(KEY_API_URL);
    }
    if let Some(token) = sub.get_one::<String>("token").map(|s| s.trim()) {
        if token.is_empty() {
            return Err(anyhow!("Token must not be empty"));
        }
        set_setting(conn, KEY_TOKEN, token)?;
        changed.push(KEY_TOKEN);
    }
    if let Some(raw) = sub.get_one::<String>("expires") {
        let exp = parse_expiry(raw)?;
        set_setting(conn, KEY_TOKEN_EXPIRES, &exp.to_rfc3339())?;
        changed.push(KEY_TOKEN_EXPIRES);
    }
    if let Some(secs) = sub.get_one::<u64>("timeout") {
        if *secs == 0 {
            return Err(anyhow!("Timeout must be at least 1 second"));
        }
        set_setting(conn, KEY_TIMEOUT, &secs.to_string())?;
        changed.push(KEY_TIMEOUT);
    }
    if changed.is_empty() {
        println!("Nothing to set (use --url, --token, --expires or --timeout)");
    } else {
        info!(keys = ?changed, "settings updated");
        println!("Updated {}", changed.join(", "));
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let cfg = ClientConfig::load(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cfg)? {
        return Ok(());
    }
    let rows = vec![
        vec![
            KEY_API_URL.to_string(),
            cfg.api_url.clone().unwrap_or_else(|| "(not set)".into()),
        ],
        vec![
            KEY_TOKEN.to_string(),
            cfg.token
                .as_deref()
                .map(mask_token)
                .unwrap_or_else(|| "(not set)".into()),
        ],
        vec![
            KEY_TOKEN_EXPIRES.to_string(),
            cfg.token_expires_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "(none)".into()),
        ],
        vec![KEY_TIMEOUT.to_string(), cfg.timeout_secs.to_string()],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}

fn unset(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("key").unwrap().trim();
    if !KNOWN_KEYS.contains(&key) {
        return Err(anyhow!(
            "Unknown setting '{}' (known: {})",
            key,
            KNOWN_KEYS.join(", ")
        ));
    }
    if delete_setting(conn, key)? {
        println!("Removed {}", key);
    } else {
        println!("{} was not set", key);
    }
    Ok(())
}
