// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::ClientConfig;
use crate::utils::pretty_table;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;

/// Configuration problems that would make every API call fail.
pub fn diagnose(cfg: &ClientConfig, now: DateTime<Utc>) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    match cfg.api_url.as_deref() {
        None => rows.push(vec!["missing_api_url".into(), "run `config set --url`".into()]),
        Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
            rows.push(vec!["bad_api_url".into(), url.to_string()])
        }
        Some(url) if url.starts_with("http://") => {
            rows.push(vec!["insecure_api_url".into(), url.to_string()])
        }
        _ => {}
    }

    if cfg.token.is_none() {
        rows.push(vec!["missing_token".into(), "run `config set --token`".into()]);
    }
    if let Some(exp) = cfg.token_expires_at {
        if exp <= now {
            rows.push(vec!["token_expired".into(), exp.to_rfc3339()]);
        } else if exp - now < Duration::days(3) {
            rows.push(vec!["token_expiring_soon".into(), exp.to_rfc3339()]);
        }
    }
    if cfg.timeout_secs == 0 {
        rows.push(vec!["zero_timeout".into(), "requests would fail immediately".into()]);
    }
    rows
}

pub fn handle(conn: &Connection) -> Result<()> {
    let cfg = ClientConfig::load(conn)?;
    let mut rows = diagnose(&cfg, Utc::now());

    // Reachability only makes sense once the basics are in place.
    if rows.iter().all(|r| r[0] == "insecure_api_url" || r[0] == "token_expiring_soon") {
        let probe = cfg.client().and_then(|c| Ok(c.budget_overview()?));
        if let Err(err) = probe {
            rows.push(vec!["api_unreachable".into(), format!("{:#}", err)]);
        }
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
