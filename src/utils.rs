// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::models::DistributionPhase;

const UA: &str = concat!(
    "zakatdesk/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/zakatdesk)"
);

static RESOURCE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{0,63}$").expect("resource id pattern is valid")
});

pub fn http_client(timeout: std::time::Duration) -> reqwest::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(UA)
        .build()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .replace(',', "")
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Parses a `--phase` argument: `description:percentage[:days[:verify]]`.
pub fn parse_phase(s: &str) -> Result<DistributionPhase> {
    let parts: Vec<&str> = s.split(':').map(str::trim).collect();
    if parts.len() < 2 || parts.len() > 4 {
        return Err(anyhow!(
            "Invalid phase '{}', expected description:percentage[:days[:verify]]",
            s
        ));
    }
    let percentage = parse_decimal(parts[1].trim_end_matches('%'))
        .with_context(|| format!("Invalid percentage in phase '{}'", s))?;
    let mut phase = DistributionPhase::new(parts[0], percentage);
    if let Some(days) = parts.get(2).filter(|d| !d.is_empty()) {
        phase.days_from_approval = Some(
            days.parse::<u32>()
                .with_context(|| format!("Invalid day offset in phase '{}'", s))?,
        );
    }
    if let Some(flag) = parts.get(3) {
        phase.requires_verification = match flag.to_lowercase().as_str() {
            "verify" | "v" | "true" | "yes" => true,
            "" | "no" | "false" => false,
            other => {
                return Err(anyhow!(
                    "Invalid verification flag '{}' in phase '{}' (use verify|no)",
                    other,
                    s
                ));
            }
        };
    }
    Ok(phase)
}

pub fn validate_resource_id(id: &str) -> bool {
    RESOURCE_ID.is_match(id)
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn delete_setting(conn: &Connection, key: &str) -> Result<bool> {
    let n = conn.execute("DELETE FROM settings WHERE key=?1", params![key])?;
    Ok(n > 0)
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
