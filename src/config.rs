// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::api::{ApiClient, AuthContext};
use crate::utils::get_setting;

pub const KEY_API_URL: &str = "api_url";
pub const KEY_TOKEN: &str = "api_token";
pub const KEY_TOKEN_EXPIRES: &str = "token_expires_at";
pub const KEY_TIMEOUT: &str = "timeout_secs";

pub const ENV_API_URL: &str = "ZAKATDESK_API_URL";
pub const ENV_TOKEN: &str = "ZAKATDESK_TOKEN";

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

pub const KNOWN_KEYS: [&str; 4] = [KEY_API_URL, KEY_TOKEN, KEY_TOKEN_EXPIRES, KEY_TIMEOUT];

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientConfig {
    pub api_url: Option<String>,
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub token_expires_at: Option<DateTime<Utc>>,
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Stored settings with `ZAKATDESK_API_URL` / `ZAKATDESK_TOKEN` taking precedence.
    pub fn load(conn: &Connection) -> Result<Self> {
        Self::load_with(conn, |k| std::env::var(k).ok())
    }

    pub fn load_with(conn: &Connection, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let api_url = non_empty(env(ENV_API_URL)).or(non_empty(get_setting(conn, KEY_API_URL)?));
        let token = non_empty(env(ENV_TOKEN)).or(non_empty(get_setting(conn, KEY_TOKEN)?));
        let token_expires_at = match get_setting(conn, KEY_TOKEN_EXPIRES)? {
            Some(raw) => Some(parse_expiry(&raw)?),
            None => None,
        };
        let timeout_secs = match get_setting(conn, KEY_TIMEOUT)? {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid {} '{}'", KEY_TIMEOUT, raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self {
            api_url,
            token,
            token_expires_at,
            timeout_secs,
        })
    }

    pub fn auth(&self) -> Result<AuthContext> {
        let token = self
            .token
            .clone()
            .ok_or_else(|| anyhow!("No API token; run `zakatdesk config set --token <TOKEN>`"))?;
        Ok(AuthContext::new(token, self.token_expires_at))
    }

    pub fn client(&self) -> Result<ApiClient> {
        let url = self
            .api_url
            .as_deref()
            .ok_or_else(|| anyhow!("No API URL; run `zakatdesk config set --url <URL>`"))?;
        let client = ApiClient::new(url, self.auth()?, Duration::from_secs(self.timeout_secs))?;
        Ok(client)
    }
}

/// Accepts RFC 3339 timestamps or a bare `YYYY-MM-DD` (end of that day, UTC).
pub fn parse_expiry(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let day = crate::utils::parse_date(raw)
        .with_context(|| format!("Invalid token expiry '{}'", raw))?;
    day.and_hms_opt(23, 59, 59)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| anyhow!("Invalid token expiry '{}'", raw))
}

pub fn mask_token(token: &str) -> String {
    let n = token.chars().count();
    if n <= 8 {
        "*".repeat(n)
    } else {
        let tail: String = token.chars().skip(n - 4).collect();
        format!("{}{}", "*".repeat(n - 4), tail)
    }
}
