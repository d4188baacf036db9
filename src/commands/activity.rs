// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::ClientConfig;
use crate::listing::ListState;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let client = ClientConfig::load(conn)?.client()?;
    let mut state = ListState::new(*sub.get_one::<u32>("limit").unwrap());
    let ticket = state.set_page(*sub.get_one::<u32>("page").unwrap());
    let resp = client
        .list_activity_logs(&ticket.query)
        .context("Failed to load activity logs")?;
    let page = state
        .accept(ticket.token, resp)
        .context("Activity response was superseded")?;

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &page.items)? {
        let rows = page
            .items
            .iter()
            .map(|l| {
                vec![
                    l.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    l.user_name.clone().unwrap_or_default(),
                    l.action.clone(),
                    l.resource.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["When", "User", "Action", "Resource"], rows));
    }
    Ok(())
}
