// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::ClientConfig;
use crate::listing::ListState;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
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
        .list_schemes(&ticket.query)
        .context("Failed to load schemes")?;
    let page = state
        .accept(ticket.token, resp)
        .context("Schemes response was superseded")?;

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &page.items)? {
        let opt = |v: Option<rust_decimal::Decimal>| v.map(|d| fmt_money(&d)).unwrap_or_default();
        let rows = page
            .items
            .iter()
            .map(|s| {
                vec![
                    s.id.clone(),
                    s.name.clone(),
                    s.category.clone().unwrap_or_default(),
                    s.status.clone(),
                    opt(s.budget),
                    opt(s.max_amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Category", "Status", "Budget", "Max/Applicant"],
                rows
            )
        );
    }
    Ok(())
}
