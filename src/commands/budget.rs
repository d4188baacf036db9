// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::ClientConfig;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("overview", sub)) => overview(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn overview(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let client = ClientConfig::load(conn)?.client()?;
    let o = client
        .budget_overview()
        .context("Failed to load budget overview")?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &o)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Total budget".into(), fmt_money(&o.total_budget)],
        vec!["Allocated".into(), fmt_money(&o.allocated)],
        vec!["Disbursed".into(), fmt_money(&o.disbursed)],
        vec!["Remaining".into(), fmt_money(&o.remaining)],
    ];
    println!("{}", pretty_table(&["", "Amount"], rows));
    Ok(())
}
