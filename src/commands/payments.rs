// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::ClientConfig;
use crate::listing::ListState;
use crate::models::{Payment, PaymentStatus, PaymentUpdate};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("update", sub)) => update(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn parse_status(raw: &str) -> Result<PaymentStatus> {
    raw.parse::<PaymentStatus>().map_err(|e| anyhow!(e))
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let client = ClientConfig::load(conn)?.client()?;
    let status = match sub.get_one::<String>("status") {
        Some(raw) => Some(parse_status(raw)?),
        None => None,
    };
    let mut state = ListState::new(*sub.get_one::<u32>("limit").unwrap());
    state.set_filter("status", status.map(|s| s.as_str()));
    let ticket = state.set_page(*sub.get_one::<u32>("page").unwrap());
    let resp = client
        .list_payments(&ticket.query)
        .context("Failed to load payments")?;
    let page = state
        .accept(ticket.token, resp)
        .context("Payments response was superseded")?;

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &page.items)? {
        println!("{}", payments_table(&page.items));
        let p = state.pagination();
        println!("Page {}/{} ({} total)", p.page, p.pages.max(1), p.total);
    }
    Ok(())
}

pub fn payments_table(items: &[Payment]) -> comfy_table::Table {
    let rows = items
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                p.application_number.clone(),
                p.beneficiary_name.clone(),
                p.phase.clone().unwrap_or_default(),
                p.due_date.to_string(),
                fmt_money(&p.amount),
                p.status.as_str().to_string(),
            ]
        })
        .collect();
    pretty_table(
        &["ID", "Application", "Beneficiary", "Phase", "Due", "Amount", "Status"],
        rows,
    )
}

fn update(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let client = ClientConfig::load(conn)?.client()?;
    let id = sub.get_one::<String>("id").unwrap().trim();
    let update = PaymentUpdate {
        status: parse_status(sub.get_one::<String>("status").unwrap())?,
        transaction_reference: sub
            .get_one::<String>("reference")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        notes: sub
            .get_one::<String>("notes")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    };
    let message = client
        .update_payment(id, &update)
        .with_context(|| format!("Failed to update payment {}", id))?;
    println!(
        "Payment {} marked {}{}",
        id,
        update.status.as_str(),
        message.map(|m| format!(": {}", m)).unwrap_or_default()
    );
    Ok(())
}
