// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::commands::schedule;
use crate::config::ClientConfig;
use crate::listing::ListState;
use crate::models::{Payment, PaymentRecord};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use std::io::Write;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(anyhow!("Unknown format: {} (use csv|json)", other)),
        }
    }
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("payments", sub)) => export_payments(conn, sub),
        Some(("schedule", sub)) => export_schedule(sub),
        _ => Ok(()),
    }
}

fn export_payments(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = ExportFormat::parse(sub.get_one::<String>("format").unwrap())?;
    let out = sub.get_one::<String>("out").unwrap().trim();
    let status = match sub.get_one::<String>("status") {
        Some(raw) => Some(crate::commands::payments::parse_status(raw)?),
        None => None,
    };
    let client = ClientConfig::load(conn)?.client()?;
    let items = fetch_all_payments(&client, status.map(|s| s.as_str()))?;

    let file = std::fs::File::create(out).with_context(|| format!("Create {}", out))?;
    write_payments(fmt, file, &items)?;
    info!(count = items.len(), path = out, "payments exported");
    println!("Exported {} payments to {}", items.len(), out);
    Ok(())
}

fn fetch_all_payments(client: &ApiClient, status: Option<&str>) -> Result<Vec<Payment>> {
    let mut state = ListState::new(100);
    let mut ticket = state.set_filter("status", status);
    let mut items = Vec::new();
    loop {
        let resp = client
            .list_payments(&ticket.query)
            .context("Failed to load payments")?;
        let page = state
            .accept(ticket.token, resp)
            .context("Payments response was superseded")?;
        items.extend(page.items);
        match state.next_page() {
            Some(next) => ticket = next,
            None => break,
        }
    }
    Ok(items)
}

fn export_schedule(sub: &clap::ArgMatches) -> Result<()> {
    let fmt = ExportFormat::parse(sub.get_one::<String>("format").unwrap())?;
    let out = sub.get_one::<String>("out").unwrap().trim();
    let req = schedule::request_from(sub)?;
    let records = schedule::compute(&req)?;
    let file = std::fs::File::create(out).with_context(|| format!("Create {}", out))?;
    write_schedule(fmt, file, &records)?;
    println!("Exported {} scheduled payments to {}", records.len(), out);
    Ok(())
}

pub fn write_payments<W: Write>(fmt: ExportFormat, w: W, items: &[Payment]) -> Result<()> {
    match fmt {
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(w);
            wtr.write_record([
                "id",
                "application_number",
                "beneficiary",
                "phase",
                "installment",
                "due_date",
                "amount",
                "status",
            ])?;
            for p in items {
                wtr.write_record([
                    p.id.clone(),
                    p.application_number.clone(),
                    p.beneficiary_name.clone(),
                    p.phase.clone().unwrap_or_default(),
                    p.installment_number.map(|n| n.to_string()).unwrap_or_default(),
                    p.due_date.to_string(),
                    p.amount.to_string(),
                    p.status.as_str().to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        ExportFormat::Json => serde_json::to_writer_pretty(w, items)?,
    }
    Ok(())
}

pub fn write_schedule<W: Write>(fmt: ExportFormat, w: W, records: &[PaymentRecord]) -> Result<()> {
    match fmt {
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(w);
            wtr.write_record(["sequence", "cycle", "phase", "due_date", "amount", "requires_verification"])?;
            for r in records {
                wtr.write_record([
                    r.sequence.to_string(),
                    (r.cycle + 1).to_string(),
                    r.phase.clone().unwrap_or_default(),
                    r.due_date.to_string(),
                    r.amount.to_string(),
                    r.requires_verification.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        ExportFormat::Json => serde_json::to_writer_pretty(w, records)?,
    }
    Ok(())
}
