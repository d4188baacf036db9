// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::schedule::{parse_period, phases_from};
use crate::config::ClientConfig;
use crate::decision::{DecisionKind, DecisionWorkflow};
use crate::models::{PaymentPeriod, RecurringConfig};
use crate::utils::{parse_date, parse_decimal};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::Connection;
use tracing::warn;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("decide", sub)) => decide(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Any recurring option turns the approval into a recurring plan; a lone
/// `--start` or `--repeat-timeline` means monthly with one payment.
pub fn recurring_from(sub: &clap::ArgMatches) -> Result<Option<RecurringConfig>> {
    let wants = sub.contains_id("period")
        || sub.contains_id("payments")
        || sub.contains_id("per_payment")
        || sub.contains_id("start")
        || sub.get_flag("repeat_timeline");
    if !wants {
        return Ok(None);
    }
    let period = match sub.get_one::<String>("period") {
        Some(raw) => parse_period(raw)?,
        None => PaymentPeriod::Monthly,
    };
    let amount_per_payment = match sub.get_one::<String>("per_payment") {
        Some(raw) => Some(parse_decimal(raw)?),
        None => None,
    };
    let start_date = match sub.get_one::<String>("start") {
        Some(raw) => Some(parse_date(raw)?),
        None => None,
    };
    Ok(Some(RecurringConfig {
        period,
        number_of_payments: sub.get_one::<u32>("payments").copied().unwrap_or(1),
        amount_per_payment,
        start_date,
        has_distribution_timeline: sub.get_flag("repeat_timeline"),
    }))
}

fn decide(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let client = ClientConfig::load(conn)?.client()?;
    let id = sub.get_one::<String>("application").unwrap().trim();
    let kind = if sub.get_flag("approve") {
        DecisionKind::Approve
    } else {
        DecisionKind::Reject
    };

    let detail = client
        .get_application(id)
        .with_context(|| format!("Failed to load application {}", id))?;

    let mut wf = DecisionWorkflow::new();
    wf.open(kind, &detail.summary, Utc::now().date_naive())?;
    if let Some(form) = wf.form_mut() {
        form.comments = sub.get_one::<String>("comment").unwrap().clone();
        if let Some(raw) = sub.get_one::<String>("amount") {
            form.approved_amount = Some(parse_decimal(raw)?);
        }
    }
    if kind == DecisionKind::Approve {
        wf.configure_timeline(phases_from(sub)?, recurring_from(sub)?)?;
    }
    let payload = wf.submit()?;

    if sub.get_flag("dry_run") {
        println!("{}", serde_json::to_string_pretty(&payload)?);
        wf.close();
        return Ok(());
    }

    match client.submit_committee_decision(id, &payload) {
        Ok(message) => {
            wf.complete()?;
            println!(
                "{} application {} ({} payments scheduled){}",
                match kind {
                    DecisionKind::Approve => "Approved",
                    DecisionKind::Reject => "Rejected",
                },
                detail.summary.application_number,
                payload.payment_schedule.len(),
                message.map(|m| format!(": {}", m)).unwrap_or_default()
            );
            Ok(())
        }
        Err(err) => {
            wf.submission_failed();
            warn!(application = id, error = %err, "committee decision not saved");
            Err(err).context("Committee decision was not saved; fix the inputs and run again")
        }
    }
}
