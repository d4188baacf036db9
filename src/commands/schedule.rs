// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{DistributionPhase, PaymentPeriod, PaymentRecord, RecurringConfig};
use crate::timeline::{self, ScheduleWarning};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, parse_phase, pretty_table};
use anyhow::{Result, anyhow};
use chrono::Utc;
use rust_decimal::Decimal;

pub struct ScheduleRequest {
    pub approved_amount: Decimal,
    pub config: RecurringConfig,
    pub phases: Vec<DistributionPhase>,
}

pub fn phases_from(sub: &clap::ArgMatches) -> Result<Vec<DistributionPhase>> {
    sub.get_many::<String>("phase")
        .map(|vals| vals.map(|v| parse_phase(v)).collect())
        .unwrap_or_else(|| Ok(Vec::new()))
}

pub fn parse_period(raw: &str) -> Result<PaymentPeriod> {
    raw.parse::<PaymentPeriod>().map_err(|e| anyhow!(e))
}

pub fn request_from(sub: &clap::ArgMatches) -> Result<ScheduleRequest> {
    let approved_amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let period = parse_period(sub.get_one::<String>("period").unwrap())?;
    let number_of_payments = *sub.get_one::<u32>("payments").unwrap();
    let start_date = Some(parse_date(sub.get_one::<String>("start").unwrap())?);
    let amount_per_payment = match sub.get_one::<String>("per_payment") {
        Some(raw) => Some(parse_decimal(raw)?),
        None => None,
    };
    let phases = phases_from(sub)?;
    Ok(ScheduleRequest {
        approved_amount,
        config: RecurringConfig {
            period,
            number_of_payments,
            amount_per_payment,
            start_date,
            has_distribution_timeline: !phases.is_empty(),
        },
        phases,
    })
}

pub fn compute(req: &ScheduleRequest) -> Result<Vec<PaymentRecord>> {
    let phases = (!req.phases.is_empty()).then_some(req.phases.as_slice());
    Ok(timeline::compute_recurring_schedule(
        &req.config,
        req.approved_amount,
        phases,
    )?)
}

pub fn handle(sub: &clap::ArgMatches) -> Result<()> {
    let req = request_from(sub)?;
    let records = compute(&req)?;
    for w in timeline::schedule_warnings(&req.config, Utc::now().date_naive()) {
        match w {
            ScheduleWarning::StartDateInPast { start, today } => {
                eprintln!("warning: start date {} is before today ({})", start, today)
            }
        }
    }
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &records)? {
        return Ok(());
    }
    println!("{}", schedule_table(&records));

    let expected = timeline::expected_recurring_total(
        &req.config,
        req.approved_amount,
        !req.phases.is_empty(),
    );
    let summary = timeline::schedule_summary(&records, expected);
    println!(
        "{} payments, total {} ({} {}), drift {}",
        summary.payments,
        fmt_money(&summary.total),
        req.config.number_of_payments,
        req.config.period,
        fmt_money(&summary.drift)
    );
    Ok(())
}

pub fn schedule_table(records: &[PaymentRecord]) -> comfy_table::Table {
    let rows = records
        .iter()
        .map(|r| {
            vec![
                r.sequence.to_string(),
                (r.cycle + 1).to_string(),
                r.phase.clone().unwrap_or_default(),
                r.due_date.to_string(),
                fmt_money(&r.amount),
                if r.requires_verification { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    pretty_table(
        &["#", "Cycle", "Phase", "Due", "Amount", "Verify"],
        rows,
    )
}
