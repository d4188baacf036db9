// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::schedule::phases_from;
use crate::timeline;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct TimelineOutput {
    phases: Vec<crate::models::PhaseAmount>,
    totals: timeline::PhaseTotals,
    valid: bool,
}

pub fn handle(sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let phases = phases_from(sub)?;
    let amounts = timeline::compute_phase_amounts(&phases, amount)?;
    let check = timeline::validate_phases(&phases);
    let out = TimelineOutput {
        totals: timeline::phase_totals(&phases),
        valid: check.is_ok(),
        phases: amounts,
    };

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &out)? {
        let rows = out
            .phases
            .iter()
            .map(|pa| {
                vec![
                    pa.phase.description.clone(),
                    format!("{}%", pa.phase.percentage),
                    pa.phase
                        .days_from_approval
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                    fmt_money(&pa.amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Phase", "Share", "Days", "Amount"], rows)
        );
        let sum: rust_decimal::Decimal = out.phases.iter().map(|p| p.amount).sum();
        println!(
            "Total {}% -> {} of {}",
            out.totals.total,
            fmt_money(&sum),
            fmt_money(&amount)
        );
    }

    // An incomplete timeline is an error so scripts cannot submit it.
    check?;
    Ok(())
}
