// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Distribution timeline and recurring payment arithmetic.
//!
//! Phase and even-split amounts are whole currency units, rounded half-up per
//! phase; a lump sum pays the approved amount as is. Rounding drift
//! between the rounded phase amounts and the approved total is reported by
//! [`schedule_summary`] but never redistributed.

use chrono::{Days, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;

use crate::models::{DistributionPhase, PaymentRecord, PhaseAmount, RecurringConfig};

pub const MIN_PAYMENTS: u32 = 1;
pub const MAX_PAYMENTS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("distribution timeline has no phases")]
    NoPhases,
    #[error("phase {index} has no description")]
    MissingDescription { index: usize },
    #[error("phase {index} percentage {percentage} is outside 0-100")]
    PercentageOutOfRange { index: usize, percentage: Decimal },
    #[error("phase percentages total {total}%, {}", describe_gap(.remaining))]
    PercentageTotal { total: Decimal, remaining: Decimal },
    #[error("number of payments must be between 1 and 60, got {0}")]
    PaymentCount(u32),
    #[error("recurring schedule needs a start date")]
    MissingStartDate,
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("payment for {0} rounds to zero")]
    ZeroPayment(String),
    #[error("approved amount {approved} exceeds requested amount {requested}")]
    ExceedsRequested { approved: Decimal, requested: Decimal },
    #[error("comments are required")]
    EmptyComment,
    #[error("date out of range: {0}")]
    DateOutOfRange(String),
}

fn describe_gap(remaining: &Decimal) -> String {
    if remaining.is_sign_negative() {
        format!("{}% over", -*remaining)
    } else {
        format!("{}% short", remaining)
    }
}

/// Running total of a phase list, as shown beside the timeline editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseTotals {
    pub total: Decimal,
    /// Positive when percentages are missing, negative when over-allocated.
    pub remaining: Decimal,
}

impl PhaseTotals {
    pub fn is_complete(&self) -> bool {
        self.remaining.is_zero()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ScheduleWarning {
    StartDateInPast { start: NaiveDate, today: NaiveDate },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleSummary {
    pub payments: usize,
    pub total: Decimal,
    pub expected: Decimal,
    /// `total - expected`; non-zero only through per-phase rounding.
    pub drift: Decimal,
    pub first_due: Option<NaiveDate>,
    pub last_due: Option<NaiveDate>,
}

/// What each recurring cycle pays out.
enum Plan {
    Phases(Vec<PhaseAmount>),
    Flat(Decimal),
}

pub fn phase_totals(phases: &[DistributionPhase]) -> PhaseTotals {
    let total: Decimal = phases.iter().map(|p| p.percentage).sum();
    PhaseTotals {
        total,
        remaining: Decimal::ONE_HUNDRED - total,
    }
}

/// Checks every phase and the 100% invariant. Submission must be blocked while
/// this returns an error.
pub fn validate_phases(phases: &[DistributionPhase]) -> Result<PhaseTotals, ValidationError> {
    if phases.is_empty() {
        return Err(ValidationError::NoPhases);
    }
    for (index, phase) in phases.iter().enumerate() {
        if phase.description.trim().is_empty() {
            return Err(ValidationError::MissingDescription { index });
        }
        if phase.percentage < Decimal::ZERO || phase.percentage > Decimal::ONE_HUNDRED {
            return Err(ValidationError::PercentageOutOfRange {
                index,
                percentage: phase.percentage,
            });
        }
    }
    let totals = phase_totals(phases);
    if !totals.is_complete() {
        return Err(ValidationError::PercentageTotal {
            total: totals.total,
            remaining: totals.remaining,
        });
    }
    Ok(totals)
}

pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

pub fn compute_phase_amounts(
    phases: &[DistributionPhase],
    approved_amount: Decimal,
) -> Result<Vec<PhaseAmount>, ValidationError> {
    ensure_positive(approved_amount)?;
    Ok(phases
        .iter()
        .map(|phase| PhaseAmount {
            amount: round_amount(approved_amount * phase.percentage / Decimal::ONE_HUNDRED),
            phase: phase.clone(),
        })
        .collect())
}

pub fn validate_payment_count(n: u32) -> Result<(), ValidationError> {
    if (MIN_PAYMENTS..=MAX_PAYMENTS).contains(&n) {
        Ok(())
    } else {
        Err(ValidationError::PaymentCount(n))
    }
}

pub fn default_amount_per_payment(
    approved_amount: Decimal,
    number_of_payments: u32,
) -> Result<Decimal, ValidationError> {
    validate_payment_count(number_of_payments)?;
    ensure_positive(approved_amount)?;
    Ok(round_amount(approved_amount / Decimal::from(number_of_payments)))
}

/// Builds the full payment schedule for a recurring approval.
///
/// With a non-empty phase list the pattern repeats once per cycle, cycle `i`
/// anchored at `start + i * period`, each phase due `days_from_approval` days
/// after its anchor. Otherwise a flat amount is paid once per cycle.
pub fn compute_recurring_schedule(
    config: &RecurringConfig,
    approved_amount: Decimal,
    phases: Option<&[DistributionPhase]>,
) -> Result<Vec<PaymentRecord>, ValidationError> {
    validate_payment_count(config.number_of_payments)?;
    let start = config.start_date.ok_or(ValidationError::MissingStartDate)?;
    ensure_positive(approved_amount)?;

    let plan = match phases {
        Some(list) if !list.is_empty() => {
            validate_phases(list)?;
            let amounts = compute_phase_amounts(list, approved_amount)?;
            for pa in &amounts {
                ensure_payable(pa.amount, &pa.phase.description)?;
            }
            Plan::Phases(amounts)
        }
        _ => {
            let amount = match config.amount_per_payment {
                Some(amount) => {
                    ensure_positive(amount)?;
                    amount
                }
                None => default_amount_per_payment(approved_amount, config.number_of_payments)?,
            };
            ensure_payable(amount, "each cycle")?;
            Plan::Flat(amount)
        }
    };

    let per_cycle = match &plan {
        Plan::Phases(amounts) => amounts.len(),
        Plan::Flat(_) => 1,
    };
    let mut records = Vec::with_capacity(config.number_of_payments as usize * per_cycle);
    for cycle in 0..config.number_of_payments {
        let anchor = cycle_anchor(start, config, cycle)?;
        match &plan {
            Plan::Phases(amounts) => {
                for pa in amounts {
                    let due = offset_days(anchor, pa.phase.days_from_approval.unwrap_or(0))?;
                    records.push(PaymentRecord {
                        sequence: records.len() as u32 + 1,
                        cycle,
                        phase: Some(pa.phase.description.clone()),
                        due_date: due,
                        amount: pa.amount,
                        requires_verification: pa.phase.requires_verification,
                    });
                }
            }
            Plan::Flat(amount) => records.push(PaymentRecord {
                sequence: cycle + 1,
                cycle,
                phase: None,
                due_date: anchor,
                amount: *amount,
                requires_verification: false,
            }),
        }
    }
    Ok(records)
}

/// Schedule for a one-off approval: one record per phase, or a single lump sum
/// of exactly the approved amount when no timeline was configured.
pub fn single_payment_schedule(
    phases: &[DistributionPhase],
    approved_amount: Decimal,
    approval_date: NaiveDate,
) -> Result<Vec<PaymentRecord>, ValidationError> {
    ensure_positive(approved_amount)?;
    if phases.is_empty() {
        return Ok(vec![PaymentRecord {
            sequence: 1,
            cycle: 0,
            phase: None,
            due_date: approval_date,
            amount: approved_amount,
            requires_verification: false,
        }]);
    }
    validate_phases(phases)?;
    compute_phase_amounts(phases, approved_amount)?
        .into_iter()
        .enumerate()
        .map(|(i, pa)| {
            ensure_payable(pa.amount, &pa.phase.description)?;
            let due = match pa.phase.expected_date {
                Some(d) => d,
                None => offset_days(approval_date, pa.phase.days_from_approval.unwrap_or(0))?,
            };
            Ok(PaymentRecord {
                sequence: i as u32 + 1,
                cycle: 0,
                phase: Some(pa.phase.description),
                due_date: due,
                amount: pa.amount,
                requires_verification: pa.phase.requires_verification,
            })
        })
        .collect()
}

pub fn schedule_warnings(config: &RecurringConfig, today: NaiveDate) -> Vec<ScheduleWarning> {
    match config.start_date {
        Some(start) if start < today => vec![ScheduleWarning::StartDateInPast { start, today }],
        _ => Vec::new(),
    }
}

pub fn schedule_summary(records: &[PaymentRecord], expected: Decimal) -> ScheduleSummary {
    let total: Decimal = records.iter().map(|r| r.amount).sum();
    ScheduleSummary {
        payments: records.len(),
        total,
        expected,
        drift: total - expected,
        first_due: records.iter().map(|r| r.due_date).min(),
        last_due: records.iter().map(|r| r.due_date).max(),
    }
}

/// What a recurring schedule should add up to when nothing is lost to rounding.
pub fn expected_recurring_total(
    config: &RecurringConfig,
    approved_amount: Decimal,
    with_timeline: bool,
) -> Decimal {
    let n = Decimal::from(config.number_of_payments);
    match (with_timeline, config.amount_per_payment) {
        (true, _) => approved_amount * n,
        (false, Some(per)) => per * n,
        (false, None) => approved_amount,
    }
}

fn cycle_anchor(
    start: NaiveDate,
    config: &RecurringConfig,
    cycle: u32,
) -> Result<NaiveDate, ValidationError> {
    // Month arithmetic clamps to the last day of shorter months.
    start
        .checked_add_months(Months::new(cycle * config.period.months()))
        .ok_or_else(|| ValidationError::DateOutOfRange(format!("{} + {} cycles", start, cycle)))
}

fn offset_days(date: NaiveDate, days: u32) -> Result<NaiveDate, ValidationError> {
    date.checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(|| ValidationError::DateOutOfRange(format!("{} + {} days", date, days)))
}

fn ensure_payable(amount: Decimal, what: &str) -> Result<(), ValidationError> {
    if amount.is_zero() {
        Err(ValidationError::ZeroPayment(what.to_string()))
    } else {
        Ok(())
    }
}

fn ensure_positive(amount: Decimal) -> Result<(), ValidationError> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveAmount(amount))
    }
}
