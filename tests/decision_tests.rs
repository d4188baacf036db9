// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use zakatdesk::decision::{DecisionKind, DecisionState, DecisionWorkflow, WorkflowError};
use zakatdesk::models::{
    ApplicationStatus, ApplicationSummary, DistributionPhase, PaymentPeriod, RecurringConfig,
};
use zakatdesk::timeline::ValidationError;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
}

fn application(requested: &str) -> ApplicationSummary {
    ApplicationSummary {
        id: "app-42".into(),
        application_number: "APP-2025-0042".into(),
        applicant_name: "Fatima Noor".into(),
        scheme_name: "Housing Support".into(),
        status: ApplicationStatus::CommitteeReview,
        requested_amount: d(requested),
        approved_amount: None,
        submitted_at: None,
    }
}

fn split(pcts: &[&str]) -> Vec<DistributionPhase> {
    pcts.iter()
        .enumerate()
        .map(|(i, p)| DistributionPhase::new(format!("Phase {}", i + 1), d(p)))
        .collect()
}

fn open(kind: DecisionKind, requested: &str, comment: &str) -> DecisionWorkflow {
    let mut wf = DecisionWorkflow::new();
    wf.open(kind, &application(requested), today()).unwrap();
    wf.form_mut().unwrap().comments = comment.into();
    wf
}

#[test]
fn reject_goes_straight_to_submit() {
    let mut wf = open(DecisionKind::Reject, "50000", "Income above threshold");
    assert_eq!(wf.state(), DecisionState::DecisionOpen(DecisionKind::Reject));
    let payload = wf.submit().unwrap();
    assert_eq!(payload.decision, "rejected");
    assert!(payload.approved_amount.is_none());
    assert!(payload.payment_schedule.is_empty());
    assert_eq!(wf.state(), DecisionState::Submitted);
    wf.complete().unwrap();
    assert_eq!(wf.state(), DecisionState::Idle);
    assert!(wf.form().is_none());
}

#[test]
fn blank_comment_blocks_submission() {
    let mut wf = open(DecisionKind::Reject, "50000", "   ");
    let err = wf.submit().unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Validation(ValidationError::EmptyComment)
    ));
    assert_eq!(wf.state(), DecisionState::DecisionOpen(DecisionKind::Reject));
}

#[test]
fn approve_requires_timeline_step() {
    let mut wf = open(DecisionKind::Approve, "50000", "Eligible");
    assert!(matches!(
        wf.submit(),
        Err(WorkflowError::InvalidTransition { action: "submit", .. })
    ));
    wf.configure_timeline(Vec::new(), None).unwrap();
    assert_eq!(wf.state(), DecisionState::TimelineConfigured);
    let payload = wf.submit().unwrap();
    assert_eq!(payload.decision, "approved");
    assert_eq!(payload.approved_amount, Some(d("50000")));
    assert_eq!(payload.payment_schedule.len(), 1);
    assert_eq!(payload.payment_schedule[0].due_date, today());
}

#[test]
fn incomplete_timeline_is_refused() {
    let mut wf = open(DecisionKind::Approve, "50000", "Eligible");
    let err = wf
        .configure_timeline(split(&["50", "30"]), None)
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Validation(ValidationError::PercentageTotal { .. })
    ));
    assert_eq!(wf.state(), DecisionState::DecisionOpen(DecisionKind::Approve));
}

#[test]
fn timeline_not_allowed_on_reject() {
    let mut wf = open(DecisionKind::Reject, "50000", "No");
    assert!(matches!(
        wf.configure_timeline(split(&["100"]), None),
        Err(WorkflowError::TimelineOnReject)
    ));
}

#[test]
fn approved_amount_bounded_by_request() {
    let mut wf = open(DecisionKind::Approve, "50000", "Eligible");
    wf.form_mut().unwrap().approved_amount = Some(d("60000"));
    wf.configure_timeline(Vec::new(), None).unwrap();
    assert!(matches!(
        wf.submit(),
        Err(WorkflowError::Validation(ValidationError::ExceedsRequested { .. }))
    ));

    wf.form_mut().unwrap().approved_amount = Some(Decimal::ZERO);
    assert!(matches!(
        wf.submit(),
        Err(WorkflowError::Validation(ValidationError::NonPositiveAmount(_)))
    ));
}

#[test]
fn approval_with_timeline_builds_amounts_and_schedule() {
    let mut wf = open(DecisionKind::Approve, "100000", "Approved in two tranches");
    wf.form_mut().unwrap().approved_amount = Some(d("75000"));
    let mut phases = split(&["33", "33", "34"]);
    phases[1].days_from_approval = Some(30);
    phases[2].days_from_approval = Some(60);
    wf.configure_timeline(phases, None).unwrap();

    let payload = wf.submit().unwrap();
    let amounts: Vec<Decimal> = payload
        .distribution_timeline
        .iter()
        .map(|p| p.amount)
        .collect();
    assert_eq!(amounts, vec![d("24750"), d("24750"), d("25500")]);
    let dues: Vec<String> = payload
        .payment_schedule
        .iter()
        .map(|r| r.due_date.to_string())
        .collect();
    assert_eq!(dues, vec!["2025-09-01", "2025-10-01", "2025-10-31"]);
}

#[test]
fn recurring_approval_repeats_when_flagged() {
    let cfg = RecurringConfig {
        period: PaymentPeriod::Monthly,
        number_of_payments: 3,
        amount_per_payment: None,
        start_date: Some(today()),
        has_distribution_timeline: true,
    };
    let mut wf = open(DecisionKind::Approve, "9000", "Monthly support");
    wf.configure_timeline(split(&["50", "50"]), Some(cfg.clone()))
        .unwrap();
    let payload = wf.submit().unwrap();
    assert_eq!(payload.payment_schedule.len(), 6);
    assert_eq!(payload.recurring_payment, Some(cfg));

    let flat = RecurringConfig {
        has_distribution_timeline: false,
        number_of_payments: 3,
        period: PaymentPeriod::Monthly,
        amount_per_payment: None,
        start_date: Some(today()),
    };
    let mut wf = open(DecisionKind::Approve, "9000", "Monthly support");
    wf.configure_timeline(Vec::new(), Some(flat)).unwrap();
    let payload = wf.submit().unwrap();
    assert_eq!(payload.payment_schedule.len(), 3);
    assert!(payload.payment_schedule.iter().all(|r| r.amount == d("3000")));
}

#[test]
fn recurring_config_is_checked_when_configured() {
    let mut wf = open(DecisionKind::Approve, "9000", "Monthly support");
    let cfg = RecurringConfig {
        period: PaymentPeriod::Monthly,
        number_of_payments: 61,
        amount_per_payment: None,
        start_date: Some(today()),
        has_distribution_timeline: false,
    };
    assert!(matches!(
        wf.configure_timeline(Vec::new(), Some(cfg.clone())),
        Err(WorkflowError::Validation(ValidationError::PaymentCount(61)))
    ));
    let no_start = RecurringConfig {
        number_of_payments: 2,
        start_date: None,
        ..cfg
    };
    assert!(matches!(
        wf.configure_timeline(Vec::new(), Some(no_start)),
        Err(WorkflowError::Validation(ValidationError::MissingStartDate))
    ));
}

#[test]
fn failed_submission_keeps_form_for_correction() {
    let mut wf = open(DecisionKind::Approve, "50000", "Eligible");
    wf.configure_timeline(split(&["100"]), None).unwrap();
    wf.submit().unwrap();
    wf.submission_failed();
    assert_eq!(wf.state(), DecisionState::TimelineConfigured);
    let form = wf.form().unwrap();
    assert_eq!(form.comments, "Eligible");
    assert_eq!(form.phases.len(), 1);
    // resubmit after the failure
    assert!(wf.submit().is_ok());
}

#[test]
fn cannot_open_twice_or_complete_early() {
    let mut wf = open(DecisionKind::Approve, "50000", "x");
    assert!(matches!(
        wf.open(DecisionKind::Reject, &application("1"), today()),
        Err(WorkflowError::InvalidTransition { .. })
    ));
    assert!(wf.complete().is_err());
    wf.close();
    assert_eq!(wf.state(), DecisionState::Idle);
    assert!(wf.form().is_none());
}

#[test]
fn payload_uses_camel_case_keys() {
    let mut wf = open(DecisionKind::Approve, "1000", "ok");
    let mut phases = split(&["100"]);
    phases[0].requires_verification = true;
    wf.configure_timeline(phases, None).unwrap();
    let payload = wf.submit().unwrap();
    let v = serde_json::to_value(&payload).unwrap();
    assert_eq!(v["decision"], "approved");
    assert!(v.get("approvedAmount").is_some());
    assert!(v.get("recurringPayment").is_none());
    assert_eq!(v["distributionTimeline"][0]["percentage"], "100");
    assert_eq!(v["distributionTimeline"][0]["requiresVerification"], true);
    assert_eq!(v["paymentSchedule"][0]["dueDate"], "2025-09-01");
}

#[test]
fn full_fractional_approval_schedules_exactly_the_requested_amount() {
    let mut wf = open(DecisionKind::Approve, "1234.50", "Approved in full");
    wf.configure_timeline(Vec::new(), None).unwrap();
    let payload = wf.submit().unwrap();
    assert_eq!(payload.approved_amount, Some(d("1234.50")));
    let scheduled: Decimal = payload.payment_schedule.iter().map(|r| r.amount).sum();
    assert_eq!(scheduled, d("1234.50"));
    assert!(scheduled <= d("1234.50"));
}
