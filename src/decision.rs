// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Committee decision workflow.
//!
//! `Idle -> DecisionOpen(kind) -> [approve] TimelineConfigured -> Submitted -> Idle`.
//! The form lives only while the workflow is open; returning to `Idle` drops it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::models::{
    ApplicationSummary, DistributionPhase, PaymentRecord, PhaseAmount, RecurringConfig,
};
use crate::timeline::{self, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    Approve,
    Reject,
}

impl DecisionKind {
    pub fn wire_value(self) -> &'static str {
        match self {
            DecisionKind::Approve => "approved",
            DecisionKind::Reject => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionState {
    Idle,
    DecisionOpen(DecisionKind),
    TimelineConfigured,
    Submitted,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("cannot {action} while {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: DecisionState,
    },
    #[error("distribution timeline only applies to approvals")]
    TimelineOnReject,
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
pub struct DecisionForm {
    pub application_id: String,
    pub kind: DecisionKind,
    pub requested_amount: Decimal,
    pub approved_amount: Option<Decimal>,
    pub comments: String,
    pub approval_date: NaiveDate,
    pub phases: Vec<DistributionPhase>,
    pub recurring: Option<RecurringConfig>,
}

/// Body of `POST applications/{id}/committee-decision`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionPayload {
    pub decision: &'static str,
    pub comments: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub distribution_timeline: Vec<PhaseAmount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_payment: Option<RecurringConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub payment_schedule: Vec<PaymentRecord>,
}

#[derive(Debug)]
pub struct DecisionWorkflow {
    state: DecisionState,
    form: Option<DecisionForm>,
    resume: DecisionState,
}

impl Default for DecisionWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionWorkflow {
    pub fn new() -> Self {
        Self {
            state: DecisionState::Idle,
            form: None,
            resume: DecisionState::Idle,
        }
    }

    pub fn state(&self) -> DecisionState {
        self.state
    }

    pub fn form(&self) -> Option<&DecisionForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut DecisionForm> {
        self.form.as_mut()
    }

    pub fn open(
        &mut self,
        kind: DecisionKind,
        application: &ApplicationSummary,
        today: NaiveDate,
    ) -> Result<(), WorkflowError> {
        self.expect(DecisionState::Idle, "open a decision")?;
        self.form = Some(DecisionForm {
            application_id: application.id.clone(),
            kind,
            requested_amount: application.requested_amount,
            approved_amount: match kind {
                DecisionKind::Approve => Some(application.requested_amount),
                DecisionKind::Reject => None,
            },
            comments: String::new(),
            approval_date: today,
            phases: Vec::new(),
            recurring: None,
        });
        self.state = DecisionState::DecisionOpen(kind);
        Ok(())
    }

    /// Attaches the payment plan to an approval. An empty phase list with no
    /// recurring config means a single lump-sum payment.
    pub fn configure_timeline(
        &mut self,
        phases: Vec<DistributionPhase>,
        recurring: Option<RecurringConfig>,
    ) -> Result<(), WorkflowError> {
        match self.state {
            DecisionState::DecisionOpen(DecisionKind::Approve) | DecisionState::TimelineConfigured => {}
            DecisionState::DecisionOpen(DecisionKind::Reject) => {
                return Err(WorkflowError::TimelineOnReject);
            }
            state => {
                return Err(WorkflowError::InvalidTransition {
                    action: "configure a timeline",
                    state,
                });
            }
        }
        if !phases.is_empty() {
            timeline::validate_phases(&phases)?;
        }
        if let Some(cfg) = &recurring {
            timeline::validate_payment_count(cfg.number_of_payments)?;
            if cfg.start_date.is_none() {
                return Err(ValidationError::MissingStartDate.into());
            }
        }
        if let Some(form) = self.form.as_mut() {
            form.phases = phases;
            form.recurring = recurring;
        }
        self.state = DecisionState::TimelineConfigured;
        Ok(())
    }

    /// Validates the form and produces the payload. On success the workflow is
    /// `Submitted` until [`complete`](Self::complete) or
    /// [`submission_failed`](Self::submission_failed) is called.
    pub fn submit(&mut self) -> Result<DecisionPayload, WorkflowError> {
        let ready = matches!(
            self.state,
            DecisionState::DecisionOpen(DecisionKind::Reject) | DecisionState::TimelineConfigured
        );
        if !ready {
            return Err(WorkflowError::InvalidTransition {
                action: "submit",
                state: self.state,
            });
        }
        let form = self.form.as_ref().ok_or(WorkflowError::InvalidTransition {
            action: "submit",
            state: self.state,
        })?;
        let payload = build_payload(form)?;
        self.resume = self.state;
        self.state = DecisionState::Submitted;
        Ok(payload)
    }

    /// The backend rejected the submission: go back to editing, form intact.
    pub fn submission_failed(&mut self) {
        if self.state == DecisionState::Submitted {
            self.state = self.resume;
        }
    }

    pub fn complete(&mut self) -> Result<(), WorkflowError> {
        self.expect(DecisionState::Submitted, "complete")?;
        self.close();
        Ok(())
    }

    pub fn close(&mut self) {
        self.state = DecisionState::Idle;
        self.resume = DecisionState::Idle;
        self.form = None;
    }

    fn expect(&self, want: DecisionState, action: &'static str) -> Result<(), WorkflowError> {
        if self.state == want {
            Ok(())
        } else {
            Err(WorkflowError::InvalidTransition {
                action,
                state: self.state,
            })
        }
    }
}

pub fn build_payload(form: &DecisionForm) -> Result<DecisionPayload, ValidationError> {
    if form.comments.trim().is_empty() {
        return Err(ValidationError::EmptyComment);
    }
    if form.kind == DecisionKind::Reject {
        return Ok(DecisionPayload {
            decision: form.kind.wire_value(),
            comments: form.comments.trim().to_string(),
            approved_amount: None,
            distribution_timeline: Vec::new(),
            recurring_payment: None,
            payment_schedule: Vec::new(),
        });
    }

    let approved = form.approved_amount.unwrap_or(Decimal::ZERO);
    if approved <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(approved));
    }
    if approved > form.requested_amount {
        return Err(ValidationError::ExceedsRequested {
            approved,
            requested: form.requested_amount,
        });
    }

    let distribution_timeline = if form.phases.is_empty() {
        Vec::new()
    } else {
        timeline::validate_phases(&form.phases)?;
        timeline::compute_phase_amounts(&form.phases, approved)?
    };

    let payment_schedule = match &form.recurring {
        Some(cfg) => {
            let phases = cfg
                .has_distribution_timeline
                .then_some(form.phases.as_slice());
            timeline::compute_recurring_schedule(cfg, approved, phases)?
        }
        None => timeline::single_payment_schedule(&form.phases, approved, form.approval_date)?,
    };

    Ok(DecisionPayload {
        decision: form.kind.wire_value(),
        comments: form.comments.trim().to_string(),
        approved_amount: Some(approved),
        distribution_timeline,
        recurring_payment: form.recurring.clone(),
        payment_schedule,
    })
}
