// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a distribution timeline: a percentage share of the approved amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionPhase {
    pub description: String,
    pub percentage: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_from_approval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_date: Option<NaiveDate>,
    #[serde(default)]
    pub requires_verification: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DistributionPhase {
    pub fn new(description: impl Into<String>, percentage: Decimal) -> Self {
        Self {
            description: description.into(),
            percentage,
            days_from_approval: None,
            expected_date: None,
            requires_verification: false,
            notes: None,
        }
    }
}

/// A phase annotated with its currency amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseAmount {
    #[serde(flatten)]
    pub phase: DistributionPhase,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPeriod {
    Monthly,
    Quarterly,
    SemiAnnually,
    Annually,
}

impl PaymentPeriod {
    pub fn months(self) -> u32 {
        match self {
            PaymentPeriod::Monthly => 1,
            PaymentPeriod::Quarterly => 3,
            PaymentPeriod::SemiAnnually => 6,
            PaymentPeriod::Annually => 12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentPeriod::Monthly => "monthly",
            PaymentPeriod::Quarterly => "quarterly",
            PaymentPeriod::SemiAnnually => "semi_annually",
            PaymentPeriod::Annually => "annually",
        }
    }
}

impl fmt::Display for PaymentPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "monthly" => Ok(PaymentPeriod::Monthly),
            "quarterly" => Ok(PaymentPeriod::Quarterly),
            "semi_annually" | "semiannually" => Ok(PaymentPeriod::SemiAnnually),
            "annually" | "yearly" => Ok(PaymentPeriod::Annually),
            other => Err(format!(
                "Unknown period '{}' (use monthly|quarterly|semi_annually|annually)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringConfig {
    pub period: PaymentPeriod,
    pub number_of_payments: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_per_payment: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub has_distribution_timeline: bool,
}

/// A single scheduled disbursement, ready to be persisted by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub sequence: u32,
    pub cycle: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub requires_verification: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    UnderReview,
    InterviewScheduled,
    InterviewCompleted,
    CommitteeReview,
    Approved,
    Rejected,
    Disbursed,
    Completed,
    #[serde(other)]
    Unknown,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::InterviewScheduled => "interview_scheduled",
            ApplicationStatus::InterviewCompleted => "interview_completed",
            ApplicationStatus::CommitteeReview => "committee_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Disbursed => "disbursed",
            ApplicationStatus::Completed => "completed",
            ApplicationStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" => ApplicationStatus::Pending,
            "under_review" => ApplicationStatus::UnderReview,
            "interview_scheduled" => ApplicationStatus::InterviewScheduled,
            "interview_completed" => ApplicationStatus::InterviewCompleted,
            "committee_review" => ApplicationStatus::CommitteeReview,
            "approved" => ApplicationStatus::Approved,
            "rejected" => ApplicationStatus::Rejected,
            "disbursed" => ApplicationStatus::Disbursed,
            "completed" => ApplicationStatus::Completed,
            other => return Err(format!("Unknown application status '{}'", other)),
        };
        Ok(status)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub id: String,
    pub application_number: String,
    pub applicant_name: String,
    #[serde(default)]
    pub scheme_name: String,
    pub status: ApplicationStatus,
    pub requested_amount: Decimal,
    #[serde(default)]
    pub approved_amount: Option<Decimal>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub summary: ApplicationSummary,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub distribution_timeline: Vec<PhaseAmount>,
    #[serde(default)]
    pub committee_comments: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Scheduled,
    Processing,
    Completed,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Scheduled => "scheduled",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Unknown => "unknown",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s.trim().to_lowercase().as_str() {
            "pending" => PaymentStatus::Pending,
            "scheduled" => PaymentStatus::Scheduled,
            "processing" => PaymentStatus::Processing,
            "completed" => PaymentStatus::Completed,
            "failed" => PaymentStatus::Failed,
            "cancelled" => PaymentStatus::Cancelled,
            other => return Err(format!("Unknown payment status '{}'", other)),
        };
        Ok(status)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    #[serde(default)]
    pub application_number: String,
    #[serde(default)]
    pub beneficiary_name: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: PaymentStatus,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub installment_number: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate {
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheme {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub budget: Option<Decimal>,
    #[serde(default)]
    pub max_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetOverview {
    pub total_budget: Decimal,
    #[serde(default)]
    pub allocated: Decimal,
    #[serde(default)]
    pub disbursed: Decimal,
    #[serde(default)]
    pub remaining: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: String,
    pub action: String,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            total: 0,
            pages: 0,
        }
    }
}

/// List payload shared by every paginated endpoint. The item array is keyed by
/// resource name on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    #[serde(
        alias = "applications",
        alias = "payments",
        alias = "schemes",
        alias = "logs"
    )]
    pub items: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub status_counts: Option<HashMap<String, u64>>,
}
