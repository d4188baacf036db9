// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::{debug, warn};

use crate::models::{ApplicationStatus, ApplicationSummary, Paginated, Pagination};

/// Hands out increasing tokens so only the newest response is applied.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_latest(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }
}

/// A fetch the list is waiting on: the query to send and the token to present
/// with its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub token: u64,
    pub query: Vec<(String, String)>,
}

#[derive(Debug, Default)]
pub struct ListState {
    pagination: Pagination,
    filters: BTreeMap<String, String>,
    sequence: RequestSequence,
    // The server answered with a different page than requested.
    stalled: bool,
}

impl ListState {
    pub fn new(limit: u32) -> Self {
        Self {
            pagination: Pagination {
                limit: limit.max(1),
                ..Pagination::default()
            },
            ..Self::default()
        }
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Any filter change goes back to the first page. Blank values clear the filter.
    pub fn set_filter(&mut self, key: &str, value: Option<&str>) -> FetchTicket {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => {
                self.filters.insert(key.to_string(), v.to_string());
            }
            None => {
                self.filters.remove(key);
            }
        }
        self.pagination.page = 1;
        self.stalled = false;
        self.ticket()
    }

    pub fn set_page(&mut self, page: u32) -> FetchTicket {
        self.pagination.page = if self.pagination.pages > 0 {
            page.clamp(1, self.pagination.pages)
        } else {
            page.max(1)
        };
        self.stalled = false;
        self.ticket()
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        if self.has_next() {
            let page = self.pagination.page + 1;
            Some(self.set_page(page))
        } else {
            None
        }
    }

    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        if self.pagination.page > 1 {
            let page = self.pagination.page - 1;
            Some(self.set_page(page))
        } else {
            None
        }
    }

    /// False once the server stops honouring the requested page, so
    /// fetch-all loops terminate.
    pub fn has_next(&self) -> bool {
        !self.stalled && self.pagination.page < self.pagination.pages
    }

    pub fn refresh(&self) -> FetchTicket {
        self.ticket()
    }

    /// Applies a response if it belongs to the newest fetch; stale ones are dropped.
    pub fn accept<T>(&mut self, token: u64, page: Paginated<T>) -> Option<Paginated<T>> {
        if !self.sequence.is_latest(token) {
            debug!(token, "discarding stale list response");
            return None;
        }
        let requested = self.pagination.page;
        let echoed = page.pagination.page;
        self.pagination.total = page.pagination.total;
        self.pagination.pages = page.pagination.pages;
        self.stalled = echoed > 0 && echoed != requested;
        if self.stalled {
            warn!(requested, echoed, "server returned a different page than requested");
        }
        if echoed > 0 {
            self.pagination.page = echoed;
        }
        Some(page)
    }

    fn ticket(&self) -> FetchTicket {
        let mut query = vec![
            ("page".to_string(), self.pagination.page.to_string()),
            ("limit".to_string(), self.pagination.limit.to_string()),
        ];
        query.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        FetchTicket {
            token: self.sequence.issue(),
            query,
        }
    }
}

/// Quick-filter tabs shown above the applications list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTab {
    All,
    Pending,
    InReview,
    Approved,
    Rejected,
    Disbursed,
}

impl StatusTab {
    pub const ALL: [StatusTab; 6] = [
        StatusTab::All,
        StatusTab::Pending,
        StatusTab::InReview,
        StatusTab::Approved,
        StatusTab::Rejected,
        StatusTab::Disbursed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatusTab::All => "All",
            StatusTab::Pending => "Pending",
            StatusTab::InReview => "In Review",
            StatusTab::Approved => "Approved",
            StatusTab::Rejected => "Rejected",
            StatusTab::Disbursed => "Disbursed",
        }
    }

    pub fn parse(s: &str) -> Option<StatusTab> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "all" => Some(StatusTab::All),
            "pending" => Some(StatusTab::Pending),
            "in_review" | "review" => Some(StatusTab::InReview),
            "approved" => Some(StatusTab::Approved),
            "rejected" => Some(StatusTab::Rejected),
            "disbursed" => Some(StatusTab::Disbursed),
            _ => None,
        }
    }

    pub fn for_status(status: ApplicationStatus) -> Option<StatusTab> {
        match status {
            ApplicationStatus::Pending => Some(StatusTab::Pending),
            ApplicationStatus::UnderReview
            | ApplicationStatus::InterviewScheduled
            | ApplicationStatus::InterviewCompleted
            | ApplicationStatus::CommitteeReview => Some(StatusTab::InReview),
            ApplicationStatus::Approved => Some(StatusTab::Approved),
            ApplicationStatus::Rejected => Some(StatusTab::Rejected),
            ApplicationStatus::Disbursed | ApplicationStatus::Completed => {
                Some(StatusTab::Disbursed)
            }
            ApplicationStatus::Unknown => None,
        }
    }

    pub fn matches(self, status: ApplicationStatus) -> bool {
        self == StatusTab::All || StatusTab::for_status(status) == Some(self)
    }
}

/// Where tab counts came from. Page-scoped counts only describe the rows on
/// the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountScope {
    Page,
    Aggregate,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub tab: StatusTab,
    pub rows: Vec<ApplicationSummary>,
    pub counts: BTreeMap<StatusTab, u64>,
    pub scope: CountScope,
    pub pagination: Pagination,
}

pub fn search_pattern(term: &str) -> Option<Regex> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
        .ok()
}

fn matches_search(app: &ApplicationSummary, re: &Regex) -> bool {
    re.is_match(&app.applicant_name)
        || re.is_match(&app.application_number)
        || re.is_match(&app.scheme_name)
}

/// Derives what the applications list shows from the fetched page, the active
/// tab and the search box.
pub fn derive_view(
    page: &Paginated<ApplicationSummary>,
    tab: StatusTab,
    search: Option<&str>,
) -> ApplicationView {
    let re = search.and_then(search_pattern);
    let searched: Vec<&ApplicationSummary> = page
        .items
        .iter()
        .filter(|a| re.as_ref().is_none_or(|re| matches_search(a, re)))
        .collect();

    let (counts, scope) = match &page.status_counts {
        Some(agg) => (aggregate_counts(agg, page.pagination.total), CountScope::Aggregate),
        None => (page_counts(&searched), CountScope::Page),
    };

    let rows = searched
        .into_iter()
        .filter(|a| tab.matches(a.status))
        .cloned()
        .collect();

    ApplicationView {
        tab,
        rows,
        counts,
        scope,
        pagination: page.pagination,
    }
}

fn page_counts(items: &[&ApplicationSummary]) -> BTreeMap<StatusTab, u64> {
    let mut counts: BTreeMap<StatusTab, u64> = StatusTab::ALL.iter().map(|t| (*t, 0)).collect();
    for app in items {
        *counts.entry(StatusTab::All).or_default() += 1;
        if let Some(tab) = StatusTab::for_status(app.status) {
            *counts.entry(tab).or_default() += 1;
        }
    }
    counts
}

fn aggregate_counts(
    agg: &HashMap<String, u64>,
    total: u64,
) -> BTreeMap<StatusTab, u64> {
    let mut counts: BTreeMap<StatusTab, u64> = StatusTab::ALL.iter().map(|t| (*t, 0)).collect();
    let mut sum = 0;
    for (status, n) in agg {
        let parsed = status.parse::<ApplicationStatus>().ok();
        if let Some(tab) = parsed.and_then(StatusTab::for_status) {
            *counts.entry(tab).or_default() += n;
        }
        sum += n;
    }
    counts.insert(StatusTab::All, total.max(sum));
    counts
}
