// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::ClientConfig;
use crate::listing::{ApplicationView, CountScope, ListState, StatusTab, derive_view};
use crate::models::{ApplicationStatus, ApplicationSummary};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let client = ClientConfig::load(conn)?.client()?;
    let tab_raw = sub.get_one::<String>("tab").unwrap();
    let tab = StatusTab::parse(tab_raw).ok_or_else(|| anyhow!("Unknown tab '{}'", tab_raw))?;
    let status = match sub.get_one::<String>("status") {
        Some(raw) => Some(raw.parse::<ApplicationStatus>().map_err(|e| anyhow!(e))?),
        None => None,
    };

    let mut state = ListState::new(*sub.get_one::<u32>("limit").unwrap());
    state.set_filter("status", status.map(|s| s.as_str()));
    state.set_filter("schemeId", sub.get_one::<String>("scheme").map(|s| s.as_str()));
    let ticket = state.set_page(*sub.get_one::<u32>("page").unwrap());

    let resp = client
        .list_applications(&ticket.query)
        .context("Failed to load applications")?;
    let page = state
        .accept(ticket.token, resp)
        .context("Applications response was superseded")?;
    let view = derive_view(&page, tab, sub.get_one::<String>("search").map(|s| s.as_str()));

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view.rows)? {
        print_view(&view);
    }
    Ok(())
}

fn print_view(view: &ApplicationView) {
    let rows = view.rows.iter().map(summary_row).collect();
    println!(
        "{}",
        pretty_table(
            &["Number", "Applicant", "Scheme", "Status", "Requested", "Approved"],
            rows
        )
    );
    let tabs: Vec<String> = StatusTab::ALL
        .iter()
        .map(|t| {
            let n = view.counts.get(t).copied().unwrap_or(0);
            if *t == view.tab {
                format!("[{} {}]", t.label(), n)
            } else {
                format!("{} {}", t.label(), n)
            }
        })
        .collect();
    let scope = match view.scope {
        CountScope::Page => " (this page only)",
        CountScope::Aggregate => "",
    };
    println!("{}{}", tabs.join(" | "), scope);
    println!(
        "Page {}/{} ({} total)",
        view.pagination.page,
        view.pagination.pages.max(1),
        view.pagination.total
    );
}

fn summary_row(a: &ApplicationSummary) -> Vec<String> {
    vec![
        a.application_number.clone(),
        a.applicant_name.clone(),
        a.scheme_name.clone(),
        a.status.to_string(),
        fmt_money(&a.requested_amount),
        a.approved_amount.map(|v| fmt_money(&v)).unwrap_or_default(),
    ]
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let client = ClientConfig::load(conn)?.client()?;
    let id = sub.get_one::<String>("id").unwrap();
    let detail = client
        .get_application(id)
        .with_context(|| format!("Failed to load application {}", id))?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &detail)? {
        return Ok(());
    }

    let s = &detail.summary;
    let mut rows = vec![
        vec!["Number".into(), s.application_number.clone()],
        vec!["Applicant".into(), s.applicant_name.clone()],
        vec!["Scheme".into(), s.scheme_name.clone()],
        vec!["Status".into(), s.status.to_string()],
        vec!["Requested".into(), fmt_money(&s.requested_amount)],
    ];
    if let Some(v) = s.approved_amount {
        rows.push(vec!["Approved".into(), fmt_money(&v)]);
    }
    for (label, value) in [
        ("District", &detail.district),
        ("Area", &detail.area),
        ("Phone", &detail.phone),
        ("Committee comments", &detail.committee_comments),
    ] {
        if let Some(v) = value {
            rows.push(vec![label.into(), v.clone()]);
        }
    }
    println!("{}", pretty_table(&["Field", "Value"], rows));

    if !detail.distribution_timeline.is_empty() {
        let rows = detail
            .distribution_timeline
            .iter()
            .map(|pa| {
                vec![
                    pa.phase.description.clone(),
                    format!("{}%", pa.phase.percentage),
                    fmt_money(&pa.amount),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Phase", "Share", "Amount"], rows));
    }
    Ok(())
}
