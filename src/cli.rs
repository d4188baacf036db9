// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

fn json_flags() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

fn page_args(default_limit: &'static str) -> [Arg; 2] {
    [
        Arg::new("page")
            .long("page")
            .value_parser(value_parser!(u32))
            .default_value("1"),
        Arg::new("limit")
            .long("limit")
            .value_parser(value_parser!(u32))
            .default_value(default_limit),
    ]
}

fn phase_arg() -> Arg {
    Arg::new("phase")
        .long("phase")
        .action(ArgAction::Append)
        .value_name("DESC:PCT[:DAYS[:verify]]")
        .help("Distribution phase; repeat for each phase")
}

/// Arguments shared by every command that builds a payment schedule.
fn schedule_args() -> Vec<Arg> {
    vec![
        Arg::new("amount")
            .long("amount")
            .required(true)
            .help("Approved amount"),
        Arg::new("period")
            .long("period")
            .default_value("monthly")
            .help("monthly|quarterly|semi_annually|annually"),
        Arg::new("payments")
            .long("payments")
            .value_parser(value_parser!(u32))
            .default_value("1")
            .help("Number of payments (1-60)"),
        Arg::new("start")
            .long("start")
            .required(true)
            .help("First due date YYYY-MM-DD"),
        Arg::new("per_payment")
            .long("per-payment")
            .help("Flat amount per payment (default: amount / payments)"),
        phase_arg(),
    ]
}

pub fn build_cli() -> Command {
    Command::new("zakatdesk")
        .about("Admin client for welfare disbursement: applications, committee decisions and payment schedules")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(false)
        .subcommand(
            Command::new("config")
                .about("Manage API connection settings")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("url").long("url").help("API base URL"))
                        .arg(Arg::new("token").long("token").help("Bearer token"))
                        .arg(
                            Arg::new("expires")
                                .long("expires")
                                .help("Token expiry (RFC 3339 or YYYY-MM-DD)"),
                        )
                        .arg(
                            Arg::new("timeout")
                                .long("timeout")
                                .value_parser(value_parser!(u64))
                                .help("Request timeout in seconds"),
                        ),
                )
                .subcommand(Command::new("show").args(json_flags()))
                .subcommand(Command::new("unset").arg(Arg::new("key").required(true))),
        )
        .subcommand(
            Command::new("timeline")
                .about("Split an approved amount across distribution phases")
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(phase_arg().required(true))
                .args(json_flags()),
        )
        .subcommand(
            Command::new("schedule")
                .about("Compute a recurring payment schedule")
                .args(schedule_args())
                .args(json_flags()),
        )
        .subcommand(
            Command::new("applications")
                .visible_alias("app")
                .about("Beneficiary applications")
                .subcommand(
                    Command::new("list")
                        .args(page_args("10"))
                        .arg(Arg::new("status").long("status"))
                        .arg(Arg::new("scheme").long("scheme").help("Scheme id"))
                        .arg(Arg::new("search").long("search"))
                        .arg(
                            Arg::new("tab")
                                .long("tab")
                                .default_value("all")
                                .help("all|pending|in_review|approved|rejected|disbursed"),
                        )
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("show")
                        .arg(Arg::new("id").required(true))
                        .args(json_flags()),
                ),
        )
        .subcommand(
            Command::new("committee")
                .about("Committee decisions")
                .subcommand(
                    Command::new("decide")
                        .arg(Arg::new("application").long("application").required(true))
                        .arg(Arg::new("approve").long("approve").action(ArgAction::SetTrue))
                        .arg(Arg::new("reject").long("reject").action(ArgAction::SetTrue))
                        .group(
                            ArgGroup::new("decision")
                                .args(["approve", "reject"])
                                .required(true),
                        )
                        .arg(Arg::new("comment").long("comment").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .help("Approved amount (default: requested amount)"),
                        )
                        .arg(phase_arg())
                        .arg(Arg::new("period").long("period"))
                        .arg(
                            Arg::new("payments")
                                .long("payments")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(Arg::new("start").long("start"))
                        .arg(Arg::new("per_payment").long("per-payment"))
                        .arg(
                            Arg::new("repeat_timeline")
                                .long("repeat-timeline")
                                .action(ArgAction::SetTrue)
                                .help("Repeat the phase pattern in every recurring cycle"),
                        )
                        .arg(
                            Arg::new("dry_run")
                                .long("dry-run")
                                .action(ArgAction::SetTrue)
                                .help("Print the payload without submitting"),
                        ),
                ),
        )
        .subcommand(
            Command::new("payments")
                .about("Scheduled payments")
                .subcommand(
                    Command::new("list")
                        .args(page_args("20"))
                        .arg(Arg::new("status").long("status"))
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("status").long("status").required(true))
                        .arg(Arg::new("reference").long("reference"))
                        .arg(Arg::new("notes").long("notes")),
                ),
        )
        .subcommand(
            Command::new("schemes")
                .about("Welfare schemes")
                .subcommand(Command::new("list").args(page_args("50")).args(json_flags())),
        )
        .subcommand(
            Command::new("budget")
                .about("Budget figures")
                .subcommand(Command::new("overview").args(json_flags())),
        )
        .subcommand(
            Command::new("activity")
                .about("Activity logs")
                .subcommand(Command::new("list").args(page_args("20")).args(json_flags())),
        )
        .subcommand(
            Command::new("export")
                .about("Export data to CSV or JSON")
                .subcommand(
                    Command::new("payments")
                        .arg(Arg::new("status").long("status"))
                        .arg(Arg::new("format").long("format").default_value("csv"))
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("schedule")
                        .args(schedule_args())
                        .arg(Arg::new("format").long("format").default_value("csv"))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check configuration and API reachability"))
}
