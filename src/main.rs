// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use zakatdesk::{cli, commands, db};

fn init_logging() {
    let filter = EnvFilter::try_from_env("ZAKATDESK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let json = std::env::var("ZAKATDESK_LOG_JSON").is_ok_and(|v| v == "1" || v == "true");
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("config", sub)) => commands::settings::handle(&conn, sub)?,
        Some(("timeline", sub)) => commands::timeline::handle(sub)?,
        Some(("schedule", sub)) => commands::schedule::handle(sub)?,
        Some(("applications", sub)) => commands::applications::handle(&conn, sub)?,
        Some(("committee", sub)) => commands::committee::handle(&conn, sub)?,
        Some(("payments", sub)) => commands::payments::handle(&conn, sub)?,
        Some(("schemes", sub)) => commands::schemes::handle(&conn, sub)?,
        Some(("budget", sub)) => commands::budget::handle(&conn, sub)?,
        Some(("activity", sub)) => commands::activity::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
