// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tempfile::tempdir;
use zakatdesk::commands::exporter::{self, ExportFormat, write_payments};
use zakatdesk::models::{Payment, PaymentStatus};
use zakatdesk::{cli, db};

fn conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

#[test]
fn export_schedule_writes_csv() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("schedule.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "zakatdesk",
        "export",
        "schedule",
        "--amount",
        "60000",
        "--payments",
        "12",
        "--start",
        "2025-01-01",
        "--out",
        &out_str,
    ]);
    if let Some(("export", sub)) = matches.subcommand() {
        exporter::handle(&conn(), sub).unwrap();
    } else {
        panic!("export command not parsed");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 13);
    assert_eq!(
        lines[0],
        "sequence,cycle,phase,due_date,amount,requires_verification"
    );
    assert_eq!(lines[1], "1,1,,2025-01-01,5000,false");
    assert_eq!(lines[12], "12,12,,2025-12-01,5000,false");
}

#[test]
fn export_schedule_json_with_phases() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("schedule.json");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "zakatdesk",
        "export",
        "schedule",
        "--amount",
        "10,000",
        "--period",
        "semi-annually",
        "--payments",
        "2",
        "--start",
        "2025-01-15",
        "--phase",
        "Rent deposit:70",
        "--phase",
        "Furniture:30:14:verify",
        "--format",
        "JSON",
        "--out",
        &out_str,
    ]);
    let (_, sub) = matches.subcommand().unwrap();
    exporter::handle(&conn(), sub).unwrap();

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 4);
    assert_eq!(arr[1]["phase"], "Furniture");
    assert_eq!(arr[1]["dueDate"], "2025-01-29");
    assert_eq!(arr[1]["requiresVerification"], true);
    assert_eq!(arr[2]["dueDate"], "2025-07-15");
    assert_eq!(arr[2]["amount"], "7000");
}

#[test]
fn invalid_schedule_writes_nothing() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("bad.csv");
    let out_str = out_path.to_string_lossy().to_string();
    let matches = cli::build_cli().get_matches_from([
        "zakatdesk",
        "export",
        "schedule",
        "--amount",
        "1000",
        "--payments",
        "61",
        "--start",
        "2025-01-01",
        "--out",
        &out_str,
    ]);
    let (_, sub) = matches.subcommand().unwrap();
    assert!(exporter::handle(&conn(), sub).is_err());
    assert!(!out_path.exists());
}

#[test]
fn payments_csv_layout() {
    let items = vec![Payment {
        id: "p-1".into(),
        application_number: "APP-9".into(),
        beneficiary_name: "Hassan, Omar".into(),
        amount: Decimal::new(250050, 2),
        due_date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
        status: PaymentStatus::Scheduled,
        phase: Some("Initial".into()),
        installment_number: Some(1),
    }];
    let mut buf = Vec::new();
    write_payments(ExportFormat::Csv, &mut buf, &items).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "id,application_number,beneficiary,phase,installment,due_date,amount,status"
    );
    assert_eq!(
        lines.next().unwrap(),
        "p-1,APP-9,\"Hassan, Omar\",Initial,1,2025-11-01,2500.50,scheduled"
    );
}

#[test]
fn unknown_format_is_rejected() {
    assert!(ExportFormat::parse("xlsx").is_err());
    assert_eq!(ExportFormat::parse(" Csv ").unwrap(), ExportFormat::Csv);
}
