// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketbook::commands::budgets;
use pocketbook::engine::{StatusLevel, budget_report, budget_status};
use pocketbook::models::Period;
use pocketbook::source::{MockSource, load_statistics};
use pocketbook::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn run_budget(conn: &Connection, args: &[&str]) {
    let mut argv = vec!["pocketbook", "budget"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("budget", m)) = matches.subcommand() {
        budgets::handle(conn, m).unwrap();
    } else {
        panic!("no budget subcommand");
    }
}

#[test]
fn status_within_budget() {
    let s = budget_status(dec("1500"), dec("1200"));
    assert_eq!(s.percentage, 80);
    assert_eq!(s.level, StatusLevel::Warning);
    assert_eq!(s.remaining(), dec("300"));
    assert_eq!(s.message("USD"), "$300.00 remaining");
}

#[test]
fn status_overspent_is_clamped() {
    let s = budget_status(dec("1000"), dec("1200"));
    assert_eq!(s.level, StatusLevel::Danger);
    assert_eq!(s.percentage, 100);
    assert_eq!(s.raw_percentage, dec("120"));
    assert_eq!(s.overspent(), dec("200"));
    assert_eq!(s.remaining(), Decimal::ZERO);
    assert_eq!(s.message("USD"), "Overspent by $200.00");
}

#[test]
fn status_thresholds() {
    assert_eq!(budget_status(dec("100"), dec("74")).level, StatusLevel::Success);
    assert_eq!(budget_status(dec("100"), dec("75")).level, StatusLevel::Warning);
    assert_eq!(budget_status(dec("100"), dec("99")).level, StatusLevel::Warning);
    assert_eq!(budget_status(dec("100"), dec("100")).level, StatusLevel::Danger);
    // 74.9% rounds to 75
    assert_eq!(budget_status(dec("1000"), dec("749")).level, StatusLevel::Warning);
    assert_eq!(budget_status(dec("3"), dec("1")).percentage, 33);
}

#[test]
fn zero_budget_reports_zero_percent() {
    let s = budget_status(Decimal::ZERO, dec("50"));
    assert_eq!(s.percentage, 0);
    assert_eq!(s.raw_percentage, Decimal::ZERO);
    assert_eq!(s.level, StatusLevel::Success);
}

#[test]
fn report_for_sample_month() {
    let stats = load_statistics(&MockSource::sample(), Period::new(4, 2025).unwrap()).unwrap();
    let lines = budget_report(&stats);
    let view: Vec<(&str, u32, StatusLevel)> = lines
        .iter()
        .map(|l| (l.category.as_str(), l.status.percentage, l.status.level))
        .collect();
    assert_eq!(
        view,
        [
            ("Food", 30, StatusLevel::Success),
            ("Housing", 80, StatusLevel::Warning),
            ("Transportation", 0, StatusLevel::Success),
            ("Entertainment", 0, StatusLevel::Success),
        ]
    );
    assert_eq!(lines[0].status.message("USD"), "$350.00 remaining");
}

#[test]
fn setting_a_budget_twice_updates_it() {
    let conn = setup();
    let args = ["set", "--category", "Food", "--amount", "100", "--month", "4", "--year", "2025"];
    run_budget(&conn, &args);
    run_budget(
        &conn,
        &["set", "--category", "Food", "--amount", "250.50", "--month", "4", "--year", "2025"],
    );

    let rows = budgets::for_period(&conn, Some(Period::new(4, 2025).unwrap())).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, Some(dec("250.50")));
}

#[test]
fn budgets_are_scoped_by_month() {
    let conn = setup();
    let april = Period::new(4, 2025).unwrap();
    let may = Period::new(5, 2025).unwrap();
    budgets::upsert(&conn, "Food", dec("100"), april).unwrap();
    budgets::upsert(&conn, "Food", dec("120"), may).unwrap();

    assert_eq!(budgets::for_period(&conn, Some(april)).unwrap().len(), 1);
    assert_eq!(budgets::for_period(&conn, None).unwrap().len(), 2);
}

#[test]
fn negative_budget_is_rejected() {
    let conn = setup();
    let april = Period::new(4, 2025).unwrap();
    assert!(budgets::upsert(&conn, "Food", dec("-1"), april).is_err());
}

#[test]
fn removing_a_missing_budget_fails() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from(["pocketbook", "budget", "rm", "--id", "42"]);
    let Some(("budget", m)) = matches.subcommand() else {
        panic!("no budget subcommand");
    };
    assert!(budgets::handle(&conn, m).is_err());
}

#[test]
fn huge_spend_on_a_tiny_budget_saturates() {
    let s = budget_status(dec("0.01"), Decimal::MAX);
    assert_eq!(s.level, StatusLevel::Danger);
    assert_eq!(s.percentage, 100);
    assert_eq!(s.raw_percentage, Decimal::MAX);
    assert!(s.message("USD").starts_with("Overspent by $"));
}

#[test]
fn edit_moves_a_budget_to_another_month() {
    let conn = setup();
    let id = budgets::upsert(&conn, "Food", dec("100"), Period::new(4, 2025).unwrap()).unwrap();
    let id_arg = id.to_string();
    run_budget(
        &conn,
        &["edit", "--id", id_arg.as_str(), "--amount", "180", "--month", "6"],
    );

    let b = budgets::get(&conn, id).unwrap().validate().unwrap();
    assert_eq!(b.amount, dec("180"));
    assert_eq!(b.period, Period::new(6, 2025).unwrap());
    assert_eq!(b.category, "Food");
    run_budget(&conn, &["show", "--id", id_arg.as_str(), "--json"]);
}

#[test]
fn edit_onto_an_existing_budget_fails_cleanly() {
    let conn = setup();
    let april = Period::new(4, 2025).unwrap();
    let food = budgets::upsert(&conn, "Food", dec("100"), april).unwrap();
    let rent = budgets::upsert(&conn, "Housing", dec("1200"), april).unwrap();

    let rent_id = rent.to_string();
    let matches = cli::build_cli().get_matches_from([
        "pocketbook",
        "budget",
        "edit",
        "--id",
        rent_id.as_str(),
        "--category",
        "Food",
    ]);
    let Some(("budget", m)) = matches.subcommand() else {
        panic!("no budget subcommand");
    };
    let err = budgets::handle(&conn, m).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Budget {} already covers Food in 2025-04", food)
    );

    let rows = budgets::for_period(&conn, Some(april)).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(budgets::get(&conn, rent).unwrap().category.as_deref(), Some("Housing"));
    assert_eq!(budgets::get(&conn, food).unwrap().amount, Some(dec("100")));
}

#[test]
fn missing_budget_cannot_be_read_or_edited() {
    let conn = setup();
    assert!(budgets::get(&conn, 7).is_err());
    let rec = pocketbook::models::BudgetRecord {
        id: 7,
        category: Some("Food".into()),
        amount: Some(dec("1")),
        month: Some(4),
        year: Some(2025),
    };
    assert!(budgets::update(&conn, &rec).is_err());
}
