// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketbook::commands::transactions;
use pocketbook::{cli, db};
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    for day in 1..=5 {
        conn.execute(
            "INSERT INTO transactions(date, description, amount, type, category)
             VALUES (?1, ?2, '10', 'expense', 'Food')",
            (format!("2025-04-{:02}", day), format!("Meal {}", day)),
        )
        .unwrap();
    }
    conn.execute(
        "INSERT INTO transactions(date, description, amount, type, category)
         VALUES ('2025-04-03', 'Pay', '900', 'income', 'Salary')",
        [],
    )
    .unwrap();
    conn
}

fn tx_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["pocketbook", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("tx", m)) => m.clone(),
        _ => panic!("no tx subcommand"),
    }
}

fn page_of(conn: &Connection, args: &[&str]) -> transactions::TransactionPage {
    let mut argv = vec!["list"];
    argv.extend_from_slice(args);
    let m = tx_matches(&argv);
    let Some(("list", sub)) = m.subcommand() else {
        panic!("no list subcommand");
    };
    transactions::query_page(conn, sub).unwrap()
}

#[test]
fn list_defaults_to_first_page_newest_first() {
    let conn = setup();
    let page = page_of(&conn, &[]);
    assert_eq!(page.pagination.total_items, 6);
    assert_eq!(page.pagination.total_pages, 1);
    assert!(!page.pagination.has_next_page);
    assert!(!page.pagination.has_prev_page);
    assert_eq!(page.transactions[0].description, "Meal 5");
}

#[test]
fn list_paginates() {
    let conn = setup();
    let page = page_of(&conn, &["--page", "2", "--limit", "4"]);
    assert_eq!(page.pagination.total_pages, 2);
    assert_eq!(page.pagination.current_page, 2);
    assert!(page.pagination.has_prev_page);
    assert!(!page.pagination.has_next_page);
    assert_eq!(page.transactions.len(), 2);
}

#[test]
fn list_filters_by_type_category_and_dates() {
    let conn = setup();
    let income = page_of(&conn, &["--type", "income"]);
    assert_eq!(income.pagination.total_items, 1);
    assert_eq!(income.transactions[0].category, "Salary");

    let food = page_of(&conn, &["--category", "Food", "--from", "2025-04-02", "--to", "2025-04-04"]);
    assert_eq!(food.pagination.total_items, 3);
    assert!(food.transactions.iter().all(|t| t.category == "Food"));
}

#[test]
fn add_through_cli_validates_and_stores() {
    let conn = setup();
    let m = tx_matches(&[
        "add",
        "--date",
        "2025-04-20",
        "--amount",
        "-20.25",
        "--type",
        "expense",
        "--category",
        "Food",
        "--description",
        "Coffee beans",
    ]);
    transactions::handle(&conn, &m).unwrap();
    let (amount, kind): (String, String) = conn
        .query_row(
            "SELECT amount, type FROM transactions WHERE description='Coffee beans'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(amount, "-20.25");
    assert_eq!(kind, "expense");
}

#[test]
fn negative_income_is_rejected() {
    let conn = setup();
    let m = tx_matches(&[
        "add",
        "--amount",
        "-5",
        "--type",
        "income",
        "--description",
        "Refund",
    ]);
    assert!(transactions::handle(&conn, &m).is_err());
}

#[test]
fn removing_a_missing_transaction_fails() {
    let conn = setup();
    assert!(transactions::remove(&conn, 999).is_err());
    transactions::remove(&conn, 1).unwrap();
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 5);
}

#[test]
fn edit_overwrites_only_given_fields() {
    let conn = setup();
    let m = tx_matches(&["edit", "--id", "2", "--amount", "42", "--note", "split bill"]);
    transactions::handle(&conn, &m).unwrap();

    let rec = transactions::get(&conn, 2).unwrap();
    assert_eq!(rec.amount, Some("42".parse().unwrap()));
    assert_eq!(rec.note.as_deref(), Some("split bill"));
    assert_eq!(rec.description.as_deref(), Some("Meal 2"));
    assert_eq!(rec.category.as_deref(), Some("Food"));

    let m = tx_matches(&["edit", "--id", "2", "--note", " "]);
    transactions::handle(&conn, &m).unwrap();
    assert_eq!(transactions::get(&conn, 2).unwrap().note, None);
}

#[test]
fn invalid_edit_leaves_the_row_alone() {
    let conn = setup();
    let m = tx_matches(&["edit", "--id", "6", "--amount", "-900"]);
    let err = transactions::handle(&conn, &m).unwrap_err();
    assert!(err.to_string().contains("Transaction 6 is invalid"));
    let amount: String = conn
        .query_row("SELECT amount FROM transactions WHERE id=6", [], |r| r.get(0))
        .unwrap();
    assert_eq!(amount, "900");
}

#[test]
fn edit_and_show_of_a_missing_transaction_fail() {
    let conn = setup();
    let m = tx_matches(&["edit", "--id", "999", "--amount", "1"]);
    assert!(transactions::handle(&conn, &m).is_err());
    let m = tx_matches(&["show", "--id", "999"]);
    assert!(transactions::handle(&conn, &m).is_err());
    assert!(transactions::get(&conn, 999).is_err());
}

#[test]
fn edit_repairs_an_undated_row() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(date, description, amount, type, category)
         VALUES (NULL, 'Lost receipt', '8', 'expense', 'Food')",
        [],
    )
    .unwrap();
    let rec = transactions::get(&conn, 7).unwrap();
    assert_eq!(rec.date, None);
    assert!(rec.validate().is_err());
    transactions::handle(&conn, &tx_matches(&["show", "--id", "7"])).unwrap();

    let m = tx_matches(&["edit", "--id", "7", "--date", "2025-04-06"]);
    transactions::handle(&conn, &m).unwrap();
    let fixed = transactions::get(&conn, 7).unwrap().validate().unwrap();
    assert_eq!(fixed.date.to_string(), "2025-04-06");
    assert_eq!(page_of(&conn, &[]).transactions[0].description, "Lost receipt");
}
