// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::StatisticsResult;
use crate::source::{load_statistics, select};
use crate::utils::{fmt_money, get_currency, maybe_print_json, period_from_args, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = period_from_args(sub)?;
    let source = select(conn, sub.get_flag("mock"));
    let stats = load_statistics(source.as_ref(), period)?;
    if !maybe_print_json(sub.get_flag("json"), false, &stats)? {
        print_tables(&stats, &get_currency(conn)?);
    }
    Ok(())
}

fn print_tables(stats: &StatisticsResult, ccy: &str) {
    let s = &stats.summary;
    println!("Statistics for {}", stats.period);
    println!(
        "{}",
        pretty_table(
            &["Income", "Expense", "Balance"],
            vec![vec![
                fmt_money(s.total_income, ccy),
                fmt_money(s.total_expense, ccy),
                fmt_money(s.balance, ccy),
            ]],
        )
    );

    let rows = stats
        .category_totals
        .iter()
        .map(|ct| {
            let b = stats.categories.get(&ct.category).copied().unwrap_or_default();
            vec![
                ct.category.clone(),
                fmt_money(b.income, ccy),
                fmt_money(b.expense, ccy),
                fmt_money(ct.total, ccy),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Income", "Expense", "Net"], rows)
    );

    if !stats.recent_transactions.is_empty() {
        let rows = stats
            .recent_transactions
            .iter()
            .map(|t| {
                vec![
                    t.date.to_string(),
                    t.description.clone(),
                    t.category.clone(),
                    fmt_money(t.signed_amount(), ccy),
                ]
            })
            .collect();
        println!("Recent transactions");
        println!(
            "{}",
            pretty_table(&["Date", "Description", "Category", "Amount"], rows)
        );
    }

    if !stats.budget_comparison.is_empty() {
        let rows = stats
            .budget_comparison
            .iter()
            .map(|b| {
                vec![
                    b.category.clone(),
                    fmt_money(b.budgeted, ccy),
                    fmt_money(b.spent, ccy),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Budgeted", "Spent"], rows)
        );
    }

    if stats.skipped > 0 {
        println!("{} malformed record(s) skipped; run `doctor` for details", stats.skipped);
    }
}
