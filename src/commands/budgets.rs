// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{BudgetLine, budget_report};
use crate::models::{Budget, BudgetRecord, Period};
use crate::source::{DataSource, SqliteSource, budget_record, load_statistics, select};
use crate::utils::{
    category_exists, fmt_money, get_currency, maybe_print_json, parse_decimal, period_from_args,
    pretty_table,
};
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute("DELETE FROM budgets WHERE id=?1", params![id])?;
            if n == 0 {
                return Err(anyhow!("Budget {} not found", id));
            }
            println!("Removed budget {}", id);
        }
        Some(("status", sub)) => status(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Insert or replace the budget for (category, month, year).
pub fn upsert(conn: &Connection, category: &str, amount: Decimal, period: Period) -> Result<i64> {
    if amount < Decimal::ZERO {
        return Err(anyhow!("Budget amount cannot be negative: {}", amount));
    }
    let id = conn.query_row(
        "INSERT INTO budgets(category, amount, month, year) VALUES (?1,?2,?3,?4)
         ON CONFLICT(category, month, year) DO UPDATE SET amount=excluded.amount
         RETURNING id",
        params![category, amount.to_string(), period.month(), period.year()],
        |r| r.get(0),
    )?;
    Ok(id)
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = period_from_args(sub)?;
    let cat = sub.get_one::<String>("category").unwrap().trim();
    if cat.is_empty() {
        return Err(anyhow!("Budget category cannot be empty"));
    }
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if !category_exists(conn, cat)? {
        warn!(category = %cat, "budget set for an undefined category");
    }
    upsert(conn, cat, amount, period)?;
    println!("Budget set for {} / {} = {}", period, cat, amount);
    Ok(())
}

pub fn get(conn: &Connection, id: i64) -> Result<BudgetRecord> {
    conn.query_row(
        "SELECT id, category, amount, month, year FROM budgets WHERE id=?1",
        params![id],
        budget_record,
    )
    .optional()?
    .ok_or_else(|| anyhow!("Budget {} not found", id))
}

/// Validate `rec` and overwrite the row with the same id. Fails when another
/// budget already covers the same category and month.
pub fn update(conn: &Connection, rec: &BudgetRecord) -> Result<Budget> {
    let b = rec
        .validate()
        .with_context(|| format!("Budget {} is invalid", rec.id))?;
    let clash: Option<i64> = conn
        .query_row(
            "SELECT id FROM budgets WHERE category=?1 AND month=?2 AND year=?3 AND id!=?4",
            params![b.category, b.period.month(), b.period.year(), b.id],
            |r| r.get(0),
        )
        .optional()?;
    if let Some(other) = clash {
        return Err(anyhow!(
            "Budget {} already covers {} in {}",
            other,
            b.category,
            b.period
        ));
    }
    let n = conn.execute(
        "UPDATE budgets SET category=?1, amount=?2, month=?3, year=?4 WHERE id=?5",
        params![
            b.category,
            b.amount.to_string(),
            b.period.month(),
            b.period.year(),
            b.id
        ],
    )?;
    if n == 0 {
        return Err(anyhow!("Budget {} not found", b.id));
    }
    Ok(b)
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut rec = get(conn, id)?;
    if let Some(c) = sub.get_one::<String>("category") {
        rec.category = Some(c.trim().to_string());
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        rec.amount = Some(parse_decimal(a)?);
    }
    if let Some(m) = sub.get_one::<u32>("month") {
        rec.month = Some(*m);
    }
    if let Some(y) = sub.get_one::<i32>("year") {
        rec.year = Some(*y);
    }
    let b = update(conn, &rec)?;
    if !category_exists(conn, &b.category)? {
        warn!(category = %b.category, "budget set for an undefined category");
    }
    info!(id, "budget updated");
    println!("Updated budget {}: {} / {} = {}", id, b.period, b.category, b.amount);
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let rec = get(conn, *sub.get_one::<i64>("id").unwrap())?;
    if !maybe_print_json(sub.get_flag("json"), false, &rec)? {
        let rows = vec![vec![
            rec.id.to_string(),
            match (rec.year, rec.month) {
                (Some(y), Some(m)) => format!("{:04}-{:02}", y, m),
                _ => String::new(),
            },
            rec.category.clone().unwrap_or_default(),
            rec.amount.map(|a| format!("{:.2}", a)).unwrap_or_default(),
        ]];
        println!(
            "{}",
            pretty_table(&["ID", "Month", "Category", "Budget"], rows)
        );
    }
    Ok(())
}

pub fn for_period(conn: &Connection, period: Option<Period>) -> Result<Vec<BudgetRecord>> {
    if let Some(p) = period {
        return SqliteSource::new(conn).budgets_for(p);
    }
    let mut stmt = conn.prepare(
        "SELECT id, category, amount, month, year FROM budgets
         ORDER BY year DESC, month DESC, category",
    )?;
    let rows = stmt.query_map([], budget_record)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let period = if sub.contains_id("month") || sub.contains_id("year") {
        Some(period_from_args(sub)?)
    } else {
        None
    };
    let data = for_period(conn, period)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|b| {
                vec![
                    b.id.to_string(),
                    match (b.year, b.month) {
                        (Some(y), Some(m)) => format!("{:04}-{:02}", y, m),
                        _ => String::new(),
                    },
                    b.category.unwrap_or_default(),
                    b.amount.map(|a| format!("{:.2}", a)).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Month", "Category", "Budget"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct StatusRow {
    #[serde(flatten)]
    line: BudgetLine,
    message: String,
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let period = period_from_args(sub)?;
    let currency = get_currency(conn)?;
    let source = select(conn, sub.get_flag("mock"));
    let stats = load_statistics(source.as_ref(), period)?;
    let data: Vec<StatusRow> = budget_report(&stats)
        .into_iter()
        .map(|line| StatusRow {
            message: line.status.message(&currency),
            line,
        })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|r| {
                let s = &r.line.status;
                vec![
                    r.line.category.clone(),
                    fmt_money(s.budgeted, &currency),
                    fmt_money(s.spent, &currency),
                    format!("{}%", s.percentage),
                    s.level.as_str().to_string(),
                    r.message.clone(),
                ]
            })
            .collect();
        println!("Budgets for {}", period);
        println!(
            "{}",
            pretty_table(
                &["Category", "Budget", "Spent", "Used", "Status", "Detail"],
                rows
            )
        );
    }
    Ok(())
}
