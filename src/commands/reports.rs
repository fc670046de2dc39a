// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::insights::{
    CategoryAmount, Insights, MonthlyAggregate, PeriodTotals, expense_breakdown, insights, totals,
};
use crate::engine::StatisticsResult;
use crate::models::Period;
use crate::source::{DataSource, load_series, select};
use crate::utils::{fmt_money, get_currency, maybe_print_json, parse_month, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

const DEFAULT_MONTHS: usize = 6;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let to = match sub.get_one::<String>("to") {
        Some(s) => parse_month(s)?,
        None => Period::current()?,
    };
    let from = match sub.get_one::<String>("from") {
        Some(s) => parse_month(s)?,
        None => months_back(to, DEFAULT_MONTHS - 1),
    };
    let source = select(conn, sub.get_flag("mock"));
    let report = build(source.as_ref(), from, to)?;
    if !maybe_print_json(sub.get_flag("json"), false, &report)? {
        print_report(&report, &get_currency(conn)?);
    }
    Ok(())
}

fn months_back(p: Period, n: usize) -> Period {
    let mut cur = p;
    for _ in 0..n {
        match cur.prev() {
            Some(prev) => cur = prev,
            None => break,
        }
    }
    cur
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub from: Period,
    pub to: Period,
    pub months: Vec<MonthlyAggregate>,
    pub totals: PeriodTotals,
    pub insights: Insights,
    /// Spending by category in the last month of the range.
    pub expense_breakdown: Vec<CategoryAmount>,
    pub skipped: usize,
}

pub fn build(source: &dyn DataSource, from: Period, to: Period) -> Result<Report> {
    let series: Vec<StatisticsResult> = load_series(source, from, to)?;
    let latest = series
        .last()
        .ok_or_else(|| anyhow!("No data available for {}..{}", from, to))?;
    let months: Vec<MonthlyAggregate> =
        series.iter().map(MonthlyAggregate::from_statistics).collect();
    Ok(Report {
        from,
        to,
        totals: totals(&months),
        insights: insights(&months, latest),
        expense_breakdown: expense_breakdown(latest),
        skipped: series.iter().map(|s| s.skipped).sum(),
        months,
    })
}

fn pct(v: Decimal) -> String {
    let sign = if v > Decimal::ZERO { "+" } else { "" };
    format!("{}{:.1}%", sign, v)
}

fn print_report(r: &Report, ccy: &str) {
    println!("Report {} to {}", r.from, r.to);
    let rows = r
        .months
        .iter()
        .map(|m| {
            vec![
                m.period.to_string(),
                fmt_money(m.income, ccy),
                fmt_money(m.expenses, ccy),
                fmt_money(m.net_income, ccy),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expenses", "Net"], rows)
    );
    println!(
        "{}",
        pretty_table(
            &["Total income", "Total expenses", "Net income"],
            vec![vec![
                fmt_money(r.totals.total_income, ccy),
                fmt_money(r.totals.total_expenses, ccy),
                fmt_money(r.totals.net_income, ccy),
            ]],
        )
    );

    let mut insight_rows = Vec::new();
    if let Some(s) = &r.insights.savings_rate {
        insight_rows.push(vec![
            "Savings rate".to_string(),
            format!("{:.1}%", s.value),
            s.rating.as_str().to_string(),
        ]);
    }
    if let Some(t) = &r.insights.expense_trend {
        insight_rows.push(vec![
            "Monthly expense trend".to_string(),
            pct(t.value),
            t.rating.as_str().to_string(),
        ]);
    }
    if let Some(t) = r.insights.income_trend {
        insight_rows.push(vec![
            "Monthly income trend".to_string(),
            pct(t),
            String::new(),
        ]);
    }
    if let Some(c) = &r.insights.top_expense_category {
        insight_rows.push(vec![
            "Top expense category".to_string(),
            format!("{} ({})", c.category, fmt_money(c.amount, ccy)),
            String::new(),
        ]);
    }
    if let Some(c) = &r.insights.top_income_category {
        insight_rows.push(vec![
            "Top income category".to_string(),
            format!("{} ({})", c.category, fmt_money(c.amount, ccy)),
            String::new(),
        ]);
    }
    if !insight_rows.is_empty() {
        println!("{}", pretty_table(&["Insight", "Value", "Rating"], insight_rows));
    }

    if !r.expense_breakdown.is_empty() {
        let rows = r
            .expense_breakdown
            .iter()
            .map(|c| vec![c.category.clone(), fmt_money(c.amount, ccy)])
            .collect();
        println!("Spending by category, {}", r.to);
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }
}
