// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Where the engine's records come from. Commands hold a `&dyn DataSource`
//! and never care whether it is the database or the built-in sample data.

use crate::engine::{StatisticsResult, aggregate};
use crate::models::{BudgetRecord, Period, TransactionRecord, TxType};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;
use tracing::debug;

/// Transactions without a readable date belong to no period, so no source
/// returns them; `doctor` reports them instead.
pub trait DataSource {
    fn transactions_for(&self, period: Period) -> Result<Vec<TransactionRecord>>;
    fn budgets_for(&self, period: Period) -> Result<Vec<BudgetRecord>>;
}

pub fn load_statistics(source: &dyn DataSource, period: Period) -> Result<StatisticsResult> {
    let transactions = source
        .transactions_for(period)
        .with_context(|| format!("Fetch transactions for {}", period))?;
    let budgets = source
        .budgets_for(period)
        .with_context(|| format!("Fetch budgets for {}", period))?;
    debug!(
        period = %period,
        transactions = transactions.len(),
        budgets = budgets.len(),
        "fetched records"
    );
    Ok(aggregate(&transactions, &budgets, period))
}

/// Statistics for every month from `from` to `to`, both included.
pub fn load_series(
    source: &dyn DataSource,
    from: Period,
    to: Period,
) -> Result<Vec<StatisticsResult>> {
    Period::range(from, to)?
        .into_iter()
        .map(|p| load_statistics(source, p))
        .collect()
}

/// The sample data when `mock` is set, otherwise the database.
pub fn select(conn: &Connection, mock: bool) -> Box<dyn DataSource + '_> {
    if mock {
        Box::new(MockSource::sample())
    } else {
        Box::new(SqliteSource::new(conn))
    }
}

pub struct SqliteSource<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSource<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

/// Text view of a loosely typed column; blobs and NULLs read as absent.
pub(crate) fn text_at(r: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match r.get_ref(idx)? {
        ValueRef::Text(b) => Some(String::from_utf8_lossy(b).into_owned()),
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}

/// Columns: id, date, description, amount, type, category, note.
pub(crate) fn transaction_record(r: &Row<'_>) -> rusqlite::Result<TransactionRecord> {
    let date = text_at(r, 1)?;
    let amount = text_at(r, 3)?;
    let kind = text_at(r, 4)?;
    Ok(TransactionRecord {
        id: r.get(0)?,
        date: date.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()),
        description: text_at(r, 2)?,
        amount: amount.and_then(|s| s.trim().parse::<Decimal>().ok()),
        r#type: kind.and_then(|s| s.parse::<TxType>().ok()),
        category: text_at(r, 5)?,
        note: text_at(r, 6)?,
    })
}

/// Columns: id, category, amount, month, year.
pub(crate) fn budget_record(r: &Row<'_>) -> rusqlite::Result<BudgetRecord> {
    let amount = text_at(r, 2)?;
    Ok(BudgetRecord {
        id: r.get(0)?,
        category: text_at(r, 1)?,
        amount: amount.and_then(|s| s.trim().parse::<Decimal>().ok()),
        month: r.get(3)?,
        year: r.get(4)?,
    })
}

impl DataSource for SqliteSource<'_> {
    fn transactions_for(&self, period: Period) -> Result<Vec<TransactionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, description, amount, type, category, note
             FROM transactions
             WHERE date BETWEEN ?1 AND ?2
             ORDER BY date, id",
        )?;
        let rows = stmt.query_map(
            params![period.start().to_string(), period.end().to_string()],
            transaction_record,
        )?;
        let mut out = Vec::new();
        for row in rows {
            let rec = row?;
            // Text that sorts inside the month but is not a date.
            if rec.date.is_some_and(|d| period.contains(d)) {
                out.push(rec);
            }
        }
        Ok(out)
    }

    fn budgets_for(&self, period: Period) -> Result<Vec<BudgetRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category, amount, month, year
             FROM budgets
             WHERE month=?1 AND year=?2
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![period.month(), period.year()], budget_record)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

/// In-memory records, by default the April 2025 sample month.
#[derive(Debug, Clone)]
pub struct MockSource {
    transactions: Vec<TransactionRecord>,
    budgets: Vec<BudgetRecord>,
}

impl MockSource {
    pub fn new(transactions: Vec<TransactionRecord>, budgets: Vec<BudgetRecord>) -> Self {
        Self {
            transactions,
            budgets,
        }
    }

    pub fn sample() -> Self {
        let tx = |id: i64, date: &str, title: &str, amount: i64, kind: TxType, cat: &str| {
            TransactionRecord {
                id,
                date: date.parse::<NaiveDate>().ok(),
                description: Some(title.to_string()),
                amount: Some(Decimal::from(amount)),
                r#type: Some(kind),
                category: Some(cat.to_string()),
                note: None,
            }
        };
        let budget = |id: i64, cat: &str, amount: i64| BudgetRecord {
            id,
            category: Some(cat.to_string()),
            amount: Some(Decimal::from(amount)),
            month: Some(4),
            year: Some(2025),
        };
        Self::new(
            vec![
                tx(1, "2025-04-01", "Salary", 3000, TxType::Income, "Salary"),
                tx(2, "2025-04-05", "Rent", 1200, TxType::Expense, "Housing"),
                tx(3, "2025-04-10", "Groceries", 150, TxType::Expense, "Food"),
                tx(4, "2025-04-15", "Freelance Work", 500, TxType::Income, "Freelance"),
            ],
            vec![
                budget(1, "Food", 500),
                budget(2, "Housing", 1500),
                budget(3, "Transportation", 300),
                budget(4, "Entertainment", 200),
            ],
        )
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::sample()
    }
}

impl DataSource for MockSource {
    fn transactions_for(&self, period: Period) -> Result<Vec<TransactionRecord>> {
        Ok(self
            .transactions
            .iter()
            .filter(|t| t.date.is_some_and(|d| period.contains(d)))
            .cloned()
            .collect())
    }

    fn budgets_for(&self, period: Period) -> Result<Vec<BudgetRecord>> {
        Ok(self
            .budgets
            .iter()
            .filter(|b| b.month == Some(period.month()) && b.year == Some(period.year()))
            .cloned()
            .collect())
    }
}
