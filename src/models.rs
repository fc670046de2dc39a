// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Local, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 9999;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("month {0} is out of range 1-12")]
    InvalidMonth(u32),
    #[error("year {0} is outside 2000-9999")]
    InvalidYear(i32),
    #[error("invalid period '{0}', expected YYYY-MM")]
    Parse(String),
    #[error("start period {from} is after end period {to}")]
    ReversedRange { from: Period, to: Period },
}

/// Why a stored record could not take part in aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("missing required field `{0}`")]
    Missing(&'static str),
    #[error("unknown transaction type '{0}', expected income|expense")]
    InvalidType(String),
    #[error("unknown category type '{0}', expected income|expense|both")]
    InvalidCategoryType(String),
    #[error("income amount {0} is negative")]
    SignMismatch(Decimal),
    #[error("budget amount {0} is negative")]
    NegativeBudget(Decimal),
    #[error(transparent)]
    Period(#[from] PeriodError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expense,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Income => "income",
            TxType::Expense => "expense",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TxType::Income),
            "expense" => Ok(TxType::Expense),
            other => Err(RecordError::InvalidType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    #[default]
    Expense,
    Both,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
            CategoryType::Both => "both",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(CategoryType::Income),
            "expense" => Ok(CategoryType::Expense),
            "both" => Ok(CategoryType::Both),
            other => Err(RecordError::InvalidCategoryType(other.to_string())),
        }
    }
}

/// A calendar month. Always within 1-12 and within [`MIN_YEAR`]..=[`MAX_YEAR`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    start: NaiveDate,
    end: NaiveDate,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(PeriodError::InvalidYear(year));
        }
        let start =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or(PeriodError::InvalidYear(year))?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .ok_or(PeriodError::InvalidYear(year))?;
        Ok(Self { start, end })
    }

    pub fn containing(date: NaiveDate) -> Result<Self, PeriodError> {
        Self::new(date.month(), date.year())
    }

    pub fn current() -> Result<Self, PeriodError> {
        Self::containing(Local::now().date_naive())
    }

    pub fn month(&self) -> u32 {
        self.start.month()
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    /// First day of the month.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the month, inclusive.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// `None` after December of [`MAX_YEAR`].
    pub fn next(&self) -> Option<Period> {
        Self::containing(self.end.succ_opt()?).ok()
    }

    /// `None` before January of [`MIN_YEAR`].
    pub fn prev(&self) -> Option<Period> {
        Self::containing(self.start.pred_opt()?).ok()
    }

    /// Every month from `from` to `to`, both included.
    pub fn range(from: Period, to: Period) -> Result<Vec<Period>, PeriodError> {
        if from > to {
            return Err(PeriodError::ReversedRange { from, to });
        }
        let mut out = vec![from];
        let mut cur = from;
        while cur < to {
            match cur.next() {
                Some(next) => cur = next,
                None => break,
            }
            out.push(cur);
        }
        Ok(out)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (y, m) = s
            .split_once('-')
            .ok_or_else(|| PeriodError::Parse(s.to_string()))?;
        let year: i32 = y.parse().map_err(|_| PeriodError::Parse(s.to_string()))?;
        let month: u32 = m.parse().map_err(|_| PeriodError::Parse(s.to_string()))?;
        Period::new(month, year)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub r#type: CategoryType,
    pub color: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub r#type: TxType,
    pub category: String,
    pub note: Option<String>,
}

impl Transaction {
    pub fn magnitude(&self) -> Decimal {
        self.amount.abs()
    }

    /// Income counts as `+|amount|` and expense as `-|amount|`, whichever sign
    /// the amount was stored with.
    pub fn signed_amount(&self) -> Decimal {
        match self.r#type {
            TxType::Income => self.magnitude(),
            TxType::Expense => -self.magnitude(),
        }
    }
}

/// A transaction as it sits in a store: any field may be absent or unreadable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: i64,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub r#type: Option<TxType>,
    pub category: Option<String>,
    pub note: Option<String>,
}

impl TransactionRecord {
    pub fn validate(&self) -> Result<Transaction, RecordError> {
        let amount = self.amount.ok_or(RecordError::Missing("amount"))?;
        let r#type = self.r#type.ok_or(RecordError::Missing("type"))?;
        let category = required_text(self.category.as_deref(), "category")?;
        let date = self.date.ok_or(RecordError::Missing("date"))?;
        if r#type == TxType::Income && amount < Decimal::ZERO {
            return Err(RecordError::SignMismatch(amount));
        }
        Ok(Transaction {
            id: self.id,
            date,
            description: self.description.clone().unwrap_or_default(),
            amount,
            r#type,
            category,
            note: self.note.clone(),
        })
    }
}

impl From<Transaction> for TransactionRecord {
    fn from(t: Transaction) -> Self {
        TransactionRecord {
            id: t.id,
            date: Some(t.date),
            description: Some(t.description),
            amount: Some(t.amount),
            r#type: Some(t.r#type),
            category: Some(t.category),
            note: t.note,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    pub id: i64,
    pub category: String,
    pub amount: Decimal,
    pub period: Period,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecord {
    pub id: i64,
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl BudgetRecord {
    pub fn validate(&self) -> Result<Budget, RecordError> {
        let category = required_text(self.category.as_deref(), "category")?;
        let amount = self.amount.ok_or(RecordError::Missing("amount"))?;
        if amount < Decimal::ZERO {
            return Err(RecordError::NegativeBudget(amount));
        }
        let month = self.month.ok_or(RecordError::Missing("month"))?;
        let year = self.year.ok_or(RecordError::Missing("year"))?;
        Ok(Budget {
            id: self.id,
            category,
            amount,
            period: Period::new(month, year)?,
        })
    }
}

impl From<Budget> for BudgetRecord {
    fn from(b: Budget) -> Self {
        BudgetRecord {
            id: b.id,
            category: Some(b.category),
            amount: Some(b.amount),
            month: Some(b.period.month()),
            year: Some(b.period.year()),
        }
    }
}

fn required_text(v: Option<&str>, field: &'static str) -> Result<String, RecordError> {
    v.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(RecordError::Missing(field))
}
