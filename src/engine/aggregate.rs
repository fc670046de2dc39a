// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{BudgetRecord, Period, Transaction, TransactionRecord, TxType};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

pub const RECENT_TRANSACTIONS: usize = 5;

/// Income is positive, expense is negative, `balance = income + expense`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
}

/// Per-category magnitudes; both sides are non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryBucket {
    pub income: Decimal,
    pub expense: Decimal,
}

impl CategoryBucket {
    pub fn net(&self) -> Decimal {
        self.income.saturating_sub(self.expense)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetComparison {
    pub category: String,
    pub budgeted: Decimal,
    pub spent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResult {
    pub period: Period,
    pub summary: Summary,
    pub categories: BTreeMap<String, CategoryBucket>,
    pub category_totals: Vec<CategoryTotal>,
    pub recent_transactions: Vec<Transaction>,
    pub budget_comparison: Vec<BudgetComparison>,
    pub skipped: usize,
}

impl StatisticsResult {
    pub fn empty(period: Period) -> Self {
        StatisticsResult {
            period,
            summary: Summary::default(),
            categories: BTreeMap::new(),
            category_totals: Vec::new(),
            recent_transactions: Vec::new(),
            budget_comparison: Vec::new(),
            skipped: 0,
        }
    }

    pub fn spent_in(&self, category: &str) -> Decimal {
        self.categories
            .get(category)
            .map(|b| b.expense)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Add `t` to its category bucket and the summary. Returns `false`, changing
/// nothing, when either sum would overflow.
fn accumulate(stats: &mut StatisticsResult, order: &mut Vec<String>, t: &Transaction) -> bool {
    let current = stats
        .categories
        .get(&t.category)
        .copied()
        .unwrap_or_default();
    let summary = &stats.summary;
    let m = t.magnitude();
    let next = match t.r#type {
        TxType::Income => current
            .income
            .checked_add(m)
            .zip(summary.total_income.checked_add(m))
            .map(|(income, total_income)| {
                let bucket = CategoryBucket { income, ..current };
                (bucket, Summary { total_income, ..*summary })
            }),
        TxType::Expense => current
            .expense
            .checked_add(m)
            .zip(summary.total_expense.checked_sub(m))
            .map(|(expense, total_expense)| {
                let bucket = CategoryBucket { expense, ..current };
                (bucket, Summary { total_expense, ..*summary })
            }),
    };
    let Some((bucket, summary)) = next else {
        return false;
    };
    if !stats.categories.contains_key(&t.category) {
        order.push(t.category.clone());
    }
    stats.categories.insert(t.category.clone(), bucket);
    stats.summary = summary;
    true
}

/// Reduce transactions and budgets into the statistics of one month.
///
/// Records outside `period` are ignored. Malformed records are skipped and
/// counted in [`StatisticsResult::skipped`]; they never fail the whole call.
pub fn aggregate(
    transactions: &[TransactionRecord],
    budgets: &[BudgetRecord],
    period: Period,
) -> StatisticsResult {
    let mut stats = StatisticsResult::empty(period);

    let mut in_period: Vec<Transaction> = Vec::new();
    let mut order: Vec<String> = Vec::new();
    for rec in transactions {
        let t = match rec.validate() {
            Ok(t) if period.contains(t.date) => t,
            Ok(_) => continue,
            Err(e) => {
                warn!(id = rec.id, error = %e, "skipping malformed transaction");
                stats.skipped += 1;
                continue;
            }
        };
        if accumulate(&mut stats, &mut order, &t) {
            in_period.push(t);
        } else {
            warn!(id = t.id, amount = %t.amount, "skipping transaction, totals would overflow");
            stats.skipped += 1;
        }
    }
    stats.summary.balance = stats.summary.total_income + stats.summary.total_expense;

    stats.category_totals = order
        .into_iter()
        .map(|category| {
            let total = stats.categories[&category].net();
            CategoryTotal { category, total }
        })
        .collect();

    let mut recent = in_period;
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(RECENT_TRANSACTIONS);
    stats.recent_transactions = recent;

    // (category, month, year) is unique: a repeated budget replaces the earlier one.
    let mut slot: HashMap<String, usize> = HashMap::new();
    for rec in budgets {
        let budget = match rec.validate() {
            Ok(b) => b,
            Err(e) => {
                warn!(id = rec.id, error = %e, "skipping malformed budget");
                stats.skipped += 1;
                continue;
            }
        };
        if budget.period != period {
            debug!(id = budget.id, budget_period = %budget.period, "budget outside period");
            continue;
        }
        let row = BudgetComparison {
            spent: stats.spent_in(&budget.category),
            budgeted: budget.amount,
            category: budget.category,
        };
        match slot.get(&row.category).copied() {
            Some(i) => stats.budget_comparison[i] = row,
            None => {
                slot.insert(row.category.clone(), stats.budget_comparison.len());
                stats.budget_comparison.push(row);
            }
        }
    }

    debug!(
        period = %period,
        categories = stats.categories.len(),
        budgets = stats.budget_comparison.len(),
        skipped = stats.skipped,
        "aggregated period"
    );
    stats
}
