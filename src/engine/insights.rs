// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::aggregate::StatisticsResult;
use crate::models::Period;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAggregate {
    pub period: Period,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net_income: Decimal,
}

impl MonthlyAggregate {
    pub fn from_statistics(stats: &StatisticsResult) -> Self {
        let income = stats.summary.total_income;
        let expenses = stats.summary.total_expense.abs();
        MonthlyAggregate {
            period: stats.period,
            income,
            expenses,
            net_income: income.saturating_sub(expenses),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_income: Decimal,
}

/// Sums saturate at [`Decimal::MAX`] instead of overflowing.
pub fn totals(series: &[MonthlyAggregate]) -> PeriodTotals {
    let mut t = series.iter().fold(PeriodTotals::default(), |mut acc, m| {
        acc.total_income = acc.total_income.saturating_add(m.income);
        acc.total_expenses = acc.total_expenses.saturating_add(m.expenses);
        acc
    });
    t.net_income = t.total_income.saturating_sub(t.total_expenses);
    t
}

/// `(income - expenses) / income * 100`; `None` without income or when the
/// ratio is too large to represent.
pub fn savings_rate(income: Decimal, expenses: Decimal) -> Option<Decimal> {
    if income.is_zero() {
        return None;
    }
    income
        .checked_sub(expenses)?
        .checked_div(income)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// Percentage change from `previous` to `current`; `None` from zero or on
/// overflow.
pub fn growth(previous: Decimal, current: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    current
        .checked_sub(previous)?
        .checked_div(previous)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// Month-over-month change of expenses between the last two months.
pub fn expense_trend(series: &[MonthlyAggregate]) -> Option<Decimal> {
    match series {
        [.., prev, cur] => growth(prev.expenses, cur.expenses),
        _ => None,
    }
}

pub fn income_trend(series: &[MonthlyAggregate]) -> Option<Decimal> {
    match series {
        [.., prev, cur] => growth(prev.income, cur.income),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: Decimal,
}

fn ranked(stats: &StatisticsResult, pick: impl Fn(&str) -> Decimal) -> Vec<CategoryAmount> {
    let mut items: Vec<CategoryAmount> = stats
        .category_totals
        .iter()
        .map(|ct| CategoryAmount {
            category: ct.category.clone(),
            amount: pick(&ct.category),
        })
        .filter(|c| c.amount > Decimal::ZERO)
        .collect();
    items.sort_by(|a, b| b.amount.cmp(&a.amount));
    items
}

/// Categories with spending, largest first; ties keep first-appearance order.
pub fn expense_breakdown(stats: &StatisticsResult) -> Vec<CategoryAmount> {
    ranked(stats, |c| stats.categories.get(c).map_or(Decimal::ZERO, |b| b.expense))
}

pub fn income_breakdown(stats: &StatisticsResult) -> Vec<CategoryAmount> {
    ranked(stats, |c| stats.categories.get(c).map_or(Decimal::ZERO, |b| b.income))
}

pub fn top_expense_category(stats: &StatisticsResult) -> Option<CategoryAmount> {
    expense_breakdown(stats).into_iter().next()
}

pub fn top_income_category(stats: &StatisticsResult) -> Option<CategoryAmount> {
    income_breakdown(stats).into_iter().next()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Good,
    Fair,
    Poor,
}

impl Rating {
    pub fn for_savings_rate(rate: Decimal) -> Self {
        if rate >= Decimal::from(20) {
            Rating::Good
        } else if rate >= Decimal::TEN {
            Rating::Fair
        } else {
            Rating::Poor
        }
    }

    pub fn for_expense_trend(trend: Decimal) -> Self {
        if trend <= Decimal::ZERO {
            Rating::Good
        } else if trend <= Decimal::from(5) {
            Rating::Fair
        } else {
            Rating::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Good => "good",
            Rating::Fair => "fair",
            Rating::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rated {
    pub value: Decimal,
    pub rating: Rating,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub savings_rate: Option<Rated>,
    pub expense_trend: Option<Rated>,
    pub income_trend: Option<Decimal>,
    pub top_expense_category: Option<CategoryAmount>,
    pub top_income_category: Option<CategoryAmount>,
}

/// Savings rate over the whole series, expense and income trends of its last
/// two months, and the leading categories of `latest`.
pub fn insights(series: &[MonthlyAggregate], latest: &StatisticsResult) -> Insights {
    let t = totals(series);
    Insights {
        savings_rate: savings_rate(t.total_income, t.total_expenses).map(|value| Rated {
            value,
            rating: Rating::for_savings_rate(value),
        }),
        expense_trend: expense_trend(series).map(|value| Rated {
            value,
            rating: Rating::for_expense_trend(value),
        }),
        income_trend: income_trend(series),
        top_expense_category: top_expense_category(latest),
        top_income_category: top_income_category(latest),
    }
}
