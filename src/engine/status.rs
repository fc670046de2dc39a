// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::aggregate::StatisticsResult;
use crate::utils::fmt_money;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

const WARNING_AT: u32 = 75;
const DANGER_AT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Success,
    Warning,
    Danger,
}

impl StatusLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLevel::Success => "success",
            StatusLevel::Warning => "warning",
            StatusLevel::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub level: StatusLevel,
    /// Share of the budget used, capped at 100 for display.
    pub percentage: u32,
    pub raw_percentage: Decimal,
    pub budgeted: Decimal,
    pub spent: Decimal,
}

impl BudgetStatus {
    pub fn remaining(&self) -> Decimal {
        self.budgeted.saturating_sub(self.spent).max(Decimal::ZERO)
    }

    pub fn overspent(&self) -> Decimal {
        self.spent.saturating_sub(self.budgeted).max(Decimal::ZERO)
    }

    pub fn message(&self, currency: &str) -> String {
        match self.level {
            StatusLevel::Danger => format!(
                "Overspent by {}",
                fmt_money(self.spent.saturating_sub(self.budgeted), currency)
            ),
            StatusLevel::Warning | StatusLevel::Success => format!(
                "{} remaining",
                fmt_money(self.budgeted.saturating_sub(self.spent), currency)
            ),
        }
    }
}

/// Classify how much of a budget has been consumed.
///
/// A zero budget reports 0% rather than dividing by zero. A ratio too large
/// to represent saturates at [`Decimal::MAX`].
pub fn budget_status(budgeted: Decimal, spent: Decimal) -> BudgetStatus {
    let raw = if budgeted.is_zero() {
        Decimal::ZERO
    } else {
        spent
            .checked_div(budgeted)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::MAX)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    };
    let level = if raw >= Decimal::from(DANGER_AT) {
        StatusLevel::Danger
    } else if raw >= Decimal::from(WARNING_AT) {
        StatusLevel::Warning
    } else {
        StatusLevel::Success
    };
    let percentage = raw
        .min(Decimal::from(DANGER_AT))
        .max(Decimal::ZERO)
        .to_u32()
        .unwrap_or(0);
    BudgetStatus {
        level,
        percentage,
        raw_percentage: raw,
        budgeted,
        spent,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetLine {
    pub category: String,
    pub status: BudgetStatus,
}

/// Status of every budget compared in `stats`, in comparison order.
pub fn budget_report(stats: &StatisticsResult) -> Vec<BudgetLine> {
    stats
        .budget_comparison
        .iter()
        .map(|row| BudgetLine {
            category: row.category.clone(),
            status: budget_status(row.budgeted, row.spent),
        })
        .collect()
}
