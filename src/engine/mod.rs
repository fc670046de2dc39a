// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure monthly aggregation: statistics, budget status, and report insights.
//! Nothing here touches the store or the clock.

pub mod aggregate;
pub mod insights;
pub mod status;

pub use aggregate::{
    BudgetComparison, CategoryBucket, CategoryTotal, RECENT_TRANSACTIONS, StatisticsResult,
    Summary, aggregate,
};
pub use insights::{Insights, MonthlyAggregate, Rating};
pub use status::{BudgetLine, BudgetStatus, StatusLevel, budget_report, budget_status};
