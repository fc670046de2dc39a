// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketbook::engine::{RECENT_TRANSACTIONS, aggregate};
use pocketbook::models::{BudgetRecord, Period, TransactionRecord, TxType};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn tx(id: i64, date: &str, amount: &str, kind: TxType, cat: &str) -> TransactionRecord {
    TransactionRecord {
        id,
        date: Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
        description: Some(format!("tx {}", id)),
        amount: Some(dec(amount)),
        r#type: Some(kind),
        category: Some(cat.to_string()),
        note: None,
    }
}

fn budget(id: i64, cat: &str, amount: &str, month: u32, year: i32) -> BudgetRecord {
    BudgetRecord {
        id,
        category: Some(cat.to_string()),
        amount: Some(dec(amount)),
        month: Some(month),
        year: Some(year),
    }
}

fn april() -> Period {
    Period::new(4, 2025).unwrap()
}

#[test]
fn aggregates_the_sample_month() {
    let txs = vec![
        tx(1, "2025-04-01", "3000", TxType::Income, "Salary"),
        tx(2, "2025-04-05", "1200", TxType::Expense, "Housing"),
        tx(3, "2025-04-10", "150", TxType::Expense, "Food"),
    ];
    let budgets = vec![budget(1, "Food", "500", 4, 2025)];
    let stats = aggregate(&txs, &budgets, april());

    assert_eq!(stats.summary.total_income, dec("3000"));
    assert_eq!(stats.summary.total_expense, dec("-1350"));
    assert_eq!(stats.summary.balance, dec("1650"));
    assert_eq!(stats.categories["Salary"].income, dec("3000"));
    assert_eq!(stats.categories["Housing"].expense, dec("1200"));
    assert_eq!(stats.categories["Food"].expense, dec("150"));

    let order: Vec<&str> = stats
        .category_totals
        .iter()
        .map(|c| c.category.as_str())
        .collect();
    assert_eq!(order, ["Salary", "Housing", "Food"]);
    assert_eq!(stats.category_totals[1].total, dec("-1200"));

    assert_eq!(stats.budget_comparison.len(), 1);
    assert_eq!(stats.budget_comparison[0].budgeted, dec("500"));
    assert_eq!(stats.budget_comparison[0].spent, dec("150"));
    assert_eq!(stats.skipped, 0);
}

#[test]
fn empty_input_gives_zeroed_result() {
    let stats = aggregate(&[], &[], april());
    assert_eq!(stats.summary.total_income, Decimal::ZERO);
    assert_eq!(stats.summary.total_expense, Decimal::ZERO);
    assert_eq!(stats.summary.balance, Decimal::ZERO);
    assert!(stats.categories.is_empty());
    assert!(stats.category_totals.is_empty());
    assert!(stats.recent_transactions.is_empty());
    assert!(stats.budget_comparison.is_empty());
}

#[test]
fn month_boundaries_are_inclusive() {
    let txs = vec![
        tx(1, "2025-03-31", "10", TxType::Expense, "Food"),
        tx(2, "2025-04-01", "20", TxType::Expense, "Food"),
        tx(3, "2025-04-30", "30", TxType::Expense, "Food"),
        tx(4, "2025-05-01", "40", TxType::Expense, "Food"),
    ];
    let stats = aggregate(&txs, &[], april());
    assert_eq!(stats.categories["Food"].expense, dec("50"));
    assert_eq!(stats.recent_transactions.len(), 2);
}

#[test]
fn malformed_records_are_skipped_and_counted() {
    let mut no_category = tx(2, "2025-04-02", "5", TxType::Expense, "Food");
    no_category.category = None;
    let mut no_amount = tx(3, "2025-04-02", "5", TxType::Expense, "Food");
    no_amount.amount = None;
    let negative_income = tx(4, "2025-04-03", "-100", TxType::Income, "Salary");
    let mut no_date = tx(5, "2025-04-04", "1", TxType::Expense, "Food");
    no_date.date = None;
    let txs = vec![
        tx(1, "2025-04-01", "25", TxType::Expense, "Food"),
        no_category,
        no_amount,
        negative_income,
        no_date,
    ];
    let mut bad_budget = budget(2, "Food", "10", 4, 2025);
    bad_budget.amount = Some(dec("-10"));
    let budgets = vec![budget(1, "Food", "100", 4, 2025), bad_budget];

    let stats = aggregate(&txs, &budgets, april());
    assert_eq!(stats.skipped, 5);
    assert_eq!(stats.summary.total_expense, dec("-25"));
    assert_eq!(stats.summary.total_income, Decimal::ZERO);
    assert_eq!(stats.budget_comparison.len(), 1);
}

#[test]
fn expense_sign_does_not_matter() {
    let txs = vec![
        tx(1, "2025-04-01", "40", TxType::Expense, "Food"),
        tx(2, "2025-04-02", "-60", TxType::Expense, "Food"),
    ];
    let stats = aggregate(&txs, &[], april());
    assert_eq!(stats.categories["Food"].expense, dec("100"));
    assert_eq!(stats.summary.total_expense, dec("-100"));
    assert_eq!(stats.summary.balance, dec("-100"));
}

#[test]
fn every_category_appears_in_totals() {
    let txs = vec![
        tx(1, "2025-04-01", "10", TxType::Expense, "A"),
        tx(2, "2025-04-02", "10", TxType::Income, "B"),
        tx(3, "2025-04-03", "10", TxType::Expense, "A"),
        tx(4, "2025-04-04", "10", TxType::Expense, "C"),
    ];
    let stats = aggregate(&txs, &[], april());
    assert_eq!(stats.categories.len(), stats.category_totals.len());
    for ct in &stats.category_totals {
        assert_eq!(ct.total, stats.categories[&ct.category].net());
    }
}

#[test]
fn aggregation_is_idempotent() {
    let txs = vec![
        tx(1, "2025-04-01", "10", TxType::Expense, "A"),
        tx(2, "2025-04-02", "99.99", TxType::Income, "B"),
    ];
    let budgets = vec![budget(1, "A", "50", 4, 2025)];
    assert_eq!(
        aggregate(&txs, &budgets, april()),
        aggregate(&txs, &budgets, april())
    );
}

#[test]
fn budget_without_spending_reports_zero() {
    let budgets = vec![budget(1, "Entertainment", "200", 4, 2025)];
    let stats = aggregate(&[], &budgets, april());
    assert_eq!(stats.budget_comparison.len(), 1);
    assert_eq!(stats.budget_comparison[0].spent, Decimal::ZERO);
}

#[test]
fn income_does_not_count_as_spending() {
    let txs = vec![tx(1, "2025-04-01", "80", TxType::Income, "Food")];
    let budgets = vec![budget(1, "Food", "100", 4, 2025)];
    let stats = aggregate(&txs, &budgets, april());
    assert_eq!(stats.budget_comparison[0].spent, Decimal::ZERO);
}

#[test]
fn budgets_of_other_months_are_ignored() {
    let budgets = vec![
        budget(1, "Food", "100", 3, 2025),
        budget(2, "Food", "200", 4, 2025),
        budget(3, "Food", "300", 4, 2024),
    ];
    let stats = aggregate(&[], &budgets, april());
    assert_eq!(stats.budget_comparison.len(), 1);
    assert_eq!(stats.budget_comparison[0].budgeted, dec("200"));
}

#[test]
fn repeated_budget_keeps_the_last() {
    let budgets = vec![
        budget(1, "Food", "100", 4, 2025),
        budget(2, "Rent", "900", 4, 2025),
        budget(3, "Food", "250", 4, 2025),
    ];
    let stats = aggregate(&[], &budgets, april());
    assert_eq!(stats.budget_comparison.len(), 2);
    assert_eq!(stats.budget_comparison[0].category, "Food");
    assert_eq!(stats.budget_comparison[0].budgeted, dec("250"));
}

#[test]
fn recent_transactions_are_newest_first_and_capped() {
    let txs: Vec<TransactionRecord> = (1..=8)
        .map(|d| {
            tx(
                d,
                &format!("2025-04-{:02}", d),
                "1",
                TxType::Expense,
                "Food",
            )
        })
        .collect();
    let stats = aggregate(&txs, &[], april());
    assert_eq!(stats.recent_transactions.len(), RECENT_TRANSACTIONS);
    let ids: Vec<i64> = stats.recent_transactions.iter().map(|t| t.id).collect();
    assert_eq!(ids, [8, 7, 6, 5, 4]);
}

#[test]
fn equal_dates_keep_input_order() {
    let txs = vec![
        tx(1, "2025-04-10", "1", TxType::Expense, "Food"),
        tx(2, "2025-04-10", "2", TxType::Expense, "Food"),
        tx(3, "2025-04-11", "3", TxType::Expense, "Food"),
    ];
    let stats = aggregate(&txs, &[], april());
    let ids: Vec<i64> = stats.recent_transactions.iter().map(|t| t.id).collect();
    assert_eq!(ids, [3, 1, 2]);
}

#[test]
fn statistics_serialize_with_camel_case_keys() {
    let txs = vec![tx(1, "2025-04-01", "10", TxType::Expense, "Food")];
    let v = serde_json::to_value(aggregate(&txs, &[], april())).unwrap();
    assert_eq!(v["period"], "2025-04");
    assert!(v["summary"]["totalIncome"].is_string() || v["summary"]["totalIncome"].is_number());
    assert!(v.get("categoryTotals").is_some());
    assert!(v.get("recentTransactions").is_some());
    assert!(v.get("budgetComparison").is_some());
}

#[test]
fn overflowing_amounts_are_skipped() {
    let max = Decimal::MAX.to_string();
    let txs = vec![
        tx(1, "2025-04-01", &max, TxType::Income, "Salary"),
        tx(2, "2025-04-02", &max, TxType::Income, "Salary"),
        tx(3, "2025-04-03", &max, TxType::Expense, "Food"),
        tx(4, "2025-04-04", &max, TxType::Expense, "Rent"),
    ];
    let budgets = vec![budget(1, "Food", "0.01", 4, 2025)];
    let stats = aggregate(&txs, &budgets, april());

    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.summary.total_income, Decimal::MAX);
    assert_eq!(stats.summary.total_expense, -Decimal::MAX);
    assert_eq!(stats.summary.balance, Decimal::ZERO);
    assert!(!stats.categories.contains_key("Rent"));
    assert_eq!(stats.category_totals.len(), 2);
    let ids: Vec<i64> = stats.recent_transactions.iter().map(|t| t.id).collect();
    assert_eq!(ids, [3, 1]);
    assert_eq!(stats.budget_comparison[0].spent, Decimal::MAX);
}
