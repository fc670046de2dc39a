// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::insert;
use crate::models::{TransactionRecord, TxType};
use crate::utils::{parse_date, parse_decimal};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use rusqlite::Connection;
use tracing::info;

const DEFAULT_CATEGORY: &str = "Uncategorized";

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let n = import_transactions(conn, path)?;
            println!("Imported {} transactions from {}", n, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Columns: date, description, amount, type, category, note. A blank type is
/// taken from the sign of the amount. Any bad row aborts the whole import.
pub fn import_transactions(conn: &mut Connection, path: &str) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut count = 0;
    for (i, result) in rdr.records().enumerate() {
        let line = i + 2;
        let rec = result.with_context(|| format!("Read line {}", line))?;
        let field = |idx: usize| rec.get(idx).map(str::trim).unwrap_or("");

        let date = parse_date(field(0)).with_context(|| format!("Line {}", line))?;
        let amount = parse_decimal(field(2)).with_context(|| format!("Line {}", line))?;
        let kind = match field(3) {
            "" if amount < Decimal::ZERO => TxType::Expense,
            "" => TxType::Income,
            s => s
                .parse::<TxType>()
                .with_context(|| format!("Line {}", line))?,
        };
        let category = match field(4) {
            "" => DEFAULT_CATEGORY,
            c => c,
        };
        let record = TransactionRecord {
            id: 0,
            date: Some(date),
            description: Some(field(1).to_string()),
            amount: Some(amount),
            r#type: Some(kind),
            category: Some(category.to_string()),
            note: Some(field(5)).filter(|s| !s.is_empty()).map(str::to_string),
        };
        let t = record
            .validate()
            .with_context(|| format!("Line {}", line))?;
        insert(&tx, &t)?;
        count += 1;
    }
    tx.commit()?;
    info!(count, path, "imported transactions");
    Ok(count)
}
