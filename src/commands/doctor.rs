// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::source::{budget_record, transaction_record};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use tracing::debug;

pub fn handle(conn: &Connection) -> Result<()> {
    let found = issues(conn)?;
    if found.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = found.into_iter().map(|(k, d)| vec![k, d]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// (issue kind, detail) pairs for every row the engine would skip or that
/// names a category missing from the categories table.
pub fn issues(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut rows = Vec::new();

    // 1) Categories referenced but never defined
    for (table, kind) in [
        ("transactions", "orphan_transaction_category"),
        ("budgets", "orphan_budget_category"),
    ] {
        let mut stmt = conn.prepare(&format!(
            "SELECT DISTINCT category FROM {table}
             WHERE category IS NOT NULL AND TRIM(category) != ''
               AND category NOT IN (SELECT name FROM categories)
             ORDER BY category"
        ))?;
        let mut cur = stmt.query([])?;
        while let Some(r) = cur.next()? {
            let c: String = r.get(0)?;
            rows.push((kind.to_string(), c));
        }
    }

    // 2) Transactions the aggregation would skip
    let mut stmt = conn.prepare(
        "SELECT id, date, description, amount, type, category, note
         FROM transactions ORDER BY id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let rec = transaction_record(r)?;
        if let Err(e) = rec.validate() {
            rows.push(("malformed_transaction".into(), format!("id {}: {}", rec.id, e)));
        }
    }

    // 3) Budgets the aggregation would skip
    let mut stmt = conn.prepare("SELECT id, category, amount, month, year FROM budgets ORDER BY id")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let rec = budget_record(r)?;
        if let Err(e) = rec.validate() {
            rows.push(("malformed_budget".into(), format!("id {}: {}", rec.id, e)));
        }
    }

    debug!(issues = rows.len(), "doctor finished");
    Ok(rows)
}
