// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::source::transaction_record;
use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use serde_json::json;
use tracing::info;

const HEADER: [&str; 7] = ["id", "date", "description", "amount", "type", "category", "note"];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let fmt = sub.get_one::<String>("format").unwrap();
            let out = sub.get_one::<String>("out").unwrap();
            let n = export_transactions(conn, fmt, out)?;
            println!("Exported {} transactions to {}", n, out);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Write every stored transaction to `out` as `csv` or `json`.
pub fn export_transactions(conn: &Connection, format: &str, out: &str) -> Result<usize> {
    let fmt = format.trim().to_lowercase();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", format);
    }

    let mut stmt = conn.prepare(
        "SELECT id, date, description, amount, type, category, note
         FROM transactions
         ORDER BY date, id",
    )?;
    let rows = stmt
        .query_map([], |r| {
            let rec = transaction_record(r)?;
            Ok((
                rec.id,
                rec.date.map(|d| d.to_string()).unwrap_or_default(),
                rec.description.unwrap_or_default(),
                rec.amount.map(|a| a.to_string()).unwrap_or_default(),
                rec.r#type.map(|t| t.to_string()).unwrap_or_default(),
                rec.category.unwrap_or_default(),
                rec.note.unwrap_or_default(),
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    if fmt == "csv" {
        let mut wtr =
            csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
        wtr.write_record(HEADER)?;
        for (id, date, desc, amount, kind, cat, note) in &rows {
            wtr.write_record([&id.to_string(), date, desc, amount, kind, cat, note])?;
        }
        wtr.flush()?;
    } else {
        let items: Vec<_> = rows
            .iter()
            .map(|(id, date, desc, amount, kind, cat, note)| {
                json!({
                    "id": id, "date": date, "description": desc, "amount": amount,
                    "type": kind, "category": cat, "note": note
                })
            })
            .collect();
        std::fs::write(out, serde_json::to_string_pretty(&items)?)
            .with_context(|| format!("Write {}", out))?;
    }
    info!(count = rows.len(), format = %fmt, out, "exported transactions");
    Ok(rows.len())
}
