// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Transaction, TransactionRecord, TxType};
use crate::source::transaction_record;
use crate::utils::{category_exists, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result, anyhow};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use tracing::{info, warn};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            remove(conn, id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };
    let record = TransactionRecord {
        id: 0,
        date: Some(date),
        description: sub.get_one::<String>("description").map(|s| s.trim().to_string()),
        amount: Some(parse_decimal(sub.get_one::<String>("amount").unwrap())?),
        r#type: Some(sub.get_one::<String>("type").unwrap().parse::<TxType>()?),
        category: sub.get_one::<String>("category").map(|s| s.trim().to_string()),
        note: sub.get_one::<String>("note").map(|s| s.trim().to_string()),
    };
    let t = record.validate()?;
    let id = insert(conn, &t)?;
    if !category_exists(conn, &t.category)? {
        warn!(category = %t.category, "category is not defined");
    }
    println!(
        "Recorded {} {} on {} in '{}' (id {})",
        t.r#type, t.amount, t.date, t.category, id
    );
    Ok(())
}

pub fn insert(conn: &Connection, t: &Transaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(date, description, amount, type, category, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            t.date.to_string(),
            t.description,
            t.amount.to_string(),
            t.r#type.as_str(),
            t.category,
            t.note
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// The stored row as-is, even when it would not pass validation.
pub fn get(conn: &Connection, id: i64) -> Result<TransactionRecord> {
    conn.query_row(
        "SELECT id, date, description, amount, type, category, note
         FROM transactions WHERE id=?1",
        params![id],
        transaction_record,
    )
    .optional()?
    .ok_or_else(|| anyhow!("Transaction {} not found", id))
}

/// Validate `rec` and overwrite the row with the same id.
pub fn update(conn: &Connection, rec: &TransactionRecord) -> Result<Transaction> {
    let t = rec
        .validate()
        .with_context(|| format!("Transaction {} is invalid", rec.id))?;
    let n = conn.execute(
        "UPDATE transactions
         SET date=?1, description=?2, amount=?3, type=?4, category=?5, note=?6
         WHERE id=?7",
        params![
            t.date.to_string(),
            t.description,
            t.amount.to_string(),
            t.r#type.as_str(),
            t.category,
            t.note,
            t.id
        ],
    )?;
    if n == 0 {
        return Err(anyhow!("Transaction {} not found", t.id));
    }
    Ok(t)
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut rec = get(conn, id)?;
    if let Some(s) = sub.get_one::<String>("date") {
        rec.date = Some(parse_date(s)?);
    }
    if let Some(s) = sub.get_one::<String>("amount") {
        rec.amount = Some(parse_decimal(s)?);
    }
    if let Some(s) = sub.get_one::<String>("type") {
        rec.r#type = Some(s.parse::<TxType>()?);
    }
    if let Some(s) = sub.get_one::<String>("category") {
        rec.category = Some(s.trim().to_string());
    }
    if let Some(s) = sub.get_one::<String>("description") {
        rec.description = Some(s.trim().to_string());
    }
    if let Some(s) = sub.get_one::<String>("note") {
        rec.note = Some(s.trim()).filter(|n| !n.is_empty()).map(str::to_string);
    }
    let t = update(conn, &rec)?;
    if !category_exists(conn, &t.category)? {
        warn!(category = %t.category, "category is not defined");
    }
    info!(id, "transaction updated");
    println!(
        "Updated transaction {}: {} {} on {} in '{}'",
        id, t.r#type, t.amount, t.date, t.category
    );
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let rec = get(conn, *sub.get_one::<i64>("id").unwrap())?;
    if !maybe_print_json(sub.get_flag("json"), false, &rec)? {
        let field = |v: Option<String>| v.unwrap_or_default();
        let rows = vec![
            vec!["ID".to_string(), rec.id.to_string()],
            vec!["Date".to_string(), field(rec.date.map(|d| d.to_string()))],
            vec!["Description".to_string(), field(rec.description.clone())],
            vec!["Amount".to_string(), field(rec.amount.map(|a| a.to_string()))],
            vec!["Type".to_string(), field(rec.r#type.map(|t| t.to_string()))],
            vec!["Category".to_string(), field(rec.category.clone())],
            vec!["Note".to_string(), field(rec.note.clone())],
        ];
        println!("{}", pretty_table(&["Field", "Value"], rows));
        if let Err(e) = rec.validate() {
            println!("Invalid: {}", e);
        }
    }
    Ok(())
}

pub fn remove(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(anyhow!("Transaction {} not found", id));
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let page = query_page(conn, sub)?;
    if json_flag {
        maybe_print_json(true, false, &page)?;
        return Ok(());
    }
    if !maybe_print_json(false, jsonl_flag, &page.transactions)? {
        let p = &page.pagination;
        let rows: Vec<Vec<String>> = page
            .transactions
            .into_iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date,
                    r.description,
                    r.amount,
                    r.r#type,
                    r.category,
                    r.note,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Description", "Amount", "Type", "Category", "Note"],
                rows,
            )
        );
        println!(
            "Page {} of {} ({} transactions)",
            p.current_page, p.total_pages, p.total_items
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub r#type: String,
    pub category: String,
    pub note: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

#[derive(Debug, Serialize)]
pub struct TransactionPage {
    pub transactions: Vec<TransactionRow>,
    pub pagination: Pagination,
}

/// Filter by type, category and inclusive date range, newest first, one page.
pub fn query_page(conn: &Connection, sub: &clap::ArgMatches) -> Result<TransactionPage> {
    let mut filter = String::from(" WHERE 1=1");
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(kind) = sub.get_one::<String>("type") {
        filter.push_str(" AND type=?");
        params_vec.push(kind.parse::<TxType>()?.as_str().into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        filter.push_str(" AND category=?");
        params_vec.push(cat.trim().into());
    }
    if let Some(from) = sub.get_one::<String>("from") {
        filter.push_str(" AND date>=?");
        params_vec.push(parse_date(from)?.to_string());
    }
    if let Some(to) = sub.get_one::<String>("to") {
        filter.push_str(" AND date<=?");
        params_vec.push(parse_date(to)?.to_string());
    }

    let page = u64::from(*sub.get_one::<u32>("page").unwrap_or(&1));
    let limit = u64::from(*sub.get_one::<u32>("limit").unwrap_or(&10));

    let total_items: u64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM transactions{}", filter),
        rusqlite::params_from_iter(params_vec.iter()),
        |r| r.get::<_, i64>(0),
    )? as u64;
    let total_pages = total_items.div_ceil(limit);

    let sql = format!(
        "SELECT id, date, description, amount, type, category, note FROM transactions{} \
         ORDER BY date DESC, id DESC LIMIT {} OFFSET {}",
        filter,
        limit,
        (page - 1) * limit
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let rec = transaction_record(r)?;
        let raw_amount = crate::source::text_at(r, 3)?;
        data.push(TransactionRow {
            id: rec.id,
            date: rec.date.map(|d| d.to_string()).unwrap_or_default(),
            description: rec.description.unwrap_or_default(),
            amount: raw_amount.unwrap_or_default(),
            r#type: rec.r#type.map(|t| t.to_string()).unwrap_or_default(),
            category: rec.category.unwrap_or_default(),
            note: rec.note.unwrap_or_default(),
        });
    }

    Ok(TransactionPage {
        transactions: data,
        pagination: Pagination {
            total_items,
            total_pages,
            current_page: page,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        },
    })
}
