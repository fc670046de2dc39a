// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::seed_default_categories;
use crate::models::{Category, CategoryType};
use crate::utils::{maybe_print_json, parse_color, pretty_table};
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => {
            let cat = get(conn, sub.get_one::<String>("name").unwrap().trim())?;
            if !maybe_print_json(sub.get_flag("json"), false, &cat)? {
                print_table(vec![cat]);
            }
        }
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            remove(conn, name)?;
            println!("Removed category '{}'", name);
        }
        Some(("seed", _)) => {
            let n = seed_default_categories(conn)?;
            println!("Added {} default categories", n);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim();
    if name.is_empty() {
        return Err(anyhow!("Category name cannot be empty"));
    }
    let kind: CategoryType = sub.get_one::<String>("type").unwrap().parse()?;
    let color = parse_color(sub.get_one::<String>("color").unwrap())?;
    let icon = sub.get_one::<String>("icon").unwrap().trim();
    conn.execute(
        "INSERT INTO categories(name, type, color, icon) VALUES (?1,?2,?3,?4)",
        params![name, kind.as_str(), color, icon],
    )
    .with_context(|| format!("Category '{}' already exists", name))?;
    println!("Added category '{}' ({})", name, kind);
    Ok(())
}

/// Transactions and budgets keep the name; they are not touched.
pub fn remove(conn: &Connection, name: &str) -> Result<()> {
    let n = conn.execute("DELETE FROM categories WHERE name=?1", params![name])?;
    if n == 0 {
        return Err(anyhow!("Category '{}' not found", name));
    }
    Ok(())
}

type CategoryRow = (i64, String, String, String, String);

fn category_row(r: &Row<'_>) -> rusqlite::Result<CategoryRow> {
    Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?))
}

fn into_category((id, name, kind, color, icon): CategoryRow) -> Result<Category> {
    Ok(Category {
        id,
        r#type: kind
            .parse::<CategoryType>()
            .with_context(|| format!("Category '{}' has a bad type", name))?,
        name,
        color,
        icon,
    })
}

pub fn get(conn: &Connection, name: &str) -> Result<Category> {
    let row = conn
        .query_row(
            "SELECT id, name, type, color, icon FROM categories WHERE name=?1",
            params![name],
            category_row,
        )
        .optional()?
        .ok_or_else(|| anyhow!("Category '{}' not found", name))?;
    into_category(row)
}

pub fn all(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt =
        conn.prepare("SELECT id, name, type, color, icon FROM categories ORDER BY name")?;
    let rows = stmt.query_map([], category_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(into_category(row?)?);
    }
    Ok(out)
}

/// Overwrite the category with `cat.id`. A rename moves transactions and
/// budgets that pointed at `old_name` to the new name in the same
/// transaction.
pub fn update(conn: &Connection, old_name: &str, cat: &Category) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE categories SET name=?1, type=?2, color=?3, icon=?4 WHERE id=?5",
        params![cat.name, cat.r#type.as_str(), cat.color, cat.icon, cat.id],
    )
    .with_context(|| format!("Category '{}' already exists", cat.name))?;
    if cat.name != old_name {
        let moved = tx.execute(
            "UPDATE transactions SET category=?1 WHERE category=?2",
            params![cat.name, old_name],
        )?;
        let budgets = tx
            .execute(
                "UPDATE budgets SET category=?1 WHERE category=?2",
                params![cat.name, old_name],
            )
            .with_context(|| {
                format!("Budgets for '{}' overlap budgets for '{}'", old_name, cat.name)
            })?;
        info!(from = %old_name, to = %cat.name, transactions = moved, budgets, "renamed category");
    }
    tx.commit()?;
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim();
    let mut cat = get(conn, name)?;
    if let Some(n) = sub.get_one::<String>("new-name") {
        let n = n.trim();
        if n.is_empty() {
            return Err(anyhow!("Category name cannot be empty"));
        }
        cat.name = n.to_string();
    }
    if let Some(t) = sub.get_one::<String>("type") {
        cat.r#type = t.parse()?;
    }
    if let Some(c) = sub.get_one::<String>("color") {
        cat.color = parse_color(c)?;
    }
    if let Some(i) = sub.get_one::<String>("icon") {
        cat.icon = i.trim().to_string();
    }
    update(conn, name, &cat)?;
    println!("Updated category '{}'", cat.name);
    Ok(())
}

fn print_table(data: Vec<Category>) {
    let rows = data
        .into_iter()
        .map(|c| vec![c.name, c.r#type.to_string(), c.color, c.icon])
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Type", "Color", "Icon"], rows)
    );
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = all(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        print_table(data);
    }
    Ok(())
}
