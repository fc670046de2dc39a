// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Pocketbook", "pocketbook"));

/// name, color, icon, type
pub const DEFAULT_CATEGORIES: &[(&str, &str, &str, &str)] = &[
    ("Food & Dining", "#e74c3c", "utensils", "expense"),
    ("Transportation", "#3498db", "car", "expense"),
    ("Housing", "#2ecc71", "home", "expense"),
    ("Utilities", "#f39c12", "bolt", "expense"),
    ("Entertainment", "#9b59b6", "film", "expense"),
    ("Shopping", "#e67e22", "shopping-bag", "expense"),
    ("Healthcare", "#1abc9c", "medkit", "expense"),
    ("Personal Care", "#34495e", "user", "expense"),
    ("Education", "#8e44ad", "book", "expense"),
    ("Salary", "#27ae60", "money-bill", "income"),
    ("Investment", "#16a085", "chart-line", "income"),
    ("Gift", "#f1c40f", "gift", "income"),
    ("Other", "#95a5a6", "ellipsis-h", "both"),
];

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("pocketbook.sqlite"))
}

/// Open the database at `path` (or the platform default) and make sure the
/// schema exists.
pub fn open_or_init(path: Option<&Path>) -> Result<Connection> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => db_path()?,
    };
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    debug!(path = %path.display(), "database ready");
    Ok(conn)
}

/// Categories are referenced by name from transactions and budgets. There is
/// no foreign key: removing a category leaves those rows pointing at nothing.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        type TEXT NOT NULL DEFAULT 'expense' CHECK(type IN ('income','expense','both')),
        color TEXT NOT NULL DEFAULT '#3498db',
        icon TEXT NOT NULL DEFAULT 'tag',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT,
        description TEXT,
        amount TEXT,
        type TEXT,
        category TEXT,
        note TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS budgets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        month INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
        year INTEGER NOT NULL CHECK(year BETWEEN 2000 AND 9999),
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(category, month, year)
    );
    "#,
    )?;
    Ok(())
}

/// Insert [`DEFAULT_CATEGORIES`] when the table is empty. Returns how many
/// categories were added.
pub fn seed_default_categories(conn: &Connection) -> Result<usize> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
    if existing > 0 {
        debug!(existing, "categories already exist, skipping seed");
        return Ok(0);
    }
    let mut stmt =
        conn.prepare("INSERT INTO categories(name, color, icon, type) VALUES (?1,?2,?3,?4)")?;
    for (name, color, icon, kind) in DEFAULT_CATEGORIES {
        stmt.execute(params![name, color, icon, kind])?;
    }
    info!(count = DEFAULT_CATEGORIES.len(), "seeded default categories");
    Ok(DEFAULT_CATEGORIES.len())
}
