// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Period;
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::{Decimal, RoundingStrategy};

pub const DEFAULT_CURRENCY: &str = "USD";

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid color pattern"));

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<Period> {
    s.parse::<Period>()
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_color(s: &str) -> Result<String> {
    let s = s.trim();
    if HEX_COLOR.is_match(s) {
        Ok(s.to_lowercase())
    } else {
        Err(anyhow!("Invalid color '{}', expected #rrggbb", s))
    }
}

/// Resolve `--month`/`--year`, falling back to the current month and year.
pub fn period_from_args(sub: &clap::ArgMatches) -> Result<Period> {
    let current = Period::current()?;
    let month = sub
        .get_one::<u32>("month")
        .copied()
        .unwrap_or(current.month());
    let year = sub.get_one::<i32>("year").copied().unwrap_or(current.year());
    Ok(Period::new(month, year)?)
}

fn currency_symbol(ccy: &str) -> Option<&'static str> {
    match ccy {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "INR" => Some("₹"),
        _ => None,
    }
}

/// Currency-style money: `$1,234.50`, `-$3.00`, `CHF 12.00`.
pub fn fmt_money(d: Decimal, ccy: &str) -> String {
    let rounded = d
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded);
    let (int_part, frac) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if d < Decimal::ZERO && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    match currency_symbol(ccy) {
        Some(sym) => format!("{}{}{}.{}", sign, sym, grouped, frac),
        None => format!("{}{} {}.{}", sign, ccy, grouped, frac),
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn category_exists(conn: &Connection, name: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM categories WHERE name=?1",
            params![name],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn get_currency(conn: &Connection) -> Result<String> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='currency'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()))
}

pub fn set_currency(conn: &Connection, ccy: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('currency', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![ccy],
    )?;
    Ok(())
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn fmt_money_groups_thousands() {
        assert_eq!(fmt_money(d("300"), "USD"), "$300.00");
        assert_eq!(fmt_money(d("1234567.5"), "USD"), "$1,234,567.50");
        assert_eq!(fmt_money(d("-200"), "USD"), "-$200.00");
        assert_eq!(fmt_money(d("999.995"), "USD"), "$1,000.00");
        assert_eq!(fmt_money(d("12"), "CHF"), "CHF 12.00");
    }

    #[test]
    fn fmt_money_drops_sign_of_rounded_zero() {
        assert_eq!(fmt_money(d("-0.001"), "USD"), "$0.00");
    }

    #[test]
    fn parse_color_accepts_hex_only() {
        assert_eq!(parse_color(" #3498DB ").unwrap(), "#3498db");
        assert!(parse_color("blue").is_err());
        assert!(parse_color("#34").is_err());
    }
}
