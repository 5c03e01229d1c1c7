// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::rates::RateTable;

/// Currency assumed for any transaction recorded without an explicit code.
pub const BASE_CURRENCY: &str = "BRL";

pub const SUPPORTED_CURRENCIES: &[&str] = &["BRL", "USD", "EUR"];

pub fn is_supported(code: &str) -> bool {
    SUPPORTED_CURRENCIES.contains(&code)
}

#[derive(Debug, thiserror::Error)]
pub enum CurrencyError {
    #[error("Unsupported currency '{0}' (expected one of BRL, USD, EUR)")]
    Unsupported(String),
}

/// The currency all amounts are shown in. Falls back to the base currency
/// when no preference has been stored, so presentation code always has a
/// usable answer.
pub fn display_currency(conn: &Connection) -> Result<String> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='display_currency'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v.unwrap_or_else(|| BASE_CURRENCY.to_string()))
}

pub fn set_display_currency(conn: &Connection, code: &str) -> Result<()> {
    if !is_supported(code) {
        return Err(CurrencyError::Unsupported(code.to_string()).into());
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('display_currency', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![code],
    )?;
    Ok(())
}

/// Locale-aware money formatting: two decimal places, symbol and separators
/// per currency. Unknown codes fall back to "CODE 1234.56".
pub fn format_currency(amount: Decimal, code: &str) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    let raw = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));
    match code {
        "BRL" => format!("{}R$ {},{}", sign, group_thousands(int_part, '.'), frac_part),
        "EUR" => format!("{}\u{20ac} {},{}", sign, group_thousands(int_part, '.'), frac_part),
        "USD" => format!("{}${}.{}", sign, group_thousands(int_part, ','), frac_part),
        _ => format!("{} {}{}", code, sign, raw),
    }
}

/// Convert-then-format in one step, for presentation call sites.
pub fn format_converted(table: &RateTable, amount: Decimal, from: &str, display: &str) -> String {
    format_currency(table.convert(amount, from, display), display)
}

fn group_thousands(digits: &str, sep: char) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(*b as char);
    }
    out
}
