// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::ExchangeRate;
use crate::profile::{display_currency, set_display_currency, SUPPORTED_CURRENCIES};
use crate::rates::{self, RateTable};
use crate::utils::{http_client, parse_decimal, pretty_table};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-display", sub)) => {
            let ccy = sub.get_one::<String>("currency").unwrap().to_uppercase();
            set_display_currency(conn, &ccy)?;
            println!("Display currency set to {}", ccy);
        }
        Some(("status", _)) => status(conn)?,
        Some(("fetch", _)) => fetch_rates(conn)?,
        Some(("list", _)) => list_rates(conn)?,
        Some(("convert", sub)) => convert_amount(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn status(conn: &Connection) -> Result<()> {
    let table = RateTable::load(conn)?;
    println!("Display currency: {}", display_currency(conn)?);
    match table.last_updated() {
        Some(t) => println!(
            "Rates: {} pairs, last refreshed {}",
            table.len(),
            t.to_rfc3339()
        ),
        None => println!("Rates: none fetched yet"),
    }
    if table.is_stale() {
        println!("Rates are stale (older than {}h); amounts still convert, run 'fx fetch' to refresh.", rates::STALE_AFTER_HOURS);
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct Latest {
    rates: std::collections::HashMap<String, f64>,
    #[serde(rename = "base")]
    _base: String,
}

/// Fetch a fresh snapshot for every supported base and replace the stored
/// table wholesale.
fn fetch_rates(conn: &mut Connection) -> Result<()> {
    let client = http_client()?;
    let now = Utc::now();
    let mut rows = Vec::new();
    for base in SUPPORTED_CURRENCIES {
        let targets: Vec<&str> = SUPPORTED_CURRENCIES
            .iter()
            .filter(|c| *c != base)
            .copied()
            .collect();
        let url = format!(
            "https://api.frankfurter.dev/latest?from={}&to={}",
            base,
            targets.join(",")
        );
        let resp = client.get(url).send()?.error_for_status()?;
        let latest: Latest = resp.json()?;
        for (quote, rate) in latest.rates {
            let rate = rate
                .to_string()
                .parse::<Decimal>()
                .with_context(|| format!("Invalid rate '{}' for {}/{}", rate, base, quote))?;
            rows.push(ExchangeRate {
                base: base.to_string(),
                quote,
                rate,
                updated_at: now,
            });
        }
    }
    let count = rows.len();
    rates::replace_all(conn, &rows)?;
    println!("Fetched {} rates via Frankfurter (ECB).", count);
    Ok(())
}

fn list_rates(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(
        "SELECT base, quote, rate, updated_at FROM exchange_rates ORDER BY base, quote",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (b, q, rate, updated) = row?;
        data.push(vec![b, q, rate, updated]);
    }
    println!(
        "{}",
        pretty_table(&["Base", "Quote", "Rate", "Updated"], data)
    );
    Ok(())
}

fn convert_amount(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let from = sub.get_one::<String>("from").unwrap().to_uppercase();
    let to = sub.get_one::<String>("to").unwrap().to_uppercase();
    let table = RateTable::load(conn)?;
    let res = table.convert(amount, &from, &to);
    println!("{} {} -> {:.2} {}", amount, from, res, to);
    if table.is_stale() {
        println!("(rates are stale; run 'fx fetch' to refresh)");
    }
    Ok(())
}
