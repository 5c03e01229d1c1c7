// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TxKind;
use crate::profile::{is_supported, CurrencyError};
use crate::utils::{parse_date, parse_decimal};
use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::collections::{hash_map::Entry, HashMap};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

// Expected header: date,wallet,kind,amount,category,currency,note
fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut wallet_cache: HashMap<String, i64> = HashMap::new();
    let mut count = 0usize;

    for result in rdr.records() {
        let rec = result?;
        let date_raw = rec.get(0).context("date missing")?.trim().to_string();
        let wallet = rec.get(1).context("wallet missing")?.trim().to_string();
        let kind_raw = rec.get(2).context("kind missing")?.trim().to_lowercase();
        let amount_raw = rec.get(3).context("amount missing")?.trim().to_string();
        let category = rec.get(4).unwrap_or("").trim().to_string();
        let csv_currency = rec.get(5).unwrap_or("").trim().to_uppercase();
        let note = rec
            .get(6)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let date = parse_date(&date_raw)
            .with_context(|| format!("Invalid transaction date '{}'", date_raw))?;
        let kind = TxKind::parse(&kind_raw)
            .ok_or_else(|| anyhow!("Invalid kind '{}' (use income|expense)", kind_raw))?;
        let amount = parse_decimal(&amount_raw)
            .with_context(|| format!("Invalid amount '{}' on {}", amount_raw, date_raw))?;
        if amount < Decimal::ZERO {
            return Err(anyhow!(
                "Amount '{}' on {} is negative; direction belongs in the kind column",
                amount_raw,
                date_raw
            ));
        }

        let wallet_id = match wallet_cache.entry(wallet.clone()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id: i64 = tx
                    .query_row(
                        "SELECT id FROM wallets WHERE name=?1",
                        params![&wallet],
                        |r| r.get(0),
                    )
                    .with_context(|| format!("Wallet '{}' not found", wallet))?;
                *entry.insert(id)
            }
        };

        // Empty currency stays NULL; the row loader defaults it to the base
        // currency on read.
        let currency = if csv_currency.is_empty() {
            None
        } else if is_supported(&csv_currency) {
            Some(csv_currency)
        } else {
            return Err(CurrencyError::Unsupported(csv_currency).into());
        };

        tx.execute(
            "INSERT INTO transactions(date, wallet_id, amount, kind, category, currency, note) \
             VALUES (?1,?2,?3,?4,?5,?6,?7)",
            params![
                date.to_string(),
                wallet_id,
                amount.to_string(),
                kind.as_str(),
                if category.is_empty() {
                    None
                } else {
                    Some(category)
                },
                currency,
                note.as_deref()
            ],
        )?;
        count += 1;
    }
    tx.commit()?;
    println!("Imported {} transactions from {}", count, path);
    Ok(())
}
