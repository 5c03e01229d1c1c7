// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let mut stmt = conn.prepare(
        "SELECT t.date, w.name as wallet, t.kind, t.amount, t.currency, t.category, t.note
         FROM transactions t
         LEFT JOIN wallets w ON t.wallet_id=w.id
         ORDER BY t.date, t.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, Option<String>>(6)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date", "wallet", "kind", "amount", "category", "currency", "note",
            ])?;
            for row in rows {
                let (d, w, k, amt, ccy, cat, note) = row?;
                wtr.write_record([
                    d,
                    w.unwrap_or_default(),
                    k,
                    amt,
                    cat.unwrap_or_default(),
                    ccy.unwrap_or_default(),
                    note.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, w, k, amt, ccy, cat, note) = row?;
                items.push(json!({
                    "date": d, "wallet": w, "kind": k, "amount": amt, "currency": ccy, "category": cat, "note": note
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => unreachable!(),
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
