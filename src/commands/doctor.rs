// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::profile::{display_currency, is_supported};
use crate::rates::RateTable;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();
    let table = RateTable::load(conn)?;
    let display = display_currency(conn)?;

    // 1) Unsupported currencies on wallets or transactions
    for sql in [
        "SELECT DISTINCT currency FROM wallets",
        "SELECT DISTINCT currency FROM transactions WHERE currency IS NOT NULL",
    ] {
        let mut stmt = conn.prepare(sql)?;
        let mut cur = stmt.query([])?;
        while let Some(r) = cur.next()? {
            let c: String = r.get(0)?;
            if !c.is_empty() && !is_supported(&c) {
                rows.push(vec!["unsupported_currency".into(), c]);
            }
        }
    }

    // 2) Conversion coverage: transaction currencies that would fall back to
    //    identity against the display currency
    let mut stmt = conn.prepare("SELECT DISTINCT IFNULL(currency, ?1) FROM transactions")?;
    let mut cur = stmt.query([crate::profile::BASE_CURRENCY])?;
    while let Some(r) = cur.next()? {
        let ccy: String = r.get(0)?;
        if ccy != display && table.get_rate(&ccy, &display) == rust_decimal::Decimal::ONE {
            rows.push(vec![
                "missing_fx".into(),
                format!("{} -> {} (shown at face value)", ccy, display),
            ]);
        }
    }

    // 3) Stale rate table
    if table.is_stale() {
        let detail = match table.last_updated() {
            Some(t) => format!("last refreshed {}", t.to_rfc3339()),
            None => "never refreshed".to_string(),
        };
        rows.push(vec!["stale_rates".into(), detail]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
