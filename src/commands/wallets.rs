// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::profile::{is_supported, CurrencyError};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let kind = sub.get_one::<String>("kind").unwrap();
            let ccy = sub.get_one::<String>("currency").unwrap().to_uppercase();
            if !is_supported(&ccy) {
                return Err(CurrencyError::Unsupported(ccy).into());
            }
            conn.execute(
                "INSERT INTO wallets(name, kind, currency) VALUES (?1, ?2, ?3)",
                params![name, kind, ccy],
            )?;
            println!("Added wallet '{}' ({}, {})", name, kind, ccy);
        }
        Some(("list", _)) => {
            let mut stmt =
                conn.prepare("SELECT name, kind, currency, created_at FROM wallets ORDER BY name")?;
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
                let (n, k, c, cr) = row?;
                data.push(vec![n, k, c, cr]);
            }
            println!(
                "{}",
                pretty_table(&["Name", "Kind", "Currency", "Created"], data)
            );
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute("DELETE FROM wallets WHERE name=?1", params![name])?;
            println!("Removed wallet '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
