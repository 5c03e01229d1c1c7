// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TxKind;
use crate::profile::{is_supported, CurrencyError};
use crate::utils::{id_for_wallet, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{anyhow, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let wallet_name = sub.get_one::<String>("wallet").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let kind = TxKind::parse(sub.get_one::<String>("kind").unwrap())
        .ok_or_else(|| anyhow!("Kind must be 'income' or 'expense'"))?;
    let category = sub.get_one::<String>("category").map(|s| s.to_string());
    let note = sub.get_one::<String>("note").map(|s| s.to_string());

    if amount < Decimal::ZERO {
        return Err(anyhow!(
            "Amount must be non-negative; record an expense with --kind expense"
        ));
    }

    let wallet_id = id_for_wallet(conn, wallet_name)?;
    let currency = match sub.get_one::<String>("currency") {
        Some(c) => {
            let c = c.to_uppercase();
            if !is_supported(&c) {
                return Err(CurrencyError::Unsupported(c).into());
            }
            c
        }
        None => conn.query_row(
            "SELECT currency FROM wallets WHERE id=?1",
            params![wallet_id],
            |r| r.get(0),
        )?,
    };

    conn.execute(
        "INSERT INTO transactions(date, wallet_id, amount, kind, category, currency, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            date.to_string(),
            wallet_id,
            amount.to_string(),
            kind.as_str(),
            category,
            currency,
            note
        ],
    )?;
    println!(
        "Recorded {} {} {} on {} (wallet: {})",
        kind.as_str(),
        amount,
        currency,
        date,
        wallet_name
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.wallet.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.category.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Wallet", "Kind", "Amount", "CCY", "Category", "Note"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub date: String,
    pub wallet: String,
    pub kind: String,
    pub amount: String,
    pub currency: String,
    pub category: String,
    pub note: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.date, w.name, t.kind, t.amount, t.currency, t.category, t.note FROM transactions t LEFT JOIN wallets w ON t.wallet_id=w.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(wallet) = sub.get_one::<String>("wallet") {
        sql.push_str(" AND w.name=?");
        params_vec.push(wallet.into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND t.category=?");
        params_vec.push(cat.into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(0)?;
        let wallet: Option<String> = r.get(1)?;
        let kind: String = r.get(2)?;
        let amount: String = r.get(3)?;
        let currency: Option<String> = r.get(4)?;
        let category: Option<String> = r.get(5)?;
        let note: Option<String> = r.get(6)?;
        data.push(TransactionRow {
            date,
            wallet: wallet.unwrap_or_default(),
            kind,
            amount,
            currency: currency.unwrap_or_else(|| crate::profile::BASE_CURRENCY.to_string()),
            category: category.unwrap_or_default(),
            note: note.unwrap_or_default(),
        });
    }
    Ok(data)
}
