// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::goals::{evaluate, load_goals, spent_for};
use crate::ledger::{self, Period};
use crate::profile::{display_currency, format_currency};
use crate::rates::RateTable;
use crate::utils::{maybe_print_json, parse_decimal, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("report", sub)) => report(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let limit = parse_decimal(sub.get_one::<String>("limit").unwrap())?;
    conn.execute(
        "INSERT INTO goals(month, category, limit_amount) VALUES (?1,?2,?3)
         ON CONFLICT(month, category) DO UPDATE SET limit_amount=excluded.limit_amount",
        params![month, category, limit.to_string()],
    )?;
    println!("Goal set for {} / {} = {}", month, category, limit);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = sub.get_one::<String>("month").map(|s| s.as_str());
    let goals = load_goals(conn, month)?;
    let display = display_currency(conn)?;
    let mut data = Vec::new();
    for g in goals {
        data.push(vec![
            g.month,
            g.category,
            format_currency(g.limit, &display),
        ]);
    }
    println!(
        "{}",
        pretty_table(&["Month", "Category", &format!("Limit ({})", display)], data)
    );
    Ok(())
}

#[derive(Serialize)]
struct GoalReportRow {
    category: String,
    limit: Decimal,
    spent: Decimal,
    used_pct: Decimal,
    status: &'static str,
}

fn report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = sub.get_one::<String>("month").unwrap();

    let period = Period::parse_month(month)?;
    let txs = ledger::load_transactions(conn)?;
    let table = RateTable::load(conn)?;
    let display = display_currency(conn)?;

    // spent is derived fresh on every report, valued at current rates
    let mut rows = Vec::new();
    for g in load_goals(conn, Some(month))? {
        let spent = spent_for(&txs, &g.category, &period, &table, &display);
        let status = evaluate(spent, g.limit);
        let used_pct = if g.limit > Decimal::ZERO {
            (spent / g.limit * Decimal::ONE_HUNDRED).round_dp(1)
        } else {
            Decimal::ZERO
        };
        rows.push(GoalReportRow {
            category: g.category,
            limit: g.limit,
            spent,
            used_pct,
            status: status.as_str(),
        });
    }

    if maybe_print_json(json_flag, jsonl_flag, &rows)? {
        return Ok(());
    }
    let mut data = Vec::new();
    for r in &rows {
        data.push(vec![
            r.category.clone(),
            format_currency(r.limit, &display),
            format_currency(r.spent, &display),
            format!("{}%", r.used_pct),
            r.status.to_string(),
        ]);
    }
    println!(
        "{}",
        pretty_table(&["Category", "Limit", "Spent", "Used", "Status"], data)
    );
    if table.is_stale() {
        println!("(rates are stale; statuses may shift after 'fx fetch')");
    }
    Ok(())
}
