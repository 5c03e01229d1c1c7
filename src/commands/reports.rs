// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{self, Period};
use crate::profile::{display_currency, format_currency};
use crate::rates::RateTable;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = sub.get_one::<String>("month").unwrap();
    let compare = sub.get_flag("compare");

    let period = Period::parse_month(month)?;
    let txs = ledger::load_transactions(conn)?;
    let table = RateTable::load(conn)?;
    let display = display_currency(conn)?;

    let result = if compare {
        ledger::aggregate_with_comparison(&txs, &period, &table, &display)
    } else {
        ledger::aggregate(&txs, &period, &table, &display)
    };

    if maybe_print_json(json_flag, jsonl_flag, &result)? {
        return Ok(());
    }

    let fmt_delta = |d: Decimal| format!("{:+.1}%", d.round_dp(1));
    let mut data = vec![
        vec![
            "Income".to_string(),
            format_currency(result.total_income, &display),
            result
                .vs_previous
                .as_ref()
                .map(|d| fmt_delta(d.income_pct))
                .unwrap_or_default(),
        ],
        vec![
            "Expenses".to_string(),
            format_currency(result.total_expenses, &display),
            result
                .vs_previous
                .as_ref()
                .map(|d| fmt_delta(d.expenses_pct))
                .unwrap_or_default(),
        ],
        vec![
            "Net".to_string(),
            format_currency(result.net_result, &display),
            result
                .vs_previous
                .as_ref()
                .map(|d| fmt_delta(d.net_pct))
                .unwrap_or_default(),
        ],
    ];
    for c in result.by_category.iter().take(5) {
        data.push(vec![
            format!("  {}", c.category),
            format_currency(c.total, &display),
            format!("{:.1}%", c.percentage.round_dp(1)),
        ]);
    }
    println!(
        "{}",
        pretty_table(&["Metric", &format!("Amount ({})", display), "Change"], data)
    );
    if table.is_stale() {
        println!("(rates are stale; run 'fx fetch' to refresh)");
    }
    Ok(())
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: usize = *sub.get_one::<usize>("months").unwrap();

    let txs = ledger::load_transactions(conn)?;
    let table = RateTable::load(conn)?;
    let display = display_currency(conn)?;

    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for tx in &txs {
        let converted = table.convert(tx.amount, &tx.currency, &display);
        let entry = map
            .entry(tx.date.format("%Y-%m").to_string())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match tx.kind {
            crate::models::TxKind::Income => entry.0 += converted,
            crate::models::TxKind::Expense => entry.1 += converted,
        }
    }

    let mut data = Vec::new();
    for (m, (inc, exp)) in map.iter().rev().take(months) {
        data.push(vec![
            m.clone(),
            format!("{:.2}", inc),
            format!("{:.2}", exp),
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(
                &[
                    "Month",
                    &format!("Income ({})", display),
                    &format!("Expense ({})", display)
                ],
                data
            )
        );
    }
    Ok(())
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = sub.get_one::<String>("month").unwrap();

    let period = Period::parse_month(month)?;
    let txs = ledger::load_transactions(conn)?;
    let table = RateTable::load(conn)?;
    let display = display_currency(conn)?;
    let result = ledger::aggregate(&txs, &period, &table, &display);

    if maybe_print_json(json_flag, jsonl_flag, &result.by_category)? {
        return Ok(());
    }
    let mut data = Vec::new();
    for c in &result.by_category {
        data.push(vec![
            c.category.clone(),
            format_currency(c.total, &display),
            format!("{:.1}%", c.percentage.round_dp(1)),
            c.count.to_string(),
        ]);
    }
    println!(
        "{}",
        pretty_table(
            &["Category", &format!("Spent ({})", display), "Share", "Count"],
            data
        )
    );
    Ok(())
}
