// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::{Period, UNCATEGORIZED};
use crate::models::{CategoryGoal, Transaction, TxKind};
use crate::rates::RateTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Excellent,
    Good,
    Warning,
    Critical,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Excellent => "excellent",
            GoalStatus::Good => "good",
            GoalStatus::Warning => "warning",
            GoalStatus::Critical => "critical",
        }
    }
}

/// Pure classification of spend against a limit. Breakpoints are fixed:
/// up to 50% excellent, up to 80% good, under 100% warning, at or past the
/// limit critical. No state is kept between calls.
pub fn evaluate(spent: Decimal, limit: Decimal) -> GoalStatus {
    if limit <= Decimal::ZERO {
        // A ratio against a non-positive limit is meaningless; any spend is over.
        return if spent <= Decimal::ZERO {
            GoalStatus::Excellent
        } else {
            GoalStatus::Critical
        };
    }
    let ratio = spent / limit;
    if ratio <= Decimal::new(5, 1) {
        GoalStatus::Excellent
    } else if ratio <= Decimal::new(8, 1) {
        GoalStatus::Good
    } else if ratio < Decimal::ONE {
        GoalStatus::Warning
    } else {
        GoalStatus::Critical
    }
}

/// Spend for one category over a period, converted into the display
/// currency with *current* rates. Always recomputed; a rate refresh can
/// therefore retroactively change a past month's classification.
pub fn spent_for(
    txs: &[Transaction],
    category: &str,
    period: &Period,
    rates: &RateTable,
    display: &str,
) -> Decimal {
    txs.iter()
        .filter(|t| t.kind == TxKind::Expense && period.contains(t.date))
        .filter(|t| t.category.as_deref().unwrap_or(UNCATEGORIZED) == category)
        .map(|t| rates.convert(t.amount, &t.currency, display))
        .sum()
}

pub fn load_goals(conn: &Connection, month: Option<&str>) -> Result<Vec<CategoryGoal>> {
    let mut sql = String::from("SELECT id, month, category, limit_amount FROM goals");
    if month.is_some() {
        sql.push_str(" WHERE month=?1");
    }
    sql.push_str(" ORDER BY month DESC, category");
    let mut stmt = conn.prepare(&sql)?;
    let mut cur = match month {
        Some(m) => stmt.query([m])?,
        None => stmt.query([])?,
    };
    let mut out = Vec::new();
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let month: String = r.get(1)?;
        let category: String = r.get(2)?;
        let limit_s: String = r.get(3)?;
        let limit = limit_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid goal limit '{}' for {}", limit_s, category))?;
        out.push(CategoryGoal {
            id,
            month,
            category,
            limit,
        });
    }
    Ok(out)
}
