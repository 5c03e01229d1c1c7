// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::{
    AggregationResult, CategoryBreakdown, PeriodDeltas, Transaction, TxKind,
};
use crate::profile::BASE_CURRENCY;
use crate::rates::RateTable;

pub const UNCATEGORIZED: &str = "(uncategorized)";

/// Inclusive calendar-date range. Comparison is on parsed dates, never on
/// timestamps, so period edges are immune to timezone boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Period {
        Period { start, end }
    }

    pub fn month(year: i32, month: u32) -> Result<Period> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .with_context(|| format!("Invalid month {}-{:02}", year, month))?;
        let (ny, nm) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end = NaiveDate::from_ymd_opt(ny, nm, 1)
            .and_then(|d| d.pred_opt())
            .with_context(|| format!("Invalid month {}-{:02}", year, month))?;
        Ok(Period { start, end })
    }

    /// Parse "YYYY-MM" into that calendar month.
    pub fn parse_month(s: &str) -> Result<Period> {
        let first = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
        Period::month(first.year(), first.month())
    }

    /// The immediately preceding period: the prior calendar month for a
    /// month period, otherwise the same-length range ending the day before
    /// `start`.
    pub fn previous(&self) -> Period {
        if self.start.day() == 1 {
            if let Ok(p) = Period::month(self.start.year(), self.start.month()) {
                if p == *self {
                    let (py, pm) = if self.start.month() == 1 {
                        (self.start.year() - 1, 12)
                    } else {
                        (self.start.year(), self.start.month() - 1)
                    };
                    if let Ok(prev) = Period::month(py, pm) {
                        return prev;
                    }
                }
            }
        }
        let len = self.end - self.start;
        let end = self.start - Duration::days(1);
        Period {
            start: end - len,
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Ingestion boundary for ledger rows. Normalization happens here and only
/// here: a missing currency becomes the base currency, rows with dates or
/// amounts that do not parse are excluded rather than rejected. Consumers
/// always see fully-populated records.
pub fn load_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, wallet_id, amount, kind, category, currency, note
         FROM transactions ORDER BY date, id",
    )?;
    let mut cur = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let date_s: String = r.get(1)?;
        let wallet_id: i64 = r.get(2)?;
        let amount_s: String = r.get(3)?;
        let kind_s: String = r.get(4)?;
        let category: Option<String> = r.get(5)?;
        let currency: Option<String> = r.get(6)?;
        let note: Option<String> = r.get(7)?;

        let Ok(date) = NaiveDate::parse_from_str(&date_s, "%Y-%m-%d") else {
            continue;
        };
        let Ok(amount) = amount_s.parse::<Decimal>() else {
            continue;
        };
        let Some(kind) = TxKind::parse(&kind_s) else {
            continue;
        };
        let currency = currency
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| BASE_CURRENCY.to_string());
        out.push(Transaction {
            id,
            date,
            wallet_id,
            amount,
            kind,
            category: category.filter(|c| !c.is_empty()),
            currency,
            note,
        });
    }
    Ok(out)
}

/// Pure reduction over already-loaded rows: filter to the period, convert
/// each amount into the display currency, partition by kind, and break
/// expenses down by category. Empty input produces zeroed results, not an
/// error.
pub fn aggregate(
    txs: &[Transaction],
    period: &Period,
    rates: &RateTable,
    display: &str,
) -> AggregationResult {
    let mut total_income = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;
    let mut by_category: Vec<CategoryBreakdown> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for tx in txs.iter().filter(|t| period.contains(t.date)) {
        let converted = rates.convert(tx.amount, &tx.currency, display);
        match tx.kind {
            TxKind::Income => total_income += converted,
            TxKind::Expense => {
                total_expenses += converted;
                let name = tx.category.as_deref().unwrap_or(UNCATEGORIZED);
                let slot = *index.entry(name.to_string()).or_insert_with(|| {
                    by_category.push(CategoryBreakdown {
                        category: name.to_string(),
                        total: Decimal::ZERO,
                        percentage: Decimal::ZERO,
                        count: 0,
                    });
                    by_category.len() - 1
                });
                by_category[slot].total += converted;
                by_category[slot].count += 1;
            }
        }
    }

    for c in &mut by_category {
        c.percentage = if total_expenses > Decimal::ZERO {
            c.total / total_expenses * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
    }
    // Stable sort: ties keep first-occurrence order.
    by_category.sort_by(|a, b| b.total.cmp(&a.total));

    AggregationResult {
        period_start: period.start,
        period_end: period.end,
        total_income,
        total_expenses,
        net_result: total_income - total_expenses,
        by_category,
        vs_previous: None,
    }
}

/// Same as [`aggregate`], plus percentage deltas against the immediately
/// preceding period.
pub fn aggregate_with_comparison(
    txs: &[Transaction],
    period: &Period,
    rates: &RateTable,
    display: &str,
) -> AggregationResult {
    let mut current = aggregate(txs, period, rates, display);
    let previous = aggregate(txs, &period.previous(), rates, display);
    current.vs_previous = Some(PeriodDeltas {
        income_pct: pct_delta(current.total_income, previous.total_income),
        expenses_pct: pct_delta(current.total_expenses, previous.total_expenses),
        net_pct: pct_delta(current.net_result, previous.net_result),
    });
    current
}

// A non-positive previous value yields 0 rather than an infinity or a
// sign-confused percentage.
fn pct_delta(current: Decimal, previous: Decimal) -> Decimal {
    if previous > Decimal::ZERO {
        (current - previous) / previous * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}
