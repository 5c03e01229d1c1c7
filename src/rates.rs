// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::ExchangeRate;

/// Rates older than this are reported stale. Advisory only; conversion
/// never refuses to use a stale rate.
pub const STALE_AFTER_HOURS: i64 = 48;

// Last-resort static rates, consulted only when the store has no row for a
// directional pair. Kept deliberately coarse.
static FALLBACK_RATES: Lazy<Vec<(&'static str, &'static str, Decimal)>> = Lazy::new(|| {
    vec![
        ("USD", "BRL", Decimal::new(540, 2)),
        ("BRL", "USD", Decimal::new(1850, 4)),
        ("EUR", "BRL", Decimal::new(630, 2)),
        ("BRL", "EUR", Decimal::new(1590, 4)),
        ("USD", "EUR", Decimal::new(92, 2)),
        ("EUR", "USD", Decimal::new(109, 2)),
    ]
});

fn fallback_rate(from: &str, to: &str) -> Option<Decimal> {
    FALLBACK_RATES
        .iter()
        .find(|(b, q, _)| *b == from && *q == to)
        .map(|(_, _, r)| *r)
}

#[derive(Debug, thiserror::Error)]
pub enum RateError {
    #[error("Exchange rate for {0}/{1} must be positive, got {2}")]
    NonPositive(String, String, Decimal),
    #[error("Identity rate {0}/{0} is computed, never stored")]
    IdentityPair(String),
}

/// In-memory cache of directional exchange rates, loaded from the store once
/// per invocation and passed by reference wherever amounts are converted.
/// Lookup fails open: an unconvertible pair resolves to the identity rate so
/// an amount is shown at face value rather than not at all.
#[derive(Debug, Default)]
pub struct RateTable {
    rates: HashMap<(String, String), Decimal>,
    last_updated: Option<DateTime<Utc>>,
}

impl RateTable {
    pub fn new(rows: Vec<ExchangeRate>) -> Self {
        let mut rates = HashMap::new();
        let mut last_updated: Option<DateTime<Utc>> = None;
        for r in rows {
            last_updated = Some(match last_updated {
                Some(t) if t >= r.updated_at => t,
                _ => r.updated_at,
            });
            rates.insert((r.base, r.quote), r.rate);
        }
        RateTable { rates, last_updated }
    }

    pub fn load(conn: &Connection) -> Result<Self> {
        let mut stmt = conn.prepare("SELECT base, quote, rate, updated_at FROM exchange_rates")?;
        let mut cur = stmt.query([])?;
        let mut rows = Vec::new();
        while let Some(r) = cur.next()? {
            let base: String = r.get(0)?;
            let quote: String = r.get(1)?;
            let rate_s: String = r.get(2)?;
            let updated_s: String = r.get(3)?;
            let rate = rate_s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid rate '{}' for {}/{}", rate_s, base, quote))?;
            let updated_at = DateTime::parse_from_rfc3339(&updated_s)
                .with_context(|| format!("Invalid timestamp '{}' for {}/{}", updated_s, base, quote))?
                .with_timezone(&Utc);
            rows.push(ExchangeRate {
                base,
                quote,
                rate,
                updated_at,
            });
        }
        Ok(RateTable::new(rows))
    }

    /// Directional rate if one is known: the stored pair first, then the
    /// static fallback table. None for identity and unknown pairs.
    fn rate_for(&self, from: &str, to: &str) -> Option<Decimal> {
        if from == to {
            return None;
        }
        if let Some(r) = self.rates.get(&(from.to_string(), to.to_string())) {
            return Some(*r);
        }
        fallback_rate(from, to)
    }

    /// Identity for same-currency and unknown pairs, otherwise the
    /// directional rate.
    pub fn get_rate(&self, from: &str, to: &str) -> Decimal {
        self.rate_for(from, to).unwrap_or(Decimal::ONE)
    }

    /// Rounding happens here, exactly once per conversion, never on
    /// intermediate sums. Identity paths return the amount untouched so
    /// same-currency conversion is drift-free.
    pub fn convert(&self, amount: Decimal, from: &str, to: &str) -> Decimal {
        match self.rate_for(from, to) {
            Some(rate) => (amount * rate).round_dp(2),
            None => amount,
        }
    }

    /// True when the newest stored rate is older than [`STALE_AFTER_HOURS`],
    /// or when nothing has ever been fetched.
    pub fn is_stale(&self) -> bool {
        match self.last_updated {
            Some(t) => Utc::now() - t > Duration::hours(STALE_AFTER_HOURS),
            None => true,
        }
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

fn validate(rate: &ExchangeRate) -> Result<(), RateError> {
    if rate.base == rate.quote {
        return Err(RateError::IdentityPair(rate.base.clone()));
    }
    if rate.rate <= Decimal::ZERO {
        return Err(RateError::NonPositive(
            rate.base.clone(),
            rate.quote.clone(),
            rate.rate,
        ));
    }
    Ok(())
}

pub fn upsert_rate(conn: &Connection, rate: &ExchangeRate) -> Result<()> {
    validate(rate)?;
    conn.execute(
        "INSERT INTO exchange_rates(base, quote, rate, updated_at) VALUES (?1,?2,?3,?4)
         ON CONFLICT(base, quote) DO UPDATE SET rate=excluded.rate, updated_at=excluded.updated_at",
        params![
            rate.base,
            rate.quote,
            rate.rate.to_string(),
            rate.updated_at.to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Replace the stored table wholesale: delete-then-insert in one SQLite
/// transaction, last writer wins. Callers reload their [`RateTable`] after.
pub fn replace_all(conn: &mut Connection, rows: &[ExchangeRate]) -> Result<()> {
    for r in rows {
        validate(r)?;
    }
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM exchange_rates", [])?;
    for r in rows {
        tx.execute(
            "INSERT INTO exchange_rates(base, quote, rate, updated_at) VALUES (?1,?2,?3,?4)",
            params![r.base, r.quote, r.rate.to_string(), r.updated_at.to_rfc3339()],
        )?;
    }
    tx.commit()?;
    Ok(())
}
