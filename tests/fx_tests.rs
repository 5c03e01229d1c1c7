// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use centavo::models::ExchangeRate;
use centavo::rates::{self, RateTable};
use chrono::{Duration, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn rate(base: &str, quote: &str, rate: &str, age_hours: i64) -> ExchangeRate {
    ExchangeRate {
        base: base.into(),
        quote: quote.into(),
        rate: rate.parse().unwrap(),
        updated_at: Utc::now() - Duration::hours(age_hours),
    }
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE exchange_rates(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            base TEXT NOT NULL,
            quote TEXT NOT NULL,
            rate TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(base, quote)
        );
        "#,
    )
    .unwrap();
    conn
}

#[test]
fn identity_conversion_is_exact() {
    let table = RateTable::new(vec![rate("USD", "BRL", "5.0", 0)]);
    let amt: Decimal = "10.555".parse().unwrap();
    // no rounding drift on same-currency conversion, even past 2dp
    assert_eq!(table.convert(amt, "BRL", "BRL"), amt);
    assert_eq!(table.get_rate("BRL", "BRL"), Decimal::ONE);
}

#[test]
fn unknown_pair_falls_back_to_identity() {
    let table = RateTable::new(vec![]);
    let amt: Decimal = "42.125".parse().unwrap();
    // GBP/JPY is in neither the store nor the static fallback table
    assert_eq!(table.convert(amt, "GBP", "JPY"), amt);
    assert_eq!(table.get_rate("GBP", "JPY"), Decimal::ONE);
}

#[test]
fn direct_rate_rounds_once_at_conversion() {
    let table = RateTable::new(vec![rate("USD", "BRL", "5.0", 0)]);
    let res = table.convert("10.55".parse().unwrap(), "USD", "BRL");
    assert_eq!(res, "52.75".parse::<Decimal>().unwrap());

    // 10.333 * 3 = 30.999 -> 31.00 at the point of conversion
    let table = RateTable::new(vec![rate("USD", "BRL", "3", 0)]);
    let res = table.convert("10.333".parse().unwrap(), "USD", "BRL");
    assert_eq!(res, "31.00".parse::<Decimal>().unwrap());
}

#[test]
fn rates_are_directional_not_reciprocal() {
    // only USD->BRL is stored; BRL->USD must not be derived as 1/rate,
    // it resolves through the static fallback instead
    let table = RateTable::new(vec![rate("USD", "BRL", "5.0", 0)]);
    let back = table.get_rate("BRL", "USD");
    assert_ne!(back, Decimal::ONE / "5.0".parse::<Decimal>().unwrap());
}

#[test]
fn static_fallback_used_when_store_is_empty() {
    let table = RateTable::new(vec![]);
    // supported pairs always convert, even before any fetch
    let r = table.get_rate("USD", "BRL");
    assert_ne!(r, Decimal::ONE);
    assert!(r > Decimal::ONE);
    let res = table.convert("100".parse().unwrap(), "USD", "BRL");
    assert_eq!(res, ("100".parse::<Decimal>().unwrap() * r).round_dp(2));
}

#[test]
fn stored_rate_wins_over_fallback() {
    let table = RateTable::new(vec![rate("USD", "BRL", "4.0", 0)]);
    assert_eq!(table.get_rate("USD", "BRL"), "4.0".parse().unwrap());
}

#[test]
fn staleness_is_advisory_and_age_based() {
    let fresh = RateTable::new(vec![rate("USD", "BRL", "5.0", 1)]);
    assert!(!fresh.is_stale());

    let old = RateTable::new(vec![rate("USD", "BRL", "5.0", 72)]);
    assert!(old.is_stale());
    // stale rates still convert
    assert_eq!(
        old.convert("10".parse().unwrap(), "USD", "BRL"),
        "50.00".parse::<Decimal>().unwrap()
    );

    let empty = RateTable::new(vec![]);
    assert!(empty.is_stale());
}

#[test]
fn newest_row_drives_staleness() {
    let table = RateTable::new(vec![
        rate("USD", "BRL", "5.0", 100),
        rate("EUR", "BRL", "6.0", 2),
    ]);
    assert!(!table.is_stale());
}

#[test]
fn store_roundtrip_and_wholesale_replace() {
    let mut conn = setup();
    rates::upsert_rate(&conn, &rate("USD", "BRL", "5.1", 0)).unwrap();
    rates::upsert_rate(&conn, &rate("USD", "BRL", "5.2", 0)).unwrap(); // upsert, same pair
    rates::upsert_rate(&conn, &rate("EUR", "BRL", "6.1", 0)).unwrap();

    let table = RateTable::load(&conn).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.get_rate("USD", "BRL"), "5.2".parse().unwrap());

    // replace wholesale: the EUR row must not survive
    rates::replace_all(&mut conn, &[rate("USD", "BRL", "5.5", 0)]).unwrap();
    let table = RateTable::load(&conn).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get_rate("USD", "BRL"), "5.5".parse().unwrap());
}

#[test]
fn invalid_rates_are_rejected_at_ingestion() {
    let conn = setup();
    assert!(rates::upsert_rate(&conn, &rate("USD", "BRL", "0", 0)).is_err());
    assert!(rates::upsert_rate(&conn, &rate("USD", "BRL", "-1.5", 0)).is_err());
    assert!(rates::upsert_rate(&conn, &rate("USD", "USD", "1", 0)).is_err());
}
