// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use centavo::goals::{self, GoalStatus};
use centavo::ledger::{self, Period};
use centavo::models::ExchangeRate;
use centavo::rates::RateTable;
use chrono::Utc;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn classification_breakpoints_are_inclusive_where_specified() {
    // exactly 50% is still excellent
    assert_eq!(goals::evaluate(dec("50"), dec("100")), GoalStatus::Excellent);
    // exactly 80% is still good
    assert_eq!(goals::evaluate(dec("80"), dec("100")), GoalStatus::Good);
    assert_eq!(goals::evaluate(dec("80.01"), dec("100")), GoalStatus::Warning);
    assert_eq!(goals::evaluate(dec("99.99"), dec("100")), GoalStatus::Warning);
    // exactly the limit is over
    assert_eq!(goals::evaluate(dec("100"), dec("100")), GoalStatus::Critical);
    assert_eq!(goals::evaluate(dec("150"), dec("100")), GoalStatus::Critical);
    assert_eq!(goals::evaluate(Decimal::ZERO, dec("100")), GoalStatus::Excellent);
}

#[test]
fn non_positive_limit_is_over_once_anything_is_spent() {
    assert_eq!(goals::evaluate(dec("0.01"), Decimal::ZERO), GoalStatus::Critical);
    assert_eq!(goals::evaluate(Decimal::ZERO, Decimal::ZERO), GoalStatus::Excellent);
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE transactions(
            id INTEGER PRIMARY KEY,
            date TEXT NOT NULL,
            wallet_id INTEGER NOT NULL,
            amount TEXT NOT NULL,
            kind TEXT NOT NULL,
            category TEXT,
            currency TEXT,
            note TEXT
        );
        CREATE TABLE goals(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            month TEXT NOT NULL,
            category TEXT NOT NULL,
            limit_amount TEXT NOT NULL,
            UNIQUE(month, category)
        );
        "#,
    )
    .unwrap();
    conn
}

#[test]
fn goal_spend_is_converted_from_foreign_currency() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO transactions(date,wallet_id,amount,kind,category,currency,note)
            VALUES ('2025-08-10',1,'9','expense','Dining','EUR',NULL);
        INSERT INTO transactions(date,wallet_id,amount,kind,category,currency,note)
            VALUES ('2025-08-11',1,'10','expense','Groceries','BRL',NULL);
        INSERT INTO transactions(date,wallet_id,amount,kind,category,currency,note)
            VALUES ('2025-07-20',1,'500','expense','Dining','BRL',NULL);
        "#,
    )
    .unwrap();

    let table = RateTable::new(vec![ExchangeRate {
        base: "EUR".into(),
        quote: "BRL".into(),
        rate: dec("6.0"),
        updated_at: Utc::now(),
    }]);
    let txs = ledger::load_transactions(&conn).unwrap();
    let period = Period::month(2025, 8).unwrap();

    // 9 EUR * 6.0 = 54 BRL; other category and prior month excluded
    let spent = goals::spent_for(&txs, "Dining", &period, &table, "BRL");
    assert_eq!(spent, dec("54.00"));
    assert_eq!(goals::evaluate(spent, dec("100")), GoalStatus::Good);
}

#[test]
fn income_never_counts_toward_a_goal() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO transactions(date,wallet_id,amount,kind,category,currency,note)
            VALUES ('2025-08-10',1,'30','expense','Dining','BRL',NULL);
        INSERT INTO transactions(date,wallet_id,amount,kind,category,currency,note)
            VALUES ('2025-08-11',1,'1000','income','Dining','BRL',NULL);
        "#,
    )
    .unwrap();
    let txs = ledger::load_transactions(&conn).unwrap();
    let period = Period::month(2025, 8).unwrap();
    let spent = goals::spent_for(&txs, "Dining", &period, &RateTable::new(vec![]), "BRL");
    assert_eq!(spent, dec("30"));
}

#[test]
fn load_goals_filters_by_month() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO goals(month,category,limit_amount) VALUES ('2025-08','Dining','100');
        INSERT INTO goals(month,category,limit_amount) VALUES ('2025-07','Dining','80');
        "#,
    )
    .unwrap();
    let all = goals::load_goals(&conn, None).unwrap();
    assert_eq!(all.len(), 2);
    let aug = goals::load_goals(&conn, Some("2025-08")).unwrap();
    assert_eq!(aug.len(), 1);
    assert_eq!(aug[0].limit, dec("100"));
}
