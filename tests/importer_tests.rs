// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use centavo::{cli, commands::importer};
use rusqlite::Connection;
use std::io::Write;
use tempfile::NamedTempFile;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE wallets(id INTEGER PRIMARY KEY, name TEXT, kind TEXT, currency TEXT);
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
        "#,
    )
    .unwrap();
    conn.execute(
        "INSERT INTO wallets(id,name,kind,currency) VALUES (1,'W1','bank','USD')",
        [],
    )
    .unwrap();
    conn
}

fn run_import(conn: &mut Connection, path: &str) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["centavo", "import", "transactions", "--path", path]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, import_m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn importer_trims_cli_path_argument() {
    let mut conn = base_conn();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,wallet,kind,amount,category,currency,note\n2025-02-03,W1,expense,5.00,Food,USD,"
    )
    .unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let padded = format!("  {}  ", path);
    run_import(&mut conn, &padded).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn importer_leaves_missing_currency_null() {
    let mut conn = base_conn();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,wallet,kind,amount,category,currency,note\n2025-02-03,W1,income,1500,,,paycheck"
    )
    .unwrap();
    file.flush().unwrap();

    run_import(&mut conn, file.path().to_str().unwrap()).unwrap();

    let (ccy, cat, note): (Option<String>, Option<String>, Option<String>) = conn
        .query_row(
            "SELECT currency, category, note FROM transactions ORDER BY id DESC LIMIT 1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    // NULL here; the row loader supplies the base currency on read
    assert_eq!(ccy, None);
    assert_eq!(cat, None);
    assert_eq!(note.as_deref(), Some("paycheck"));
}

#[test]
fn importer_rejects_negative_amounts_and_bad_kinds() {
    let mut conn = base_conn();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,wallet,kind,amount,category,currency,note\n2025-02-03,W1,expense,-5.00,Food,USD,"
    )
    .unwrap();
    file.flush().unwrap();
    assert!(run_import(&mut conn, file.path().to_str().unwrap()).is_err());

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,wallet,kind,amount,category,currency,note\n2025-02-03,W1,transfer,5.00,Food,USD,"
    )
    .unwrap();
    file.flush().unwrap();
    assert!(run_import(&mut conn, file.path().to_str().unwrap()).is_err());

    // failed imports roll back wholesale
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn importer_rejects_unknown_wallets_and_currencies() {
    let mut conn = base_conn();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,wallet,kind,amount,category,currency,note\n2025-02-03,Nope,expense,5.00,Food,USD,"
    )
    .unwrap();
    file.flush().unwrap();
    assert!(run_import(&mut conn, file.path().to_str().unwrap()).is_err());

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,wallet,kind,amount,category,currency,note\n2025-02-03,W1,expense,5.00,Food,XXX,"
    )
    .unwrap();
    file.flush().unwrap();
    assert!(run_import(&mut conn, file.path().to_str().unwrap()).is_err());
}
