// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON Lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("centavo")
        .about("Multi-currency personal ledger, spending reports, and category goals")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the local database"))
        .subcommand(
            Command::new("wallet")
                .about("Manage wallets")
                .subcommand(
                    Command::new("add")
                        .about("Add a wallet")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .default_value("cash")
                                .help("Wallet kind, e.g. cash, bank, card"),
                        )
                        .arg(Arg::new("currency").long("currency").required(true)),
                )
                .subcommand(Command::new("list").about("List wallets"))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a wallet")
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("wallet").long("wallet").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Non-negative amount; direction comes from --kind"),
                        )
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .value_parser(["income", "expense"]),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("currency")
                                .long("currency")
                                .help("Defaults to the wallet currency"),
                        )
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions")
                        .arg(Arg::new("month").long("month").help("Filter by YYYY-MM"))
                        .arg(Arg::new("wallet").long("wallet"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("fx")
                .about("Exchange rates and the display currency")
                .subcommand(
                    Command::new("set-display")
                        .about("Set the display currency (BRL, USD or EUR)")
                        .arg(Arg::new("currency").required(true)),
                )
                .subcommand(
                    Command::new("status").about("Show display currency and rate freshness"),
                )
                .subcommand(
                    Command::new("fetch")
                        .about("Refresh the rate table from Frankfurter (ECB), replacing it"),
                )
                .subcommand(Command::new("list").about("List stored rates"))
                .subcommand(
                    Command::new("convert")
                        .about("Convert an amount between currencies")
                        .arg(Arg::new("amount").required(true))
                        .arg(Arg::new("from").required(true))
                        .arg(Arg::new("to").required(true)),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Spending reports in the display currency")
                .subcommand(json_flags(
                    Command::new("summary")
                        .about("Income, expenses and net for a month")
                        .arg(Arg::new("month").long("month").required(true))
                        .arg(
                            Arg::new("compare")
                                .long("compare")
                                .action(ArgAction::SetTrue)
                                .help("Include %-deltas against the previous month"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("cashflow")
                        .about("Per-month income/expense series")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(usize))
                                .default_value("12"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("categories")
                        .about("Expense breakdown by category for a month")
                        .arg(Arg::new("month").long("month").required(true)),
                )),
        )
        .subcommand(
            Command::new("goal")
                .about("Monthly category goals")
                .subcommand(
                    Command::new("set")
                        .about("Set a category goal (limit in the display currency)")
                        .arg(Arg::new("month").long("month").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("limit").long("limit").required(true)),
                )
                .subcommand(
                    Command::new("list")
                        .about("List goals")
                        .arg(Arg::new("month").long("month")),
                )
                .subcommand(json_flags(
                    Command::new("report")
                        .about("Goal status for a month")
                        .arg(Arg::new("month").long("month").required(true)),
                )),
        )
        .subcommand(
            Command::new("import").about("Import data").subcommand(
                Command::new("transactions")
                    .about("Import transactions from CSV")
                    .arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .about("Export transactions")
                    .arg(Arg::new("format").long("format").required(true))
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Check ledger data health"))
}
