// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

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
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn type_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .value_parser(["expense", "income"])
        .help("Transaction type: expense|income")
}

fn transaction_fields(cmd: Command) -> Command {
    cmd.arg(type_arg().required(true))
        .arg(Arg::new("category").long("category").required(true))
        .arg(
            Arg::new("date")
                .long("date")
                .required(true)
                .help("YYYY-MM-DD"),
        )
        .arg(
            Arg::new("amount")
                .long("amount")
                .required(true)
                .allow_negative_numbers(true)
                .help("Stored as a non-negative amount"),
        )
        .arg(Arg::new("subcategory").long("sub"))
        .arg(Arg::new("note").long("note"))
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .version(crate_version!())
        .about("Local income/expense tracker with colored categories and bucketed charts")
        .subcommand(Command::new("init").about("Create the database and default categories"))
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(type_arg().required(true)),
                )
                .subcommand(json_flags(Command::new("list").arg(type_arg())))
                .subcommand(
                    Command::new("rename")
                        .arg(id_arg())
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(transaction_fields(Command::new("add")))
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .value_parser(value_parser!(i32)),
                        )
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .requires("year")
                                .value_parser(value_parser!(u32).range(1..=12)),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(transaction_fields(Command::new("edit").arg(id_arg())))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("hint")
                .about("Subcategory suggestions")
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("category").required(true))
                        .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("hide")
                        .arg(Arg::new("category").required(true))
                        .arg(Arg::new("subcategory").required(true)),
                ),
        )
        .subcommand(json_flags(
            Command::new("chart")
                .about("Income/expense per time bucket")
                .arg(
                    Arg::new("range")
                        .long("range")
                        .value_parser(["12d", "3m", "1y", "custom"])
                        .default_value("12d"),
                )
                .arg(Arg::new("from").long("from").help("Custom range start, YYYY-MM-DD"))
                .arg(Arg::new("to").long("to").help("Custom range end, YYYY-MM-DD")),
        ))
        .subcommand(
            Command::new("overview")
                .about("Year and month totals with category shares")
                .arg(
                    Arg::new("year")
                        .long("year")
                        .value_parser(value_parser!(i32)),
                )
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("backup")
                        .about("Full JSON backup of transactions and categories")
                        .arg(Arg::new("out").long("out")),
                )
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import data")
                .subcommand(
                    Command::new("backup")
                        .about("Merge a JSON backup into the store")
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("settings")
                .about("Preferences")
                .subcommand(
                    Command::new("show").arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("language").arg(
                        Arg::new("lang")
                            .required(true)
                            .value_parser(["en", "zh"]),
                    ),
                ),
        )
}
