// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, arg, value_parser};

fn json_flags() -> [Arg; 2] {
    [
        arg!(--json "Print JSON"),
        arg!(--jsonl "Print JSON lines"),
    ]
}

fn month_arg() -> Arg {
    arg!(--month <MONTH> "Month 1-12 (default: current month)")
        .required(false)
        .value_parser(value_parser!(u32).range(1..=12))
}

fn year_arg() -> Arg {
    arg!(--year <YEAR> "Year, 2000-9999 (default: current year)")
        .required(false)
        .value_parser(value_parser!(i32).range(2000..=9999))
}

fn id_arg() -> Arg {
    arg!(--id <ID>).required(true).value_parser(value_parser!(i64))
}

fn mock_flag() -> Arg {
    arg!(--mock "Use the built-in sample data instead of the database")
}

fn type_arg(values: &'static [&'static str]) -> Arg {
    Arg::new("type")
        .long("type")
        .value_name("TYPE")
        .value_parser(values.to_vec())
}

pub fn build_cli() -> Command {
    Command::new("pocketbook")
        .about("Personal finance: transactions, budgets, monthly statistics and reports")
        .version(clap::crate_version!())
        .arg(
            arg!(--db <PATH> "Database file (default: platform data dir)")
                .required(false)
                .env("POCKETBOOK_DB")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("More logging (-v info, -vv debug)"),
        )
        .subcommand(Command::new("init").about("Create the database and default categories"))
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(type_arg(&["income", "expense", "both"]).default_value("expense"))
                        .arg(arg!(--color <COLOR>).default_value("#3498db"))
                        .arg(arg!(--icon <ICON>).default_value("tag")),
                )
                .subcommand(Command::new("list").args(json_flags()))
                .subcommand(
                    Command::new("show")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--json "Print JSON")),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change a category; a rename carries its transactions and budgets along")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(
                            Arg::new("new-name")
                                .long("new-name")
                                .value_name("NAME")
                                .help("Rename the category"),
                        )
                        .arg(type_arg(&["income", "expense", "both"]))
                        .arg(arg!(--color <COLOR>).required(false))
                        .arg(arg!(--icon <ICON>).required(false)),
                )
                .subcommand(Command::new("rm").arg(arg!(--name <NAME>).required(true)))
                .subcommand(Command::new("seed").about("Add default categories if none exist")),
        )
        .subcommand(
            Command::new("tx")
                .about("Manage transactions")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--date <DATE> "YYYY-MM-DD (default: today)").required(false))
                        .arg(
                            arg!(--amount <AMOUNT>)
                                .required(true)
                                .allow_negative_numbers(true),
                        )
                        .arg(type_arg(&["income", "expense"]).required(true))
                        .arg(arg!(--category <CATEGORY>).default_value("Uncategorized"))
                        .arg(arg!(--description <TEXT>).required(true))
                        .arg(arg!(--note <NOTE>).required(false)),
                )
                .subcommand(
                    Command::new("list")
                        .arg(type_arg(&["income", "expense"]))
                        .arg(arg!(--category <CATEGORY>).required(false))
                        .arg(arg!(--from <DATE> "Earliest date, inclusive").required(false))
                        .arg(arg!(--to <DATE> "Latest date, inclusive").required(false))
                        .arg(
                            arg!(--page <PAGE>)
                                .value_parser(value_parser!(u32).range(1..))
                                .default_value("1"),
                        )
                        .arg(
                            arg!(--limit <LIMIT>)
                                .value_parser(value_parser!(u32).range(1..))
                                .default_value("10"),
                        )
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("show")
                        .arg(id_arg())
                        .arg(arg!(--json "Print JSON")),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change fields of a transaction; omitted fields keep their value")
                        .arg(id_arg())
                        .arg(arg!(--date <DATE> "YYYY-MM-DD").required(false))
                        .arg(
                            arg!(--amount <AMOUNT>)
                                .required(false)
                                .allow_negative_numbers(true),
                        )
                        .arg(type_arg(&["income", "expense"]))
                        .arg(arg!(--category <CATEGORY>).required(false))
                        .arg(arg!(--description <TEXT>).required(false))
                        .arg(arg!(--note <NOTE> "Empty to clear").required(false)),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly budgets per category")
                .subcommand(
                    Command::new("set")
                        .arg(arg!(--category <CATEGORY>).required(true))
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(month_arg())
                        .arg(year_arg()),
                )
                .subcommand(
                    Command::new("list")
                        .arg(month_arg())
                        .arg(year_arg())
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("show")
                        .arg(id_arg())
                        .arg(arg!(--json "Print JSON")),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change a budget; omitted fields keep their value")
                        .arg(id_arg())
                        .arg(arg!(--category <CATEGORY>).required(false))
                        .arg(arg!(--amount <AMOUNT>).required(false))
                        .arg(
                            arg!(--month <MONTH> "Month 1-12")
                                .required(false)
                                .value_parser(value_parser!(u32).range(1..=12)),
                        )
                        .arg(
                            arg!(--year <YEAR> "Year, 2000-9999")
                                .required(false)
                                .value_parser(value_parser!(i32).range(2000..=9999)),
                        ),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(
                    Command::new("status")
                        .about("Budget vs. actual for a month")
                        .arg(month_arg())
                        .arg(year_arg())
                        .arg(mock_flag())
                        .args(json_flags()),
                ),
        )
        .subcommand(
            Command::new("stats")
                .about("Income, expense and category statistics for a month")
                .arg(month_arg())
                .arg(year_arg())
                .arg(mock_flag())
                .arg(arg!(--json "Print JSON")),
        )
        .subcommand(
            Command::new("report")
                .about("Monthly trend, totals and insights over a range of months")
                .arg(arg!(--from <MONTH> "First month, YYYY-MM (default: 5 months back)").required(false))
                .arg(arg!(--to <MONTH> "Last month, YYYY-MM (default: current month)").required(false))
                .arg(mock_flag())
                .arg(arg!(--json "Print JSON")),
        )
        .subcommand(
            Command::new("import").subcommand(
                Command::new("transactions")
                    .about("Import date,description,amount,type,category,note CSV")
                    .arg(arg!(--path <PATH>).required(true)),
            ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(arg!(--format <FORMAT> "csv or json").default_value("csv"))
                    .arg(arg!(--out <PATH>).required(true)),
            ),
        )
        .subcommand(
            Command::new("config").subcommand(
                Command::new("currency")
                    .about("Show or set the display currency")
                    .arg(arg!([CODE] "ISO currency code, e.g. USD")),
            ),
        )
        .subcommand(Command::new("doctor").about("Find orphaned and malformed records"))
}
