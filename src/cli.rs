// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{command, value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON document per line"),
    )
}

fn year_arg() -> Arg {
    Arg::new("year")
        .long("year")
        .help("Calendar year (defaults to the configured current year)")
}

fn kind_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_parser(["income", "expense"])
        .help(help)
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and inspect transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a transaction")
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD (defaults to today)"))
                .arg(kind_arg("type", "income or expense").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("description").long("description").required(true)),
        )
        .subcommand(
            Command::new("edit")
                .about("Replace fields of an existing transaction")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                .arg(Arg::new("date").long("date"))
                .arg(kind_arg("type", "income or expense"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("description").long("description")),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List transactions of a year")
                .arg(year_arg())
                .arg(kind_arg("type", "Only this type"))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
}

fn recurring_cmd() -> Command {
    Command::new("recurring")
        .about("Manage recurring transaction templates")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Define a recurring transaction")
                .arg(Arg::new("name").long("name").required(true))
                .arg(kind_arg("type", "income or expense").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(
                    Arg::new("frequency")
                        .long("frequency")
                        .default_value("monthly")
                        .help("weekly, bi-weekly, monthly, quarterly or yearly"),
                )
                .arg(Arg::new("start").long("start").help("YYYY-MM-DD"))
                .arg(Arg::new("description").long("description"))
                .arg(
                    Arg::new("inactive")
                        .long("inactive")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("edit")
                .about("Replace fields of a recurring definition")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("frequency").long("frequency"))
                .arg(Arg::new("description").long("description")),
        )
        .subcommand(
            Command::new("toggle")
                .about("Pause or resume a definition")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a definition")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
        )
        .subcommand(
            Command::new("generate")
                .about("Create this month's transactions from active definitions")
                .arg(Arg::new("date").long("date").help("Any day of the target month")),
        )
        .subcommand(json_flags(Command::new("list").about("List definitions")))
        .subcommand(json_flags(
            Command::new("summary").about("Monthly recurring income, expenses and net"),
        ))
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Manage income and expense categories")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(kind_arg("kind", "Category list").required(true))
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("budget").long("budget").default_value("0")),
        )
        .subcommand(
            Command::new("budget")
                .about("Set the budgeted amount")
                .arg(kind_arg("kind", "Category list").required(true))
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("amount").long("amount").required(true)),
        )
        .subcommand(
            Command::new("rm")
                .arg(kind_arg("kind", "Category list").required(true))
                .arg(Arg::new("name").long("name").required(true)),
        )
        .subcommand(json_flags(
            Command::new("list").arg(kind_arg("kind", "Only this list")),
        ))
        .subcommand(json_flags(
            Command::new("presets")
                .about("Suggested categories not yet added")
                .arg(kind_arg("kind", "Only this list")),
        ))
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Insights, budgets, trends and projections")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("insights")
                .about("Yearly totals and savings rate")
                .arg(year_arg()),
        ))
        .subcommand(json_flags(
            Command::new("breakdown")
                .about("Expenses by category")
                .arg(year_arg()),
        ))
        .subcommand(json_flags(
            Command::new("budget")
                .about("Budget variance per expense category")
                .arg(year_arg()),
        ))
        .subcommand(json_flags(
            Command::new("trend").about("Month-over-month change of the two latest months"),
        ))
        .subcommand(json_flags(
            Command::new("project")
                .about("Project future balance")
                .arg(year_arg())
                .arg(
                    Arg::new("horizons")
                        .long("horizons")
                        .help("Comma separated month counts (default 3,6,12,24,60,120)"),
                ),
        ))
        .subcommand(json_flags(
            Command::new("charts")
                .about("Chart series")
                .arg(year_arg())
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .value_parser(["monthly", "projection", "shares"])
                        .default_value("monthly"),
                ),
        ))
        .subcommand(json_flags(
            Command::new("analyze")
                .about("Full analysis with insights, recommendations and alerts")
                .arg(year_arg()),
        ))
}

pub fn build_cli() -> Command {
    command!()
        .name("cashflow")
        .about("Personal cash-flow tracking, budgets and projections")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("CASHFLOW_DB")
                .help("Path of the SQLite store (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging (RUST_LOG takes precedence)"),
        )
        .subcommand(Command::new("init").about("Create the store"))
        .subcommand(tx_cmd())
        .subcommand(recurring_cmd())
        .subcommand(category_cmd())
        .subcommand(report_cmd())
        .subcommand(
            Command::new("export")
                .about("Write a backup")
                .subcommand_required(true)
                .subcommand(
                    Command::new("json")
                        .about("Complete backup")
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("csv")
                        .about("Transactions only")
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Restore a backup or append transactions")
                .subcommand_required(true)
                .subcommand(
                    Command::new("json").arg(Arg::new("path").long("path").required(true)),
                )
                .subcommand(
                    Command::new("csv").arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand_required(true)
                .subcommand(json_flags(Command::new("show")))
                .subcommand(Command::new("year").arg(Arg::new("year").required(true)))
                .subcommand(
                    Command::new("theme").arg(
                        Arg::new("theme")
                            .required(true)
                            .value_parser(["light", "dark", "toggle"]),
                    ),
                )
                .subcommand(
                    Command::new("fixed")
                        .about("Legacy fixed monthly income/expenses")
                        .arg(Arg::new("income").long("income"))
                        .arg(Arg::new("expenses").long("expenses")),
                ),
        )
        .subcommand(
            Command::new("reset").about("Delete all data").arg(
                Arg::new("yes")
                    .long("yes")
                    .action(ArgAction::SetTrue)
                    .help("Confirm"),
            ),
        )
}
