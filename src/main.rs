// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cashflow::alerts::AlertQueue;
use cashflow::{cli, commands, db};

fn init_logging(verbose: bool) {
    // RUST_LOG > --verbose > warn
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    init_logging(matches.get_flag("verbose"));

    let db_override = matches.get_one::<String>("db").map(PathBuf::from);
    let conn = db::open_or_init(db_override.as_deref())?;
    let mut alerts = AlertQueue::new();

    match matches.subcommand() {
        Some(("init", _)) => {
            let path = match db_override {
                Some(p) => p,
                None => db::db_path()?,
            };
            println!("Store initialized at {}", path.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&conn, sub, &mut alerts)?,
        Some(("recurring", sub)) => commands::recurring::handle(&conn, sub, &mut alerts)?,
        Some(("category", sub)) => commands::categories::handle(&conn, sub, &mut alerts)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub, &mut alerts)?,
        Some(("import", sub)) => commands::importer::handle(&conn, sub, &mut alerts)?,
        Some(("config", sub)) => commands::config::handle(&conn, sub, &mut alerts)?,
        Some(("reset", sub)) => commands::config::reset(&conn, sub, &mut alerts)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }

    for alert in alerts.active(Utc::now()) {
        eprintln!("[{}] {}", alert.level, alert.message);
    }
    Ok(())
}
