// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use tallybook::config::{Config, Settings};
use tallybook::{cli, commands, db, utils};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "tallybook=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = Config::from_env()?;
    let mut conn = db::open_or_init(&config)?;
    let mut settings = Settings::load(&conn)?;

    let exporting = matches!(matches.subcommand(), Some(("export", _)));
    if !exporting && settings.backup_due(utils::today()) {
        eprintln!("{}", settings.backup_reminder());
        settings.mark_backup(&conn, utils::today())?;
    }

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", config.db_path.display());
        }
        Some(("category", sub)) => commands::categories::handle(&conn, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, sub)?,
        Some(("hint", sub)) => commands::hints::handle(&conn, sub)?,
        Some(("chart", sub)) => commands::chart::handle(&conn, sub)?,
        Some(("overview", sub)) => commands::overview::handle(&conn, sub, &settings)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub, &mut settings)?,
        Some(("import", sub)) => commands::importer::handle(&mut conn, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&conn, sub, &mut settings)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
