// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Language, Settings};
use crate::utils::{maybe_print_json, pretty_table, required};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, settings: &mut Settings) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            if !maybe_print_json(sub.get_flag("json"), false, &*settings)? {
                let rows = vec![
                    vec!["language".to_string(), settings.language.to_string()],
                    vec![
                        "last_backup_month".to_string(),
                        settings.last_backup_month.clone().unwrap_or_default(),
                    ],
                ];
                println!("{}", pretty_table(&["Key", "Value"], rows));
            }
        }
        Some(("language", sub)) => {
            let lang: Language = required(sub, "lang")?.parse()?;
            settings.set_language(conn, lang)?;
            println!("Language set to {}", lang);
        }
        _ => {}
    }
    Ok(())
}
