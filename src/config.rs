// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, NaiveDate};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Tallybook", "tallybook"));

pub const DB_ENV: &str = "TALLYBOOK_DB";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let db_path = match std::env::var(DB_ENV) {
            Ok(p) if !p.trim().is_empty() => PathBuf::from(p.trim()),
            _ => default_db_path()?,
        };
        Ok(Self { db_path })
    }
}

fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("tallybook.sqlite"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Zh,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "zh" => Ok(Language::Zh),
            other => Err(anyhow!("Unsupported language '{}' (use en|zh)", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Settings {
    pub language: Language,
    /// `YYYY-M` of the month the last backup reminder was handled.
    pub last_backup_month: Option<String>,
}

impl Settings {
    pub fn load(conn: &Connection) -> Result<Self> {
        // Unknown stored values fall back to the default language.
        let language = get_setting(conn, "language")?
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        let last_backup_month = get_setting(conn, "last_backup_month")?;
        Ok(Self {
            language,
            last_backup_month,
        })
    }

    pub fn set_language(&mut self, conn: &Connection, language: Language) -> Result<()> {
        set_setting(conn, "language", language.as_str())?;
        self.language = language;
        Ok(())
    }

    pub fn mark_backup(&mut self, conn: &Connection, today: NaiveDate) -> Result<()> {
        let month = backup_month(today);
        set_setting(conn, "last_backup_month", &month)?;
        self.last_backup_month = Some(month);
        Ok(())
    }

    pub fn backup_due(&self, today: NaiveDate) -> bool {
        self.last_backup_month.as_deref() != Some(backup_month(today).as_str())
    }

    pub fn backup_reminder(&self) -> &'static str {
        match self.language {
            Language::En => {
                "Monthly backup reminder: it is recommended to back up your data \
                 (tallybook export backup)."
            }
            Language::Zh => "每月备份提醒：建议备份你的数据（tallybook export backup）。",
        }
    }
}

pub fn backup_month(today: NaiveDate) -> String {
    format!("{}-{}", today.year(), today.month())
}

fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}
