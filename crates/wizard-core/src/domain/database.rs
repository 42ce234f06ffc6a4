//! Migration and seed file naming.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseFileKind {
    Migration,
    Seed,
}

impl DatabaseFileKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Migration => "migration",
            Self::Seed => "seed",
        }
    }
}

/// Where a kind of database file lives and which stub seeds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseFileSettings {
    pub directory: String,
    pub stub: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub extension: String,
    pub migrations: DatabaseFileSettings,
    pub seeds: DatabaseFileSettings,
}

impl DatabaseSettings {
    pub fn files(&self, kind: DatabaseFileKind) -> &DatabaseFileSettings {
        match kind {
            DatabaseFileKind::Migration => &self.migrations,
            DatabaseFileKind::Seed => &self.seeds,
        }
    }
}

/// Name for a new database file.
///
/// `name` is lower-cased and each run of whitespace becomes `_`. Migrations
/// are prefixed with the UTC timestamp `YYYYMMDDHHMMSS`.
pub fn database_file_name(
    kind: DatabaseFileKind,
    name: &str,
    extension: &str,
    now: DateTime<Utc>,
) -> String {
    let slug = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();

    match kind {
        DatabaseFileKind::Migration => {
            format!("{}_{slug}.{extension}", now.format("%Y%m%d%H%M%S"))
        }
        DatabaseFileKind::Seed => format!("{slug}.{extension}"),
    }
}
