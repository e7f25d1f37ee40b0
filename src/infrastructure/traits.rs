//! I/O boundary traits for testability
//!
//! The spend table reaches the application through [`TableSource`], so
//! services can be tested against in-memory tables.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::SpendRow;

/// Source of the flat spend table.
pub trait TableSource: Send + Sync {
    /// Fetch the complete table. Every call returns a fresh snapshot.
    fn fetch_rows(&self) -> io::Result<Vec<SpendRow>>;

    /// Human readable origin, used in messages.
    fn describe(&self) -> String;
}

/// Path that makes [`JsonFileSource`] read stdin.
pub const STDIN_PATH: &str = "-";

/// JSON array of rows stored in a file (or stdin for `-`).
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSource for JsonFileSource {
    fn fetch_rows(&self) -> io::Result<Vec<SpendRow>> {
        let content = if self.path == Path::new(STDIN_PATH) {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            fs::read_to_string(&self.path)?
        };
        debug!(
            "fetch_rows: read {} bytes from {}",
            content.len(),
            self.describe()
        );
        parse_table(&content)
    }

    fn describe(&self) -> String {
        if self.path == Path::new(STDIN_PATH) {
            "<stdin>".to_string()
        } else {
            self.path.display().to_string()
        }
    }
}

/// Parse a JSON table. A top-level value that is not an array is an empty table.
pub fn parse_table(content: &str) -> io::Result<Vec<SpendRow>> {
    let value: Value = serde_json::from_str(content)?;
    if !value.is_array() {
        warn!("table is not a JSON array, treating it as empty");
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(value)?)
}

/// Table held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    rows: Vec<SpendRow>,
}

impl StaticSource {
    pub fn new(rows: Vec<SpendRow>) -> Self {
        Self { rows }
    }
}

impl TableSource for StaticSource {
    fn fetch_rows(&self) -> io::Result<Vec<SpendRow>> {
        Ok(self.rows.clone())
    }

    fn describe(&self) -> String {
        format!("<memory: {} rows>", self.rows.len())
    }
}
