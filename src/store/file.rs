use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::PathBuf;
use serde_json::Value;
use super::local::{apply_query, insert_row, patch_row, remove_row};
use super::{Backend, Query, Table};
use crate::error::Result;

/// Offline backend keeping each collection as a JSON array on disk.
///
/// Layout inside the data directory:
/// * `diary_entries.json`
/// * `tasks.json`
/// * `inspirations.json`
/// * `profiles.json`
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Uses `dir` as the data directory, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    fn table_path(&self, table: Table) -> PathBuf {
        self.dir.join(format!("{}.json", table.name()))
    }

    /// Loads every row of a table.
    ///
    /// Returns an empty vector if the file does not exist yet.
    fn load(&self, table: Table) -> Result<Vec<Value>> {
        let path = self.table_path(table);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut f = OpenOptions::new().read(true).open(&path)?;
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        if s.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&s)?)
    }

    /// Overwrites the table file with `rows`.
    fn save(&self, table: Table, rows: &[Value]) -> Result<()> {
        let s = serde_json::to_string_pretty(rows)?;
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.table_path(table))?;
        f.write_all(s.as_bytes())?;
        Ok(())
    }
}

impl Backend for FileBackend {
    fn select(&self, table: Table, query: &Query) -> Result<Vec<Value>> {
        let rows = self.load(table)?;
        Ok(apply_query(&rows, query))
    }

    fn insert(&self, table: Table, row: Value) -> Result<Value> {
        let mut rows = self.load(table)?;
        let stored = insert_row(&mut rows, table, row)?;
        self.save(table, &rows)?;
        Ok(stored)
    }

    fn update(&self, table: Table, id: &str, patch: Value) -> Result<Value> {
        let mut rows = self.load(table)?;
        let updated = patch_row(&mut rows, table, id, patch)?;
        self.save(table, &rows)?;
        Ok(updated)
    }

    fn delete(&self, table: Table, id: &str) -> Result<()> {
        let mut rows = self.load(table)?;
        remove_row(&mut rows, table, id)?;
        self.save(table, &rows)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.dir.display())
    }
}
