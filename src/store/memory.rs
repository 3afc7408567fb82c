use super::local::{apply_query, insert_row, patch_row, remove_row};
use super::{Backend, Query, Table};
use crate::error::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory backend for tests. Clones share the same tables.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    tables: Arc<Mutex<HashMap<Table, Vec<Value>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts a row in place as-is, bypassing id assignment.
    pub fn seed(&self, table: Table, row: Value) {
        self.lock().entry(table).or_default().push(row);
    }

    /// Every row of a table regardless of owner.
    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.lock().get(&table).cloned().unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Table, Vec<Value>>> {
        // a poisoned lock only means another test panicked mid-write
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Backend for MemoryBackend {
    fn select(&self, table: Table, query: &Query) -> Result<Vec<Value>> {
        let tables = self.lock();
        Ok(tables.get(&table).map(|rows| apply_query(rows, query)).unwrap_or_default())
    }

    fn insert(&self, table: Table, row: Value) -> Result<Value> {
        insert_row(self.lock().entry(table).or_default(), table, row)
    }

    fn update(&self, table: Table, id: &str, patch: Value) -> Result<Value> {
        patch_row(self.lock().entry(table).or_default(), table, id, patch)
    }

    fn delete(&self, table: Table, id: &str) -> Result<()> {
        remove_row(self.lock().entry(table).or_default(), table, id)
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
