//! Record-collection access.
//!
//! The journal only ever needs four generic operations against a named
//! collection: list with equality filters, insert, update by id and delete by
//! id. [`Backend`] captures exactly that over `serde_json::Value` rows so it
//! stays object safe; typing happens one layer up in [`crate::journal`].

mod file;
mod local;
mod memory;
pub(crate) mod rest;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use rest::RestBackend;

use crate::error::Result;
use serde_json::Value;
use std::fmt;

/// The collections the application reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    DiaryEntries,
    Tasks,
    Inspirations,
    Profiles,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::DiaryEntries => "diary_entries",
            Table::Tasks => "tasks",
            Table::Inspirations => "inspirations",
            Table::Profiles => "profiles",
        }
    }

    /// Whether the backend stamps `created_at` on insert.
    pub fn has_created_at(&self) -> bool {
        matches!(self, Table::DiaryEntries | Table::Inspirations)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Single ordering column.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

/// A list query: equality filters, optional ordering and limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<(String, Value)>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push((column.to_string(), value.into()));
        self
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order = Some(Order { column: column.to_string(), descending: false });
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(Order { column: column.to_string(), descending: true });
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}

/// Generic record-collection operations.
pub trait Backend {
    /// Lists rows matching `query`.
    fn select(&self, table: Table, query: &Query) -> Result<Vec<Value>>;

    /// Inserts a row and returns it as stored, including `id`.
    fn insert(&self, table: Table, row: Value) -> Result<Value>;

    /// Merges `patch` into the row with the given id and returns the result.
    fn update(&self, table: Table, id: &str, patch: Value) -> Result<Value>;

    fn delete(&self, table: Table, id: &str) -> Result<()>;

    /// Short name used in log lines.
    fn describe(&self) -> String;
}
