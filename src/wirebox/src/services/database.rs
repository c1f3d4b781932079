use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use snafu::prelude::*;

use crate::config::DatabaseSettings;
use crate::services::{Logger, NotFoundSnafu, ServiceError, ValidationSnafu};

/// A stored record: column name to value.
pub type Row = BTreeMap<String, String>;

/// Persistence behind the application services.
///
/// Every row has an `id` column assigned on insertion.
pub trait Database: Send + Sync {
    fn dsn(&self) -> &str;

    fn insert(&self, table: &str, row: Row) -> Result<u64, ServiceError>;

    fn find(&self, table: &str, id: u64) -> Option<Row>;

    fn find_by(&self, table: &str, column: &str, value: &str) -> Vec<Row>;

    /// Returns every row of `table` in insertion order.
    fn all(&self, table: &str) -> Vec<Row>;

    fn update(&self, table: &str, id: u64, changes: Row) -> Result<(), ServiceError>;

    fn delete(&self, table: &str, id: u64) -> bool;
}

/// A [`Database`] keeping its tables in memory.
pub struct MemoryDatabase {
    settings: DatabaseSettings,
    logger: Arc<dyn Logger>,
    tables: RwLock<HashMap<String, BTreeMap<u64, Row>>>,
    next_id: AtomicU64,
}

impl MemoryDatabase {
    pub fn new(settings: DatabaseSettings, logger: Arc<dyn Logger>) -> Self {
        logger.info("database opened", &[("dsn", &settings.dsn)]);
        Self {
            settings,
            logger,
            tables: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Database for MemoryDatabase {
    fn dsn(&self) -> &str {
        &self.settings.dsn
    }

    fn insert(&self, table: &str, mut row: Row) -> Result<u64, ServiceError> {
        ensure!(
            !table.is_empty(),
            ValidationSnafu {
                message: "table name must not be empty"
            }
        );
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        row.insert(String::from("id"), id.to_string());
        self.tables
            .write()
            .entry(table.to_owned())
            .or_default()
            .insert(id, row);
        Ok(id)
    }

    fn find(&self, table: &str, id: u64) -> Option<Row> {
        self.tables.read().get(table)?.get(&id).cloned()
    }

    fn find_by(&self, table: &str, column: &str, value: &str) -> Vec<Row> {
        self.tables
            .read()
            .get(table)
            .map(|rows| {
                rows.values()
                    .filter(|row| row.get(column).is_some_and(|v| v == value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn all(&self, table: &str) -> Vec<Row> {
        self.tables
            .read()
            .get(table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }

    fn update(&self, table: &str, id: u64, changes: Row) -> Result<(), ServiceError> {
        let mut tables = self.tables.write();
        let Some(row) = tables.get_mut(table).and_then(|rows| rows.get_mut(&id)) else {
            self.logger.warning(
                "update of a missing row",
                &[("table", table), ("id", &id.to_string())],
            );
            return NotFoundSnafu {
                entity: "row",
                id: format!("{table}#{id}"),
            }
            .fail();
        };
        row.extend(changes.into_iter().filter(|(column, _)| column != "id"));
        Ok(())
    }

    fn delete(&self, table: &str, id: u64) -> bool {
        self.tables
            .write()
            .get_mut(table)
            .is_some_and(|rows| rows.remove(&id).is_some())
    }
}
