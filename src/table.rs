//! Table Module
//!
//! Binds a table name to the statements run against it. The name is fixed
//! for the lifetime of a cache, so the statement text is formatted once here.

use crate::error::{CacheError, Result};

// == Table ==
/// A validated table name and its precomputed statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    create: String,
    fetch: String,
    insert: String,
    update: String,
    delete: String,
}

impl Table {
    /// Formats the statements for `name`.
    ///
    /// Fails with [`CacheError::Config`] if the name is empty or whitespace.
    pub fn new(name: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(CacheError::Config(
                "tableName must not be empty".to_string(),
            ));
        }

        Ok(Self {
            name: name.to_string(),
            create: format!(
                "CREATE TABLE IF NOT EXISTS {name} (\
                 key VARCHAR(400) NOT NULL PRIMARY KEY, \
                 data BLOB NOT NULL)"
            ),
            fetch: format!("SELECT data FROM {name} WHERE key = $1"),
            insert: format!("INSERT INTO {name} (key, data) VALUES ($1, $2)"),
            update: format!("UPDATE {name} SET data = $2 WHERE key = $1"),
            delete: format!("DELETE FROM {name} WHERE key = $1"),
        })
    }

    /// Returns the table name as given.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Idempotent schema bootstrap.
    pub fn create_statement(&self) -> &str {
        &self.create
    }

    /// Binds `$1 = key`; yields the `data` column.
    pub fn fetch_statement(&self) -> &str {
        &self.fetch
    }

    /// Binds `$1 = key`, `$2 = data`.
    pub fn insert_statement(&self) -> &str {
        &self.insert
    }

    /// Binds `$1 = key`, `$2 = data`.
    pub fn update_statement(&self) -> &str {
        &self.update
    }

    /// Binds `$1 = key`.
    pub fn delete_statement(&self) -> &str {
        &self.delete
    }
}
