use std::fs;
use std::path::PathBuf;

use crate::category::{
    Category, CategoryFilter, CategoryId, CategoryStatus, CategoryUpdate, NewCategory,
};
use crate::config::StorageConfig;

use super::error::StorageError;
use super::memory::CategoryTable;
use super::CategoryStore;

/// File-based category store.
///
/// Keeps the whole tree in one JSON document:
/// ```text
/// {data_dir}/
///   categories.json      # { "next_id": .., "categories": [..] }
/// ```
///
/// Every mutation reads the document, applies the change and rewrites it.
/// A missing file reads as an empty store.
pub struct FileStore {
    config: StorageConfig,
}

impl FileStore {
    /// Creates a new FileStore with default config.
    pub fn new() -> Self {
        Self::with_config(StorageConfig::default())
    }

    /// Creates a new FileStore with custom configuration.
    pub fn with_config(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Returns the path to the categories document.
    pub fn path(&self) -> PathBuf {
        self.config.categories_path()
    }

    fn load(&self) -> Result<CategoryTable, StorageError> {
        let path = self.path();
        if !path.exists() {
            return Ok(CategoryTable::new());
        }

        let json = fs::read_to_string(&path).map_err(|e| StorageError::io(&path, e))?;
        let table: CategoryTable = serde_json::from_str(&json)?;
        Ok(table)
    }

    fn save(&self, table: &CategoryTable) -> Result<(), StorageError> {
        self.ensure_data_dir()?;

        let path = self.path();
        let json = serde_json::to_string_pretty(table)?;
        fs::write(&path, json).map_err(|e| StorageError::io(&path, e))?;

        Ok(())
    }

    /// Ensures the data directory exists.
    fn ensure_data_dir(&self) -> Result<(), StorageError> {
        let dir = self.config.data_path();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;
        }
        Ok(())
    }

    fn modify<T>(
        &self,
        f: impl FnOnce(&mut CategoryTable) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let mut table = self.load()?;
        let out = f(&mut table)?;
        self.save(&table)?;
        Ok(out)
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryStore for FileStore {
    fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, StorageError> {
        Ok(self.load()?.get(id))
    }

    fn count_direct_children(&self, parent_id: CategoryId) -> Result<u64, StorageError> {
        Ok(self.load()?.count_children(parent_id))
    }

    fn insert(&self, category: NewCategory) -> Result<CategoryId, StorageError> {
        self.modify(|table| table.insert(category))
    }

    fn update_by_id(&self, id: CategoryId, update: CategoryUpdate) -> Result<(), StorageError> {
        self.modify(|table| table.update(id, update))
    }

    fn delete_by_id(&self, id: CategoryId) -> Result<(), StorageError> {
        self.modify(|table| table.remove(id))
    }

    fn list_by_status(&self, status: CategoryStatus) -> Result<Vec<Category>, StorageError> {
        let filter = CategoryFilter {
            status: Some(status),
            ..Default::default()
        };
        self.list(&filter)
    }

    fn find_by_ids(&self, ids: &[CategoryId]) -> Result<Vec<Category>, StorageError> {
        Ok(self.load()?.select_ids(ids))
    }

    fn list(&self, filter: &CategoryFilter) -> Result<Vec<Category>, StorageError> {
        Ok(self.load()?.select(filter))
    }
}
