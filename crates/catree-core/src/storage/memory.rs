use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::category::{
    sort_categories, Category, CategoryFilter, CategoryId, CategoryStatus, CategoryUpdate,
    NewCategory,
};

use super::error::StorageError;
use super::CategoryStore;

/// Rows plus the id counter. Shared by the in-memory and file backends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "TableDocument", into = "TableDocument")]
pub(crate) struct CategoryTable {
    next_id: u64,
    rows: BTreeMap<CategoryId, Category>,
}

/// On-disk shape of a [`CategoryTable`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TableDocument {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    categories: Vec<Category>,
}

impl TryFrom<TableDocument> for CategoryTable {
    type Error = StorageError;

    fn try_from(doc: TableDocument) -> Result<Self, Self::Error> {
        let mut table = CategoryTable::new();
        for category in doc.categories {
            table.put(category)?;
        }
        table.next_id = table.next_id.max(doc.next_id);
        Ok(table)
    }
}

impl From<CategoryTable> for TableDocument {
    fn from(table: CategoryTable) -> Self {
        Self {
            next_id: table.next_id,
            categories: table.rows.into_values().collect(),
        }
    }
}

impl CategoryTable {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }

    pub(crate) fn get(&self, id: CategoryId) -> Option<Category> {
        self.rows.get(&id).cloned()
    }

    pub(crate) fn count_children(&self, parent_id: CategoryId) -> u64 {
        self.rows
            .values()
            .filter(|c| c.parent_id == parent_id)
            .count() as u64
    }

    pub(crate) fn insert(&mut self, category: NewCategory) -> Result<CategoryId, StorageError> {
        let id = CategoryId(self.next_id.max(1));
        if self.rows.contains_key(&id) {
            return Err(StorageError::IdsExhausted);
        }
        self.next_id = id.0.saturating_add(1);

        let now = Utc::now();
        self.rows.insert(
            id,
            Category {
                id,
                parent_id: category.parent_id,
                status: category.status,
                attrs: category.attrs,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    /// Stores a row under its own id, keeping `next_id` past it.
    pub(crate) fn put(&mut self, category: Category) -> Result<(), StorageError> {
        if category.id.is_no_parent() {
            return Err(StorageError::InvalidId(category.id));
        }
        // Ids are never reused, even if next_id in a document was edited by hand.
        self.next_id = self.next_id.max(category.id.0.saturating_add(1));
        self.rows.insert(category.id, category);
        Ok(())
    }

    pub(crate) fn update(
        &mut self,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<(), StorageError> {
        let row = self.rows.get_mut(&id).ok_or(StorageError::NotFound(id))?;
        row.parent_id = update.parent_id;
        row.status = update.status;
        row.attrs = update.attrs;
        row.updated_at = Utc::now();
        Ok(())
    }

    pub(crate) fn remove(&mut self, id: CategoryId) -> Result<(), StorageError> {
        self.rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound(id))
    }

    pub(crate) fn select(&self, filter: &CategoryFilter) -> Vec<Category> {
        let mut rows: Vec<Category> = self
            .rows
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        sort_categories(&mut rows);
        rows
    }

    pub(crate) fn select_ids(&self, ids: &[CategoryId]) -> Vec<Category> {
        let mut rows: Vec<Category> = ids.iter().filter_map(|id| self.get(*id)).collect();
        rows.sort_by_key(|c| c.id);
        rows.dedup_by_key(|c| c.id);
        sort_categories(&mut rows);
        rows
    }
}

/// In-memory category store.
///
/// Thread-safe through an internal `RwLock`; contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: RwLock<CategoryTable>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(CategoryTable::new()),
        }
    }

    /// Returns the number of stored categories.
    pub fn len(&self) -> Result<usize, StorageError> {
        let table = self.table.read().map_err(|_| StorageError::Poisoned)?;
        Ok(table.rows.len())
    }

    /// Returns true if the store holds no categories.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    /// Writes a row as-is, bypassing id assignment.
    ///
    /// Lets callers seed fixtures, including malformed parent graphs. The
    /// root sentinel id is rejected with `InvalidId`.
    pub fn put(&self, category: Category) -> Result<(), StorageError> {
        let mut table = self.table.write().map_err(|_| StorageError::Poisoned)?;
        table.put(category)
    }
}

impl CategoryStore for MemoryStore {
    fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, StorageError> {
        let table = self.table.read().map_err(|_| StorageError::Poisoned)?;
        Ok(table.get(id))
    }

    fn count_direct_children(&self, parent_id: CategoryId) -> Result<u64, StorageError> {
        let table = self.table.read().map_err(|_| StorageError::Poisoned)?;
        Ok(table.count_children(parent_id))
    }

    fn insert(&self, category: NewCategory) -> Result<CategoryId, StorageError> {
        let mut table = self.table.write().map_err(|_| StorageError::Poisoned)?;
        table.insert(category)
    }

    fn update_by_id(&self, id: CategoryId, update: CategoryUpdate) -> Result<(), StorageError> {
        let mut table = self.table.write().map_err(|_| StorageError::Poisoned)?;
        table.update(id, update)
    }

    fn delete_by_id(&self, id: CategoryId) -> Result<(), StorageError> {
        let mut table = self.table.write().map_err(|_| StorageError::Poisoned)?;
        table.remove(id)
    }

    fn list_by_status(&self, status: CategoryStatus) -> Result<Vec<Category>, StorageError> {
        let filter = CategoryFilter {
            status: Some(status),
            ..Default::default()
        };
        self.list(&filter)
    }

    fn find_by_ids(&self, ids: &[CategoryId]) -> Result<Vec<Category>, StorageError> {
        let table = self.table.read().map_err(|_| StorageError::Poisoned)?;
        Ok(table.select_ids(ids))
    }

    fn list(&self, filter: &CategoryFilter) -> Result<Vec<Category>, StorageError> {
        let table = self.table.read().map_err(|_| StorageError::Poisoned)?;
        Ok(table.select(filter))
    }
}
