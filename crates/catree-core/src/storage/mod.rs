mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::category::{
    Category, CategoryFilter, CategoryId, CategoryStatus, CategoryUpdate, NewCategory,
};

/// Trait for category storage backends.
///
/// The hierarchy rules only ever read through this trait; mutations are
/// issued by [`crate::CategoryService`] once validation has passed.
/// Listings are ordered by sort key, then id.
pub trait CategoryStore {
    /// Looks up a category by ID.
    fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, StorageError>;

    /// Counts the categories whose parent is `parent_id`.
    fn count_direct_children(&self, parent_id: CategoryId) -> Result<u64, StorageError>;

    /// Inserts a category and returns its newly assigned ID.
    fn insert(&self, category: NewCategory) -> Result<CategoryId, StorageError>;

    /// Replaces the mutable fields of an existing category.
    fn update_by_id(&self, id: CategoryId, update: CategoryUpdate) -> Result<(), StorageError>;

    /// Deletes a category by ID.
    fn delete_by_id(&self, id: CategoryId) -> Result<(), StorageError>;

    /// Lists all categories with the given status.
    fn list_by_status(&self, status: CategoryStatus) -> Result<Vec<Category>, StorageError>;

    /// Fetches the categories with the given IDs. Unknown IDs are skipped.
    fn find_by_ids(&self, ids: &[CategoryId]) -> Result<Vec<Category>, StorageError>;

    /// Lists categories matching a filter.
    fn list(&self, filter: &CategoryFilter) -> Result<Vec<Category>, StorageError>;
}
