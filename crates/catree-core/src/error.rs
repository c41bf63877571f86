//! Category error types.

use thiserror::Error;

use crate::category::CategoryId;
use crate::storage::StorageError;

/// Errors raised by hierarchy validation and category operations.
#[derive(Debug, Error)]
pub enum CategoryError {
    /// The referenced category does not exist.
    #[error("Category not found: {0}")]
    NotFound(CategoryId),

    /// The proposed parent does not exist.
    #[error("Parent category not found: {0}")]
    ParentNotFound(CategoryId),

    /// A category on the path to the root is disabled.
    #[error("Category {0} is disabled")]
    CategoryDisabled(CategoryId),

    /// The category sits too close to the root to be used.
    #[error("Category {id} is at level {level}, products need level {required} or deeper")]
    LevelTooShallow {
        id: CategoryId,
        level: u32,
        required: u32,
    },

    /// Delete attempted on a category that still has children.
    #[error("Category {id} still has {count} child categories")]
    HasChildren { id: CategoryId, count: u64 },

    /// The parent graph loops back on itself at this category.
    #[error("Cycle detected in category tree at {0}")]
    CycleDetected(CategoryId),

    /// Placing a category under `parent` would go past the depth limit.
    #[error("Category under parent {parent} would be at level {level}, maximum depth is {max}")]
    DepthExceeded {
        parent: CategoryId,
        level: u32,
        max: u32,
    },

    /// The underlying store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, CategoryError>;
