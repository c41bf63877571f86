pub mod category;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod service;
pub mod storage;

pub use category::{
    Category, CategoryAttrs, CategoryFilter, CategoryId, CategoryStatus, CategoryUpdate,
    NewCategory,
};
pub use config::{Config, ConfigError, HierarchyConfig, LoggingConfig, StorageConfig};
pub use error::{CategoryError, Result};
pub use hierarchy::HierarchyValidator;
pub use service::CategoryService;
pub use storage::{CategoryStore, FileStore, MemoryStore, StorageError};
