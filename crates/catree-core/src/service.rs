use tracing::{debug, info, warn};

use crate::category::{
    Category, CategoryFilter, CategoryId, CategoryStatus, CategoryUpdate, NewCategory,
};
use crate::config::HierarchyConfig;
use crate::error::Result;
use crate::hierarchy::HierarchyValidator;
use crate::storage::CategoryStore;

/// Manages categories and guards every mutation with the hierarchy rules.
///
/// Each mutating call validates first and only then touches the store, so a
/// rejected call leaves the tree unchanged. Nothing is retried here.
pub struct CategoryService<S: CategoryStore> {
    store: S,
    config: HierarchyConfig,
}

impl<S: CategoryStore> CategoryService<S> {
    /// Creates a new CategoryService with default hierarchy limits.
    pub fn new(store: S) -> Self {
        Self::with_config(store, HierarchyConfig::default())
    }

    /// Creates a new CategoryService with custom hierarchy limits.
    pub fn with_config(store: S, config: HierarchyConfig) -> Self {
        Self { store, config }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a validator over the current store contents.
    pub fn validator(&self) -> HierarchyValidator<'_, S> {
        HierarchyValidator::new(&self.store, self.config)
    }

    /// Creates a category and returns its assigned ID.
    pub fn create_category(&self, category: NewCategory) -> Result<CategoryId> {
        if let Err(e) = self.validator().validate_parent_exists(category.parent_id) {
            warn!(parent_id = %category.parent_id, error = %e, "create rejected");
            return Err(e);
        }

        let id = self.store.insert(category)?;
        info!(%id, "category created");
        Ok(id)
    }

    /// Replaces the mutable fields of an existing category.
    pub fn update_category(&self, id: CategoryId, update: CategoryUpdate) -> Result<()> {
        let validator = self.validator();
        let checked = validator
            .validate_exists(id)
            .and_then(|_| validator.validate_parent_exists(update.parent_id))
            .and_then(|_| validator.validate_reparent(id, update.parent_id));
        if let Err(e) = checked {
            warn!(%id, parent_id = %update.parent_id, error = %e, "update rejected");
            return Err(e);
        }

        self.store.update_by_id(id, update)?;
        info!(%id, "category updated");
        Ok(())
    }

    /// Deletes a category that has no children.
    pub fn delete_category(&self, id: CategoryId) -> Result<()> {
        let validator = self.validator();
        let checked = validator
            .validate_exists(id)
            .and_then(|_| validator.validate_deletable(id));
        if let Err(e) = checked {
            warn!(%id, error = %e, "delete rejected");
            return Err(e);
        }

        self.store.delete_by_id(id)?;
        info!(%id, "category deleted");
        Ok(())
    }

    /// Fails unless products may be attached to `id`.
    pub fn assert_usable(&self, id: CategoryId) -> Result<()> {
        self.validator().validate_usable(id)?;
        debug!(%id, "category usable");
        Ok(())
    }

    /// Returns the level of `id`, failing if any node on its path is disabled.
    pub fn category_level(&self, id: CategoryId) -> Result<u32> {
        self.validator().compute_level_or_fail(id)
    }

    /// Gets a category by ID.
    pub fn get_category(&self, id: CategoryId) -> Result<Option<Category>> {
        Ok(self.store.find_by_id(id)?)
    }

    /// Lists all enabled categories.
    pub fn list_enabled(&self) -> Result<Vec<Category>> {
        Ok(self.store.list_by_status(CategoryStatus::Enabled)?)
    }

    /// Fetches the categories with the given IDs.
    ///
    /// A plain batch lookup: rows come back whatever their status, and
    /// unknown IDs are skipped. Callers attaching products still go through
    /// [`Self::assert_usable`].
    pub fn list_enabled_by_ids(&self, ids: &[CategoryId]) -> Result<Vec<Category>> {
        Ok(self.store.find_by_ids(ids)?)
    }

    /// Lists categories matching `filter`, defaulting to enabled ones.
    ///
    /// A status set on the filter is kept as given.
    pub fn list_enabled_filtered(&self, filter: &CategoryFilter) -> Result<Vec<Category>> {
        let filter = CategoryFilter {
            status: filter.status.or(Some(CategoryStatus::Enabled)),
            ..filter.clone()
        };
        Ok(self.store.list(&filter)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CategoryError;
    use crate::storage::MemoryStore;

    fn create_test_service() -> CategoryService<MemoryStore> {
        CategoryService::new(MemoryStore::new())
    }

    #[test]
    fn test_create_root() {
        let service = create_test_service();
        let id = service.create_category(NewCategory::root("Electronics")).unwrap();

        let stored = service.get_category(id).unwrap().unwrap();
        assert!(stored.is_root());
        assert_eq!(stored.attrs.name, "Electronics");
    }

    #[test]
    fn test_create_under_missing_parent() {
        let service = create_test_service();
        let result = service.create_category(NewCategory::child_of(CategoryId(9), "Orphan"));

        assert!(matches!(result, Err(CategoryError::ParentNotFound(CategoryId(9)))));
        assert!(service.store().is_empty().unwrap());
    }

    #[test]
    fn test_delete_missing() {
        let service = create_test_service();
        assert!(matches!(
            service.delete_category(CategoryId(3)),
            Err(CategoryError::NotFound(CategoryId(3)))
        ));
    }

    #[test]
    fn test_update_missing() {
        let service = create_test_service();
        let update = CategoryUpdate {
            parent_id: CategoryId::NO_PARENT,
            status: CategoryStatus::Enabled,
            attrs: Default::default(),
        };
        assert!(matches!(
            service.update_category(CategoryId(3), update),
            Err(CategoryError::NotFound(CategoryId(3)))
        ));
    }
}
