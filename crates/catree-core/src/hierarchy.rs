//! Structural and business rules over the category tree.
//!
//! [`HierarchyValidator`] never mutates the store. Every check re-reads the
//! nodes it needs, so a level or status is never cached past a single call.

use std::collections::HashSet;

use tracing::debug;

use crate::category::{Category, CategoryFilter, CategoryId};
use crate::config::HierarchyConfig;
use crate::error::{CategoryError, Result};
use crate::storage::CategoryStore;

/// Read-only rule checks over a [`CategoryStore`].
pub struct HierarchyValidator<'a, S: CategoryStore> {
    store: &'a S,
    config: HierarchyConfig,
}

impl<'a, S: CategoryStore> HierarchyValidator<'a, S> {
    /// Creates a validator over `store` with the given limits.
    pub fn new(store: &'a S, config: HierarchyConfig) -> Self {
        Self { store, config }
    }

    /// Returns the limits this validator enforces.
    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    /// Checks that `parent_id` may receive a new child.
    ///
    /// The root sentinel always passes. Otherwise the parent must exist and,
    /// when a maximum depth is configured, a child under it must still fit.
    pub fn validate_parent_exists(&self, parent_id: CategoryId) -> Result<()> {
        if parent_id.is_no_parent() {
            return Ok(());
        }
        if self.store.find_by_id(parent_id)?.is_none() {
            debug!(%parent_id, "parent category missing");
            return Err(CategoryError::ParentNotFound(parent_id));
        }
        self.check_depth(parent_id, 1)
    }

    /// Returns the category, or `NotFound`.
    pub fn validate_exists(&self, id: CategoryId) -> Result<Category> {
        self.store
            .find_by_id(id)?
            .ok_or(CategoryError::NotFound(id))
    }

    /// Computes the level of `id`, failing on any disabled node up to the root.
    ///
    /// Roots are level 1. The walk fails with `NotFound` if it reaches a
    /// missing node and with `CycleDetected` if it revisits one.
    pub fn compute_level_or_fail(&self, id: CategoryId) -> Result<u32> {
        let level = self.walk_to_root(id, true)?;
        debug!(%id, level, "computed enabled level");
        Ok(level)
    }

    /// Computes the level of `id` without looking at status.
    pub fn structural_level(&self, id: CategoryId) -> Result<u32> {
        self.walk_to_root(id, false)
    }

    /// Checks that `id` is deep enough and enabled along its whole path.
    pub fn validate_usable(&self, id: CategoryId) -> Result<()> {
        let level = self.compute_level_or_fail(id)?;
        let required = self.config.min_usable_level;
        if level < required {
            return Err(CategoryError::LevelTooShallow {
                id,
                level,
                required,
            });
        }
        Ok(())
    }

    /// Checks that `id` exists and has no children.
    pub fn validate_deletable(&self, id: CategoryId) -> Result<()> {
        self.validate_exists(id)?;
        let count = self.store.count_direct_children(id)?;
        if count > 0 {
            return Err(CategoryError::HasChildren { id, count });
        }
        Ok(())
    }

    /// Checks that moving `id` under `new_parent_id` keeps the tree a forest
    /// and, with a maximum depth set, keeps its whole subtree within it.
    pub fn validate_reparent(&self, id: CategoryId, new_parent_id: CategoryId) -> Result<()> {
        if new_parent_id.is_no_parent() {
            return Ok(());
        }
        if new_parent_id == id {
            return Err(CategoryError::CycleDetected(id));
        }

        let mut visited = HashSet::new();
        let mut current = new_parent_id;
        while !current.is_no_parent() {
            if current == id {
                debug!(%id, %new_parent_id, "reparent would make category its own ancestor");
                return Err(CategoryError::CycleDetected(id));
            }
            if !visited.insert(current) {
                return Err(CategoryError::CycleDetected(current));
            }
            let node = self
                .store
                .find_by_id(current)?
                .ok_or(CategoryError::NotFound(current))?;
            current = node.parent_id;
        }

        if self.config.max_depth.is_some() {
            let height = self.subtree_height(id)?;
            self.check_depth(new_parent_id, height)?;
        }
        Ok(())
    }

    /// Number of levels in the subtree rooted at `id`, counting `id` itself.
    fn subtree_height(&self, id: CategoryId) -> Result<u32> {
        let mut visited = HashSet::from([id]);
        let mut frontier = vec![id];
        let mut height = 0;

        while !frontier.is_empty() {
            height += 1;
            let mut next = Vec::new();
            for parent in frontier {
                let filter = CategoryFilter {
                    parent_id: Some(parent),
                    ..Default::default()
                };
                for child in self.store.list(&filter)? {
                    if !visited.insert(child.id) {
                        return Err(CategoryError::CycleDetected(child.id));
                    }
                    next.push(child.id);
                }
            }
            frontier = next;
        }
        Ok(height)
    }

    /// Fails if `height` levels placed under `parent_id` would pass `max_depth`.
    fn check_depth(&self, parent_id: CategoryId, height: u32) -> Result<()> {
        let Some(max) = self.config.max_depth else {
            return Ok(());
        };
        let level = self.structural_level(parent_id)? + height;
        if level > max {
            debug!(%parent_id, level, max, "depth limit reached");
            return Err(CategoryError::DepthExceeded {
                parent: parent_id,
                level,
                max,
            });
        }
        Ok(())
    }

    fn walk_to_root(&self, id: CategoryId, require_enabled: bool) -> Result<u32> {
        let mut visited = HashSet::new();
        let mut current = id;
        let mut level = 1;

        loop {
            if !visited.insert(current) {
                return Err(CategoryError::CycleDetected(current));
            }
            let node = self
                .store
                .find_by_id(current)?
                .ok_or(CategoryError::NotFound(current))?;
            if require_enabled && !node.is_enabled() {
                return Err(CategoryError::CategoryDisabled(current));
            }
            if node.is_root() {
                return Ok(level);
            }
            current = node.parent_id;
            level += 1;
        }
    }
}
