use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a category, assigned by the store on insert.
///
/// The value `0` is reserved for [`CategoryId::NO_PARENT`] and is never
/// handed out to a stored category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

impl CategoryId {
    /// Parent sentinel marking a root (top-level) category.
    pub const NO_PARENT: CategoryId = CategoryId(0);

    /// Returns true if this id is the root sentinel.
    pub fn is_no_parent(&self) -> bool {
        *self == Self::NO_PARENT
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CategoryId {
    fn from(value: u64) -> Self {
        CategoryId(value)
    }
}

/// Whether a category may be used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    #[default]
    Enabled,
    Disabled,
}

impl CategoryStatus {
    /// Returns a human-readable name for the status.
    pub fn display_name(&self) -> &'static str {
        match self {
            CategoryStatus::Enabled => "Enabled",
            CategoryStatus::Disabled => "Disabled",
        }
    }
}

/// Descriptive attributes of a category.
///
/// None of these take part in hierarchy validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAttrs {
    /// Display name
    pub name: String,
    /// Picture shown next to the category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pic_url: Option<String>,
    /// Sort key, lower first
    #[serde(default)]
    pub sort: i32,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CategoryAttrs {
    /// Creates attributes with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A node in the category tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,
    /// Parent category, or [`CategoryId::NO_PARENT`] for a root
    pub parent_id: CategoryId,
    /// Enabled/disabled flag
    pub status: CategoryStatus,
    /// Descriptive attributes
    #[serde(flatten)]
    pub attrs: CategoryAttrs,
    /// When the category was created
    pub created_at: DateTime<Utc>,
    /// When the category was last updated
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Returns true if this category sits at the top of the tree.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_no_parent()
    }

    /// Returns true if the category itself is enabled.
    ///
    /// Says nothing about its ancestors.
    pub fn is_enabled(&self) -> bool {
        self.status == CategoryStatus::Enabled
    }
}

/// Input for creating a category. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub parent_id: CategoryId,
    pub status: CategoryStatus,
    pub attrs: CategoryAttrs,
}

impl NewCategory {
    /// An enabled root category.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            parent_id: CategoryId::NO_PARENT,
            status: CategoryStatus::Enabled,
            attrs: CategoryAttrs::named(name),
        }
    }

    /// An enabled category under `parent_id`.
    pub fn child_of(parent_id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            parent_id,
            status: CategoryStatus::Enabled,
            attrs: CategoryAttrs::named(name),
        }
    }

    /// Sets the status.
    pub fn with_status(mut self, status: CategoryStatus) -> Self {
        self.status = status;
        self
    }
}

/// Replacement values for the mutable fields of an existing category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub parent_id: CategoryId,
    pub status: CategoryStatus,
    pub attrs: CategoryAttrs,
}

impl From<&Category> for CategoryUpdate {
    fn from(category: &Category) -> Self {
        Self {
            parent_id: category.parent_id,
            status: category.status,
            attrs: category.attrs.clone(),
        }
    }
}

/// Criteria for listing categories. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    pub status: Option<CategoryStatus>,
    pub parent_id: Option<CategoryId>,
}

impl CategoryFilter {
    /// Returns true if `category` satisfies every set criterion.
    pub fn matches(&self, category: &Category) -> bool {
        if let Some(status) = self.status {
            if category.status != status {
                return false;
            }
        }
        if let Some(parent_id) = self.parent_id {
            if category.parent_id != parent_id {
                return false;
            }
        }
        match &self.name {
            Some(name) => category
                .attrs
                .name
                .to_lowercase()
                .contains(&name.to_lowercase()),
            None => true,
        }
    }
}

/// Orders categories the way every listing returns them: by sort key, then id.
pub fn sort_categories(categories: &mut [Category]) {
    categories.sort_by(|a, b| a.attrs.sort.cmp(&b.attrs.sort).then(a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: u64, parent: u64, name: &str) -> Category {
        let now = Utc::now();
        Category {
            id: CategoryId(id),
            parent_id: CategoryId(parent),
            status: CategoryStatus::Enabled,
            attrs: CategoryAttrs::named(name),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_root_detection() {
        assert!(category(1, 0, "Root").is_root());
        assert!(!category(2, 1, "Child").is_root());
    }

    #[test]
    fn test_filter_matches() {
        let mut phones = category(3, 1, "Mobile Phones");
        let filter = CategoryFilter {
            name: Some("phone".to_string()),
            parent_id: Some(CategoryId(1)),
            ..Default::default()
        };
        assert!(filter.matches(&phones));

        phones.status = CategoryStatus::Disabled;
        let enabled_only = CategoryFilter {
            status: Some(CategoryStatus::Enabled),
            ..filter
        };
        assert!(!enabled_only.matches(&phones));
    }

    #[test]
    fn test_sort_categories() {
        let mut a = category(1, 0, "A");
        a.attrs.sort = 5;
        let b = category(2, 0, "B");
        let c = category(3, 0, "C");
        let mut rows = vec![a, c, b];
        sort_categories(&mut rows);
        let ids: Vec<u64> = rows.iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&CategoryStatus::Disabled).unwrap();
        assert_eq!(json, "\"disabled\"");
    }
}
