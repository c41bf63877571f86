//! Default values for catree configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Hierarchy Defaults
// ============================================================================

/// Minimum level a category must sit at before products may be attached to it.
///
/// Roots are level 1, so the default requires a root > child > leaf path.
pub const DEFAULT_MIN_USABLE_LEVEL: u32 = 3;

/// Maximum tree depth. `None` leaves the tree unbounded.
pub const DEFAULT_MAX_DEPTH: Option<u32> = None;

// ============================================================================
// Storage Defaults
// ============================================================================

/// Default data directory.
pub const DEFAULT_DATA_DIR: &str = ".catree";

/// Default categories document file name.
pub const DEFAULT_CATEGORIES_FILE: &str = "categories.json";

// ============================================================================
// Logging Defaults
// ============================================================================

/// Default log filter directive, used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

// ============================================================================
// Config File Locations
// ============================================================================

/// Project-local config file name.
pub const PROJECT_CONFIG_FILE: &str = "catree.toml";

/// Directory under the user config dir holding `config.toml`.
pub const USER_CONFIG_DIR: &str = "catree";
