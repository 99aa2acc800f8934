//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Number of undoable actions kept before the oldest is evicted
pub const DEFAULT_MAX_HISTORY_SIZE: usize = 50;

/// Maximum number of recent pages to remember in config
pub const MAX_RECENT_PAGES: usize = 5;

/// Name given to a fresh page
pub const DEFAULT_PAGE_NAME: &str = "Untitled Page";

/// Route given to a fresh page
pub const DEFAULT_PAGE_ROUTE: &str = "/";

/// Version stamped into saved page documents
pub const PAGE_FORMAT_VERSION: u32 = 1;

/// Suffix appended to the display name of a duplicated component
pub const COPY_SUFFIX: &str = " (copy)";

/// Name of the layer group created for an empty page
pub const DEFAULT_LAYER_NAME: &str = "Default Layer";

/// Palette cycled through when a new layer group gets no explicit color
pub const LAYER_COLORS: [&str; 8] = [
    "#3b82f6", "#10b981", "#f59e0b", "#8b5cf6", "#ec4899", "#06b6d4", "#f97316", "#14b8a6",
];

/// Upper bound of a layer group's opacity percentage
pub const MAX_LAYER_OPACITY: u8 = 100;
