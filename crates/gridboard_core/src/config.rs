//! Layout engine configuration.
//!
//! Values are passed explicitly to `LayoutStore::new`; `Default` carries the
//! constants the dashboard ships with.

use crate::model::layout::LAYOUT_STORAGE_VERSION;
use crate::service::autosave::AUTOSAVE_DELAY;
use crate::service::drag_controller::DRAG_LEAVE_DELAY;
use std::time::Duration;

/// Fixed key holding the single persisted layout record.
pub const LAYOUT_STORAGE_KEY: &str = "dashboard_widget_layout";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Key of the persisted layout record.
    pub storage_key: String,
    /// Record version written on save and required on load.
    pub storage_version: String,
    /// Quiet period before a mutated layout is persisted.
    pub autosave_delay: Duration,
    /// Delay before a drag-leave clears the hovered cell.
    pub drag_leave_delay: Duration,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            storage_key: LAYOUT_STORAGE_KEY.to_string(),
            storage_version: LAYOUT_STORAGE_VERSION.to_string(),
            autosave_delay: AUTOSAVE_DELAY,
            drag_leave_delay: DRAG_LEAVE_DELAY,
        }
    }
}
