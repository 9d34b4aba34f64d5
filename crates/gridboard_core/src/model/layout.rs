//! Persisted layout record and grid position repair.
//!
//! # Responsibility
//! - Define the unit written to the key-value store.
//! - Repair widget collections so every widget owns a distinct grid cell.
//!
//! # Invariants
//! - One record exists per storage key; a later save overwrites it whole.
//! - After repair, collections of at most four widgets have unique,
//!   in-bounds positions.

use crate::model::widget::{GridPosition, Widget, GRID_CELLS};
use log::{debug, warn};
use serde::Serialize;

/// Record schema version written by this build.
pub const LAYOUT_STORAGE_VERSION: &str = "1.0.0";

/// Persisted layout for one user.
///
/// Encoded with serde; decoding is hand-validated in `repo::layout_repo`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRecord {
    pub user_id: String,
    pub widgets: Vec<Widget>,
    /// Unix epoch milliseconds of the write.
    pub last_updated: i64,
    pub version: String,
}

impl LayoutRecord {
    pub fn new(user_id: impl Into<String>, widgets: Vec<Widget>, last_updated: i64) -> Self {
        Self {
            user_id: user_id.into(),
            widgets,
            last_updated,
            version: LAYOUT_STORAGE_VERSION.to_string(),
        }
    }
}

/// Reassigns conflicting or out-of-bounds widget positions.
///
/// Widgets are scanned in order. The first widget to claim a cell keeps it;
/// later claimants, and widgets outside the grid, take the first unclaimed
/// cell of the fixed pool. When the pool is exhausted the widget keeps its
/// position and a warning is logged.
pub fn validate_and_fix_widget_positions(widgets: &[Widget]) -> Vec<Widget> {
    let mut claimed: Vec<GridPosition> = Vec::with_capacity(GRID_CELLS.len());
    let mut repaired = Vec::with_capacity(widgets.len());

    for widget in widgets {
        let position = widget.position;
        if position.is_in_bounds() && !claimed.contains(&position) {
            claimed.push(position);
            repaired.push(widget.clone());
            continue;
        }

        let free_cell = GRID_CELLS
            .iter()
            .copied()
            .find(|cell| !claimed.contains(cell));

        match free_cell {
            Some(cell) => {
                debug!(
                    "event=position_repair module=layout status=reassigned widget_id={} from={} to={}",
                    widget.id, position, cell
                );
                claimed.push(cell);
                repaired.push(widget.moved_to(cell));
            }
            None => {
                warn!(
                    "event=position_repair module=layout status=unresolved widget_id={} position={} reason=no_free_cell",
                    widget.id, position
                );
                repaired.push(widget.clone());
            }
        }
    }

    repaired
}
