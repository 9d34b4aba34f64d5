//! Drag-and-drop repositioning over the 2x2 widget grid.
//!
//! # Responsibility
//! - Track the drag gesture raised by the presentation layer.
//! - Turn a drop on a grid cell into a position swap committed through the
//!   layout store.
//!
//! # Invariants
//! - A swap exchanges `position` fields only; widget identities and their
//!   order in the collection are untouched.
//! - Every `drop` returns the controller to `Idle`.
//! - A pending drag-leave is cancelled by any later gesture event.

use crate::clock::Clock;
use crate::config::LayoutConfig;
use crate::model::widget::{GridPosition, Widget};
use crate::service::autosave::DebounceTimer;
use crate::service::layout_service::LayoutStore;
use crate::storage::KeyValueStore;
use log::debug;
use std::time::Duration;

/// Delay before a drag-leave clears the hovered cell.
pub const DRAG_LEAVE_DELAY: Duration = Duration::from_millis(50);

/// Gesture state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        widget: Widget,
    },
    Hovering {
        widget: Widget,
        cell_index: usize,
    },
}

/// Why a drop did not change the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropSkipReason {
    NotDragging,
    UnknownCell,
    EmptyCell,
    SameWidget,
    /// The dragged widget is no longer in the store's collection.
    StaleWidget,
}

/// Result of `DragController::drop`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Swapped {
        dragged_id: String,
        target_id: String,
        /// New position of the dragged widget.
        to: GridPosition,
        /// New position of the displaced widget.
        from: GridPosition,
    },
    Skipped(DropSkipReason),
}

/// Drag gesture state machine.
pub struct DragController<C: Clock> {
    state: DragState,
    leave_timer: DebounceTimer,
    clock: C,
}

impl<C: Clock> DragController<C> {
    pub fn from_config(clock: C, config: &LayoutConfig) -> Self {
        Self {
            state: DragState::Idle,
            leave_timer: DebounceTimer::new(config.drag_leave_delay),
            clock,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn dragged_widget(&self) -> Option<&Widget> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging { widget } | DragState::Hovering { widget, .. } => Some(widget),
        }
    }

    /// Candidate cell under the pointer, if any.
    pub fn hovered_cell(&self) -> Option<usize> {
        match self.state {
            DragState::Hovering { cell_index, .. } => Some(cell_index),
            _ => None,
        }
    }

    pub fn drag_start(&mut self, widget: &Widget) {
        self.leave_timer.cancel();
        debug!(
            "event=drag_start module=drag status=ok widget_id={}",
            widget.id
        );
        self.state = DragState::Dragging {
            widget: widget.clone(),
        };
    }

    /// Marks `cell_index` as the drop candidate while a widget is held.
    pub fn drag_enter(&mut self, cell_index: usize) {
        if GridPosition::from_cell_index(cell_index).is_none() {
            debug!("event=drag_enter module=drag status=ignored reason=unknown_cell cell={cell_index}");
            return;
        }
        let widget = match std::mem::take(&mut self.state) {
            DragState::Idle => return,
            DragState::Dragging { widget } | DragState::Hovering { widget, .. } => widget,
        };
        self.leave_timer.cancel();
        self.state = DragState::Hovering { widget, cell_index };
    }

    /// Schedules clearing of the hovered cell after the leave delay.
    pub fn drag_leave(&mut self) {
        if matches!(self.state, DragState::Hovering { .. }) {
            self.leave_timer.schedule(self.clock.now_ms());
        }
    }

    /// Applies an elapsed drag-leave. Returns whether the state changed.
    pub fn tick(&mut self) -> bool {
        if !self.leave_timer.take_due(self.clock.now_ms()) {
            return false;
        }
        match std::mem::take(&mut self.state) {
            DragState::Hovering { widget, .. } => {
                self.state = DragState::Dragging { widget };
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Abandons the gesture without dropping.
    pub fn drag_end(&mut self) {
        self.leave_timer.cancel();
        self.state = DragState::Idle;
    }

    /// Drops the held widget on `cell_index`, swapping with its occupant.
    ///
    /// # Side effects
    /// - On a swap, commits the new collection through
    ///   `LayoutStore::update_widgets`, which schedules an auto-save.
    pub fn drop<S: KeyValueStore, K: Clock>(
        &mut self,
        cell_index: usize,
        store: &mut LayoutStore<S, K>,
    ) -> DropOutcome {
        self.leave_timer.cancel();
        let dragged = match std::mem::take(&mut self.state) {
            DragState::Idle => return skipped(DropSkipReason::NotDragging),
            DragState::Dragging { widget } | DragState::Hovering { widget, .. } => widget,
        };

        let target = match GridPosition::from_cell_index(cell_index) {
            Some(target) => target,
            None => return skipped(DropSkipReason::UnknownCell),
        };

        match swap_positions(store.widgets(), &dragged.id, target) {
            Ok(swap) => {
                debug!(
                    "event=drop module=drag status=swapped dragged_id={} target_id={} to={} from={}",
                    swap.dragged_id, swap.target_id, swap.to, swap.from
                );
                let outcome = DropOutcome::Swapped {
                    dragged_id: swap.dragged_id,
                    target_id: swap.target_id,
                    to: swap.to,
                    from: swap.from,
                };
                store.update_widgets(swap.widgets);
                outcome
            }
            Err(reason) => skipped(reason),
        }
    }
}

fn skipped(reason: DropSkipReason) -> DropOutcome {
    debug!("event=drop module=drag status=skipped reason={reason:?}");
    DropOutcome::Skipped(reason)
}

struct Swap {
    widgets: Vec<Widget>,
    dragged_id: String,
    target_id: String,
    to: GridPosition,
    from: GridPosition,
}

fn swap_positions(
    widgets: &[Widget],
    dragged_id: &str,
    target: GridPosition,
) -> Result<Swap, DropSkipReason> {
    let dragged_index = widgets
        .iter()
        .position(|widget| widget.id == dragged_id)
        .ok_or(DropSkipReason::StaleWidget)?;
    let target_index = widgets
        .iter()
        .position(|widget| widget.position == target)
        .ok_or(DropSkipReason::EmptyCell)?;
    if target_index == dragged_index {
        return Err(DropSkipReason::SameWidget);
    }

    let from = widgets[dragged_index].position;
    let mut updated = widgets.to_vec();
    updated[dragged_index] = widgets[dragged_index].moved_to(target);
    updated[target_index] = widgets[target_index].moved_to(from);

    Ok(Swap {
        widgets: updated,
        dragged_id: widgets[dragged_index].id.clone(),
        target_id: widgets[target_index].id.clone(),
        to: target,
        from,
    })
}
