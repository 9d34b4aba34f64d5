//! Dashboard domain model.
//!
//! # Responsibility
//! - Define canonical data structures shared by repository and service layers.
//! - Keep the persisted layout shape and the grid geometry in one place.
//!
//! # Invariants
//! - Widgets are replaced as whole values; no partial in-place edits escape
//!   the layout store.
//! - The grid is fixed at 2x2 cells.

pub mod layout;
pub mod task;
pub mod user;
pub mod widget;
