//! Widget domain model.
//!
//! # Responsibility
//! - Define the canonical widget record placed on the dashboard grid.
//! - Own the fixed 2x2 grid geometry and its cell index table.
//!
//! # Invariants
//! - `id` is unique within one layout.
//! - A valid layout places each widget on a distinct cell of
//!   `{0,1} x {0,1}`.
//!
//! # See also
//! - `model::layout` for the persisted record shape.

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Number of rows in the dashboard grid.
pub const GRID_ROWS: i64 = 2;
/// Number of columns in the dashboard grid.
pub const GRID_COLS: i64 = 2;

/// Fixed cell index table: index `i` maps to `GRID_CELLS[i]`.
pub const GRID_CELLS: [GridPosition; 4] = [
    GridPosition { row: 0, col: 0 },
    GridPosition { row: 0, col: 1 },
    GridPosition { row: 1, col: 0 },
    GridPosition { row: 1, col: 1 },
];

/// Panel kind rendered by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetType {
    Weather,
    Chart,
    Tasks,
    Stats,
}

impl WidgetType {
    /// Stable wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Chart => "chart",
            Self::Tasks => "tasks",
            Self::Stats => "stats",
        }
    }

    /// Parses a wire value; unknown strings yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "weather" => Some(Self::Weather),
            "chart" => Some(Self::Chart),
            "tasks" => Some(Self::Tasks),
            "stats" => Some(Self::Stats),
            _ => None,
        }
    }
}

impl Display for WidgetType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grid coordinate of one widget.
///
/// Coordinates are signed so that out-of-range values read back from storage
/// can be represented and later repaired instead of rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridPosition {
    pub row: i64,
    pub col: i64,
}

impl GridPosition {
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Resolves a grid cell index through the fixed table.
    pub fn from_cell_index(index: usize) -> Option<Self> {
        GRID_CELLS.get(index).copied()
    }

    /// Returns the table index of this position, if it is a grid cell.
    pub fn cell_index(self) -> Option<usize> {
        GRID_CELLS.iter().position(|cell| *cell == self)
    }

    /// Returns whether this position lies inside the 2x2 grid.
    pub fn is_in_bounds(self) -> bool {
        (0..GRID_ROWS).contains(&self.row) && (0..GRID_COLS).contains(&self.col)
    }
}

impl Display for GridPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Widget span in grid units.
///
/// Carried through storage as-is; any finite number is accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WidgetSize {
    pub width: f64,
    pub height: f64,
}

impl WidgetSize {
    /// One grid cell.
    pub const UNIT: Self = Self {
        width: 1.0,
        height: 1.0,
    };
}

/// One dashboard panel.
///
/// Owned by the layout store and replaced as a whole on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Widget {
    pub id: String,
    /// Serialized as `type` to match the stored record schema.
    #[serde(rename = "type")]
    pub kind: WidgetType,
    pub title: String,
    pub position: GridPosition,
    pub size: WidgetSize,
}

impl Widget {
    /// Creates a single-cell widget.
    pub fn new(
        id: impl Into<String>,
        kind: WidgetType,
        title: impl Into<String>,
        position: GridPosition,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            position,
            size: WidgetSize::UNIT,
        }
    }

    /// Returns a copy placed at `position`.
    pub fn moved_to(&self, position: GridPosition) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }
}

/// Returns a fresh copy of the four default dashboard widgets.
pub fn default_widgets() -> Vec<Widget> {
    vec![
        Widget::new("weather-1", WidgetType::Weather, "Weather", GRID_CELLS[0]),
        Widget::new("chart-1", WidgetType::Chart, "Analytics", GRID_CELLS[1]),
        Widget::new("tasks-1", WidgetType::Tasks, "Tasks", GRID_CELLS[2]),
        Widget::new("stats-1", WidgetType::Stats, "Quick Stats", GRID_CELLS[3]),
    ]
}
