//! Widget-layout engine for the demo dashboard.
//! This crate owns layout persistence, position repair, auto-save debounce
//! and drag-reposition logic, plus the session, theme and task-list state the
//! dashboard shows. Rendering hosts drive it through explicit calls.

pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{LayoutConfig, LAYOUT_STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::layout::{validate_and_fix_widget_positions, LayoutRecord, LAYOUT_STORAGE_VERSION};
pub use model::task::{seed_tasks, Task, TaskId};
pub use model::user::{CredentialsValidationError, LoginCredentials, User, UserId};
pub use model::widget::{
    default_widgets, GridPosition, Widget, WidgetSize, WidgetType, GRID_CELLS,
};
pub use repo::layout_repo::{FallbackReason, LayoutLookup, LayoutRepository, RepoError, RepoResult};
pub use service::auth_service::{AuthError, AuthService, DemoCredential, SESSION_STORAGE_KEY};
pub use service::autosave::{DebounceTimer, AUTOSAVE_DELAY};
pub use service::drag_controller::{
    DragController, DragState, DropOutcome, DropSkipReason, DRAG_LEAVE_DELAY,
};
pub use service::layout_service::{LayoutStore, StorageInfo, SubscriptionId};
pub use service::route_guard::{resolve_route, Route};
pub use service::task_list_service::{TaskListService, SAMPLE_TASK_NAMES};
pub use service::theme_service::{ThemeMode, ThemeService, THEME_STORAGE_KEY};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
