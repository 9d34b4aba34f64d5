//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `gridboard_core` linkage without a rendering host.
//! - Walk one scripted session: login, swap two widgets, let auto-save fire,
//!   then toggle a task.

use gridboard_core::{
    AuthService, DragController, DropOutcome, LayoutConfig, LayoutStore, LoginCredentials,
    ManualClock, MemoryKeyValueStore, TaskListService, AUTOSAVE_DELAY,
};
use std::process::ExitCode;
use std::rc::Rc;

fn main() -> ExitCode {
    println!("gridboard_core ping={}", gridboard_core::ping());
    println!("gridboard_core version={}", gridboard_core::core_version());

    match run_scripted_session() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("scripted session failed: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run_scripted_session() -> Result<(), String> {
    let backend = Rc::new(MemoryKeyValueStore::new());
    let clock = ManualClock::starting_at(0);
    let config = LayoutConfig::default();

    let mut auth = AuthService::new(Rc::clone(&backend));
    let user = auth
        .login(&LoginCredentials::new("demo", "demo123"))
        .map_err(|err| err.to_string())?;
    println!("login user={} role={}", user.username, user.role);

    let mut layout = LayoutStore::new(Rc::clone(&backend), clock.clone(), config.clone());
    layout.set_current_user(user.layout_key());
    let mut drag = DragController::from_config(clock.clone(), &config);

    let dragged = layout
        .widgets()
        .first()
        .cloned()
        .ok_or("layout has no widgets")?;
    drag.drag_start(&dragged);
    drag.drag_enter(3);
    match drag.drop(3, &mut layout) {
        DropOutcome::Swapped {
            dragged_id,
            target_id,
            ..
        } => println!("swap dragged={dragged_id} target={target_id}"),
        DropOutcome::Skipped(reason) => return Err(format!("drop skipped: {reason:?}")),
    }

    clock.advance(AUTOSAVE_DELAY);
    let saved = layout.tick() == Some(true);
    println!("autosave saved={saved}");

    for widget in layout.widgets() {
        println!("widget id={} position={}", widget.id, widget.position);
    }
    let mut tasks = TaskListService::new();
    tasks.toggle_task(2);
    println!(
        "tasks completed={}/{} percent={:.0}",
        tasks.completed_count(),
        tasks.tasks().len(),
        tasks.completion_percentage()
    );

    let info = layout.get_storage_info();
    println!(
        "storage available={} used_bytes={}",
        info.available, info.used_bytes
    );
    Ok(())
}
