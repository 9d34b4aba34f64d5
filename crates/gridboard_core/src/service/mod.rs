//! Dashboard use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep presentation hosts decoupled from storage details.

pub mod auth_service;
pub mod autosave;
pub mod drag_controller;
pub mod layout_service;
pub mod route_guard;
pub mod task_list_service;
pub mod theme_service;
