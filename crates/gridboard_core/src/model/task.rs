//! Task entries shown by the task-list widget.

/// Stable task identifier, unique within one list.
pub type TaskId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub completed: bool,
}

impl Task {
    pub fn new(id: TaskId, name: impl Into<String>, completed: bool) -> Self {
        Self {
            id,
            name: name.into(),
            completed,
        }
    }

    /// Returns a copy with `completed` flipped.
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

/// Returns a fresh copy of the five tasks a new widget starts with.
pub fn seed_tasks() -> Vec<Task> {
    vec![
        Task::new(1, "Review quarterly reports", true),
        Task::new(2, "Update project timeline", false),
        Task::new(3, "Schedule team meeting", true),
        Task::new(4, "Prepare presentation", false),
        Task::new(5, "Send follow-up emails", false),
    ]
}
