//! Task-list widget state.
//!
//! # Responsibility
//! - Hold the widget's task list and apply toggle/add actions.
//! - Derive the completed count and completion percentage.
//!
//! # Invariants
//! - The list is replaced whole on every action.
//! - Task ids stay unique: new ids are one past the current maximum.
//! - State is in-memory only; it is not persisted with the layout.

use crate::model::task::{seed_tasks, Task, TaskId};
use log::debug;

/// Names cycled through by `add_sample_task`.
pub const SAMPLE_TASK_NAMES: [&str; 6] = [
    "Review documentation",
    "Test new features",
    "Update dependencies",
    "Write unit tests",
    "Code review",
    "Deploy to staging",
];

/// State behind one task-list widget.
#[derive(Debug, Clone)]
pub struct TaskListService {
    tasks: Vec<Task>,
    next_sample: usize,
}

impl Default for TaskListService {
    fn default() -> Self {
        Self::with_tasks(seed_tasks())
    }
}

impl TaskListService {
    /// Starts from the seed tasks.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            next_sample: 0,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Flips `completed` on `task_id`. Returns whether the task exists.
    pub fn toggle_task(&mut self, task_id: TaskId) -> bool {
        if !self.tasks.iter().any(|task| task.id == task_id) {
            debug!("event=task_toggle module=tasks status=skipped reason=unknown_task task_id={task_id}");
            return false;
        }

        self.tasks = self
            .tasks
            .iter()
            .map(|task| {
                if task.id == task_id {
                    task.toggled()
                } else {
                    task.clone()
                }
            })
            .collect();
        debug!("event=task_toggle module=tasks status=ok task_id={task_id}");
        true
    }

    /// Appends an open task named from `SAMPLE_TASK_NAMES` in rotation.
    pub fn add_sample_task(&mut self) -> &Task {
        let id = self.tasks.iter().map(|task| task.id).max().map_or(1, |max| max + 1);
        let name = SAMPLE_TASK_NAMES[self.next_sample % SAMPLE_TASK_NAMES.len()];
        self.next_sample += 1;

        let mut tasks = self.tasks.clone();
        tasks.push(Task::new(id, name, false));
        self.tasks = tasks;
        debug!(
            "event=task_add module=tasks status=ok task_id={id} task_count={}",
            self.tasks.len()
        );
        &self.tasks[self.tasks.len() - 1]
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    /// Share of completed tasks in `0.0..=100.0`; `0.0` for an empty list.
    pub fn completion_percentage(&self) -> f64 {
        if self.tasks.is_empty() {
            return 0.0;
        }
        self.completed_count() as f64 / self.tasks.len() as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskListService, SAMPLE_TASK_NAMES};
    use crate::model::task::{seed_tasks, Task};

    #[test]
    fn seed_list_is_two_of_five_complete() {
        let service = TaskListService::new();
        assert_eq!(service.tasks(), seed_tasks().as_slice());
        assert_eq!(service.completed_count(), 2);
        assert_eq!(service.completion_percentage(), 40.0);
    }

    #[test]
    fn toggle_flips_only_the_named_task() {
        let mut service = TaskListService::new();
        assert!(service.toggle_task(2));
        assert!(service.tasks()[1].completed);
        assert_eq!(service.completed_count(), 3);

        assert!(service.toggle_task(2));
        assert!(!service.tasks()[1].completed);
        assert_eq!(&service.tasks()[2], &seed_tasks()[2]);
    }

    #[test]
    fn toggle_of_unknown_task_changes_nothing() {
        let mut service = TaskListService::new();
        assert!(!service.toggle_task(99));
        assert_eq!(service.tasks(), seed_tasks().as_slice());
    }

    #[test]
    fn added_tasks_get_next_id_and_rotate_names() {
        let mut service = TaskListService::new();
        let first = service.add_sample_task().clone();
        assert_eq!(first, Task::new(6, SAMPLE_TASK_NAMES[0], false));

        let second = service.add_sample_task().clone();
        assert_eq!(second.id, 7);
        assert_eq!(second.name, SAMPLE_TASK_NAMES[1]);
        assert_eq!(service.tasks().len(), 7);
        assert_eq!(service.completed_count(), 2);
    }

    #[test]
    fn empty_list_reports_zero_percent_and_starts_ids_at_one() {
        let mut service = TaskListService::with_tasks(Vec::new());
        assert_eq!(service.completion_percentage(), 0.0);

        assert_eq!(service.add_sample_task().id, 1);
        assert_eq!(service.completion_percentage(), 0.0);
        assert!(service.toggle_task(1));
        assert_eq!(service.completion_percentage(), 100.0);
    }
}
