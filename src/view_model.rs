//! Task Item View Model
//!
//! Local state behind one task row: edit drafts, inline error, and the
//! in-flight flag. The displayed task only changes once the server confirms.

use task_client::{Task, TaskUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemMode {
    Viewing,
    Editing,
}

/// Unsaved form values while editing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drafts {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl Drafts {
    fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            completed: task.completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskItemState {
    /// Last server-confirmed version; this is what the row displays
    pub task: Task,
    pub mode: ItemMode,
    pub drafts: Drafts,
    pub error: Option<String>,
    /// A request is in flight; controls are disabled
    pub busy: bool,
}

impl TaskItemState {
    pub fn new(task: Task) -> Self {
        let drafts = Drafts::from_task(&task);
        Self {
            task,
            mode: ItemMode::Viewing,
            drafts,
            error: None,
            busy: false,
        }
    }

    pub fn begin_edit(&mut self) {
        if self.busy {
            return;
        }
        self.drafts = Drafts::from_task(&self.task);
        self.error = None;
        self.mode = ItemMode::Editing;
    }

    /// Drop drafts and any error, back to the confirmed task.
    pub fn cancel_edit(&mut self) {
        if self.busy {
            return;
        }
        self.drafts = Drafts::from_task(&self.task);
        self.error = None;
        self.mode = ItemMode::Viewing;
    }

    /// Claim the in-flight slot. `false` if a request is already running.
    pub fn start_request(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    /// Confirmed task to hand to the parent, if the toggle succeeded.
    pub fn finish_toggle(&mut self, result: Result<Task, String>) -> Option<Task> {
        self.busy = false;
        match result {
            Ok(task) => {
                self.drafts.completed = task.completed;
                self.task = task.clone();
                self.error = None;
                Some(task)
            }
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }

    /// Validated update built from the drafts; sets the inline error otherwise.
    pub fn prepare_update(&mut self) -> Option<TaskUpdate> {
        let update = TaskUpdate::from_drafts(&self.drafts.title, &self.drafts.description, self.drafts.completed);
        match update.validate() {
            Ok(()) => {
                self.error = None;
                Some(update)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn finish_update(&mut self, result: Result<Task, String>) -> Option<Task> {
        self.busy = false;
        match result {
            Ok(task) => {
                self.drafts = Drafts::from_task(&task);
                self.task = task.clone();
                self.error = None;
                self.mode = ItemMode::Viewing;
                Some(task)
            }
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }

    /// `true` when the row should disappear.
    pub fn finish_delete(&mut self, result: Result<(), String>) -> bool {
        self.busy = false;
        match result {
            Ok(()) => true,
            Err(e) => {
                self.error = Some(e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::make_task;

    fn state() -> TaskItemState {
        let mut task = make_task(1, false);
        task.description = Some("original".to_string());
        TaskItemState::new(task)
    }

    #[test]
    fn test_toggle_shows_completion_only_after_confirmation() {
        let mut s = state();
        assert!(s.start_request());
        // still in flight: nothing displayed has changed
        assert!(!s.task.completed);
        assert!(!s.start_request());

        let mut confirmed = s.task.clone();
        confirmed.completed = true;
        let handed_up = s.finish_toggle(Ok(confirmed));

        assert!(s.task.completed);
        assert!(s.drafts.completed);
        assert!(!s.busy);
        assert_eq!(handed_up.map(|t| t.completed), Some(true));
    }

    #[test]
    fn test_failed_toggle_keeps_displayed_state() {
        let mut s = state();
        let before = s.task.clone();
        s.start_request();
        assert_eq!(s.finish_toggle(Err("Task not found".to_string())), None);

        assert_eq!(s.task, before);
        assert_eq!(s.error.as_deref(), Some("Task not found"));
        assert!(!s.busy);
    }

    #[test]
    fn test_cancel_restores_pre_edit_values() {
        let mut s = state();
        let pristine = s.clone();

        s.begin_edit();
        s.drafts.title = "   ".to_string();
        s.drafts.description = String::new();
        s.drafts.completed = true;
        assert_eq!(s.prepare_update(), None);
        assert!(s.error.is_some());

        s.cancel_edit();
        assert_eq!(s, pristine);
    }

    #[test]
    fn test_successful_update_leaves_edit_mode() {
        let mut s = state();
        s.begin_edit();
        s.drafts.title = " New title ".to_string();
        s.drafts.description = "  ".to_string();

        let update = s.prepare_update().unwrap();
        assert_eq!(update.title.as_deref(), Some("New title"));
        assert_eq!(update.description, Some(None));
        assert!(s.start_request());

        let mut saved = s.task.clone();
        saved.title = "New title".to_string();
        saved.description = None;
        s.finish_update(Ok(saved.clone()));

        assert_eq!(s.mode, ItemMode::Viewing);
        assert_eq!(s.task, saved);
        assert_eq!(s.drafts.description, "");
    }

    #[test]
    fn test_failed_update_stays_in_edit_mode() {
        let mut s = state();
        s.begin_edit();
        s.drafts.title = "New title".to_string();
        s.prepare_update().unwrap();
        s.start_request();
        s.finish_update(Err("Network error: offline".to_string()));

        assert_eq!(s.mode, ItemMode::Editing);
        assert_eq!(s.task.title, "Task 1");
        assert_eq!(s.drafts.title, "New title");
        assert_eq!(s.error.as_deref(), Some("Network error: offline"));
    }

    #[test]
    fn test_delete_outcomes() {
        let mut s = state();
        s.start_request();
        assert!(!s.finish_delete(Err("forbidden".to_string())));
        assert_eq!(s.error.as_deref(), Some("forbidden"));

        s.start_request();
        assert!(s.finish_delete(Ok(())));
    }

    #[test]
    fn test_no_mode_change_while_busy() {
        let mut s = state();
        s.start_request();
        s.begin_edit();
        assert_eq!(s.mode, ItemMode::Viewing);
    }
}
