// In-memory task list state: tasks, filter, edit session and theme

use crate::filter::Filter;
use crate::id::{IdGenerator, SequentialIds};
use crate::task::{Task, TaskId, normalize_text};
use crate::theme::Theme;
use eyre::{Result, eyre};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

/// The single in-progress text edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// Task being edited
    pub id: TaskId,
    /// Working copy of the text, committed on save
    pub buffer: String,
}

/// Task totals, always derived from the current task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl Counts {
    /// Count for one filter, as shown in the filter bar
    pub fn for_filter(&self, filter: Filter) -> usize {
        match filter {
            Filter::All => self.total,
            Filter::Completed => self.completed,
            Filter::Pending => self.pending,
        }
    }
}

/// Owns the task list and the transient view selection state
///
/// All mutation goes through the operations below. Degenerate input (blank
/// text, unknown ids) is a silent no-op; the return values only tell the
/// caller whether anything changed.
#[derive(Debug, Clone)]
pub struct TaskListStore<G: IdGenerator = SequentialIds> {
    tasks: Vec<Task>,
    filter: Filter,
    edit: Option<EditSession>,
    theme: Theme,
    ids: G,
}

impl TaskListStore {
    /// Empty store with sequential ids
    pub fn new() -> Self {
        Self::with_ids(SequentialIds::new())
    }
}

impl Default for TaskListStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: IdGenerator> TaskListStore<G> {
    /// Empty store drawing ids from `ids`
    pub fn with_ids(ids: G) -> Self {
        Self {
            tasks: Vec::new(),
            filter: Filter::default(),
            edit: None,
            theme: Theme::default(),
            ids,
        }
    }

    /// Store pre-filled with the three demo tasks
    pub fn seeded(ids: G) -> Self {
        let mut store = Self::with_ids(ids);
        store.tasks = seed_tasks();
        store
    }

    /// Store pre-filled with `tasks`, in the given order
    ///
    /// Text is trimmed. Fails on duplicate ids or blank text.
    pub fn with_tasks(ids: G, tasks: Vec<Task>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(tasks.len());

        for task in tasks {
            if !seen.insert(task.id) {
                return Err(eyre!("Duplicate task id {}", task.id));
            }
            let text = normalize_text(&task.text).ok_or_else(|| eyre!("Task {} has blank text", task.id))?;
            normalized.push(Task {
                id: task.id,
                text: text.to_string(),
                completed: task.completed,
            });
        }

        let mut store = Self::with_ids(ids);
        store.tasks = normalized;
        Ok(store)
    }

    // ========================================================================
    // Task operations
    // ========================================================================

    /// Append a pending task with the trimmed text
    ///
    /// Returns the new id, or `None` if the text was blank.
    pub fn add(&mut self, raw_text: &str) -> Option<TaskId> {
        let Some(text) = normalize_text(raw_text) else {
            debug!("Ignoring blank task text");
            return None;
        };

        let id = self.fresh_id();
        self.tasks.push(Task::new(id, text));
        debug!(id = %id, text = text, "Added task");
        Some(id)
    }

    /// Remove the task with `id`. Returns false if there was none.
    pub fn delete(&mut self, id: TaskId) -> bool {
        let Some(pos) = self.position(id) else {
            debug!(id = %id, "Delete of unknown task ignored");
            return false;
        };

        self.tasks.remove(pos);
        if self.editing_id() == Some(id) {
            self.edit = None;
        }
        debug!(id = %id, "Deleted task");
        true
    }

    /// Flip the completion flag of `id`. Returns false if there was no such task.
    pub fn toggle_complete(&mut self, id: TaskId) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                debug!(id = %id, completed = task.completed, "Toggled task");
                true
            }
            None => {
                debug!(id = %id, "Toggle of unknown task ignored");
                false
            }
        }
    }

    // ========================================================================
    // Edit session
    // ========================================================================

    /// Begin editing `id` with `current_text` in the buffer
    ///
    /// Replaces any unsaved session.
    pub fn start_edit(&mut self, id: TaskId, current_text: impl Into<String>) {
        if let Some(prev) = &self.edit
            && prev.id != id
        {
            debug!(abandoned = %prev.id, "Abandoning unsaved edit");
        }
        self.edit = Some(EditSession {
            id,
            buffer: current_text.into(),
        });
        debug!(id = %id, "Started edit");
    }

    /// Replace the working buffer. Returns false when no edit is active.
    pub fn update_edit_buffer(&mut self, text: impl Into<String>) -> bool {
        match self.edit.as_mut() {
            Some(session) => {
                session.buffer = text.into();
                true
            }
            None => false,
        }
    }

    /// Commit the trimmed buffer to the edited task and end the session
    ///
    /// A blank buffer or a vanished target leaves every task untouched.
    /// Returns true if a task's text was replaced.
    pub fn save_edit(&mut self) -> bool {
        let Some(session) = self.edit.take() else {
            return false;
        };

        let Some(text) = normalize_text(&session.buffer) else {
            debug!(id = %session.id, "Blank edit discarded");
            return false;
        };

        match self.tasks.iter_mut().find(|t| t.id == session.id) {
            Some(task) => {
                task.text = text.to_string();
                debug!(id = %session.id, text = text, "Saved edit");
                true
            }
            None => {
                debug!(id = %session.id, "Edited task no longer exists");
                false
            }
        }
    }

    /// End the session without touching any task
    pub fn cancel_edit(&mut self) {
        if let Some(session) = self.edit.take() {
            debug!(id = %session.id, "Cancelled edit");
        }
    }

    // ========================================================================
    // Filter and theme
    // ========================================================================

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        debug!(filter = %filter, "Filter set");
    }

    /// Set the filter from its key (`all`, `completed`, `pending`)
    ///
    /// Unknown keys are rejected and the current filter is kept.
    pub fn set_filter_key(&mut self, key: &str) -> Result<Filter> {
        let filter: Filter = key.parse().inspect_err(|_| {
            warn!(key = key, "Rejected unknown filter key");
        })?;
        self.set_filter(filter);
        Ok(filter)
    }

    /// Switch between light and dark, returning the new theme
    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled());
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        debug!(theme = %theme, "Theme set");
    }

    // ========================================================================
    // Read accessors
    // ========================================================================

    /// Tasks passing the current filter, in insertion order
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks_matching(self.filter)
    }

    /// Tasks passing `filter`, in insertion order
    pub fn tasks_matching(&self, filter: Filter) -> Vec<&Task> {
        self.tasks.iter().filter(|t| filter.matches(t)).collect()
    }

    pub fn counts(&self) -> Counts {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        Counts {
            total: self.tasks.len(),
            completed,
            pending: self.tasks.len() - completed,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn edit(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn editing_id(&self) -> Option<TaskId> {
        self.edit.as_ref().map(|s| s.id)
    }

    pub fn edit_buffer(&self) -> Option<&str> {
        self.edit.as_ref().map(|s| s.buffer.as_str())
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Next generated id not already held by a task
    fn fresh_id(&mut self) -> TaskId {
        loop {
            let id = self.ids.next_id();
            if self.position(id).is_none() {
                return id;
            }
            debug!(id = %id, "Skipping id already in use");
        }
    }
}

fn seed_tasks() -> Vec<Task> {
    vec![
        Task::new(TaskId(1), "Learn React hooks"),
        Task::completed(TaskId(2), "Build a todo app"),
        Task::new(TaskId(3), "Practice coding daily"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.text.clone()).collect()
    }

    fn mixed_store() -> TaskListStore {
        let mut store = TaskListStore::new();
        let a = store.add("a").unwrap();
        store.add("b").unwrap();
        let c = store.add("c").unwrap();
        store.add("d").unwrap();
        store.toggle_complete(a);
        store.toggle_complete(c);
        store
    }

    fn assert_counts_consistent<G: IdGenerator>(store: &TaskListStore<G>) {
        let counts = store.counts();
        assert_eq!(counts.total, counts.completed + counts.pending);
        assert_eq!(store.tasks_matching(Filter::All).len(), counts.total);
        assert_eq!(store.tasks_matching(Filter::Completed).len(), counts.completed);
        assert_eq!(store.tasks_matching(Filter::Pending).len(), counts.pending);
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = TaskListStore::new();
        assert!(store.is_empty());
        assert_eq!(store.filter(), Filter::All);
        assert_eq!(store.theme(), Theme::Light);
        assert!(store.edit().is_none());
        assert_eq!(store.counts(), Counts::default());
    }

    #[test]
    fn test_add_blank_is_noop() {
        let mut store = TaskListStore::new();
        store.add("keep");
        let before = store.tasks().to_vec();

        assert_eq!(store.add(""), None);
        assert_eq!(store.add("   \t "), None);
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_add_trims_and_preserves_order() {
        let mut store = TaskListStore::new();
        store.add("Buy milk");
        store.add("  Walk dog  ");

        let tasks = store.tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].text, "Buy milk");
        assert_eq!(tasks[1].text, "Walk dog");
        assert!(tasks.iter().all(|t| !t.completed));
        assert_ne!(tasks[0].id, tasks[1].id);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut store = TaskListStore::new();
        let id = store.add("Buy milk").unwrap();
        let original = store.get(id).unwrap().clone();

        assert!(store.toggle_complete(id));
        assert!(store.get(id).unwrap().completed);
        assert!(store.toggle_complete(id));
        assert_eq!(store.get(id).unwrap(), &original);
    }

    #[test]
    fn test_toggle_unknown_is_noop() {
        let mut store = mixed_store();
        let before = store.tasks().to_vec();
        assert!(!store.toggle_complete(TaskId(999)));
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut store = mixed_store();
        let before = store.tasks().to_vec();
        assert!(!store.delete(TaskId(999)));
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_delete_keeps_order_of_rest() {
        let mut store = TaskListStore::new();
        store.add("a");
        let b = store.add("b").unwrap();
        store.add("c");

        assert!(store.delete(b));
        assert_eq!(texts(&store.visible_tasks()), vec!["a", "c"]);
        assert!(store.get(b).is_none());
    }

    #[test]
    fn test_delete_ends_edit_of_that_task() {
        let mut store = TaskListStore::new();
        let a = store.add("a").unwrap();
        let b = store.add("b").unwrap();

        store.start_edit(a, "a");
        store.delete(b);
        assert_eq!(store.editing_id(), Some(a));

        store.delete(a);
        assert!(store.edit().is_none());
    }

    #[test]
    fn test_ids_never_reused_after_delete() {
        let mut store = TaskListStore::new();
        let a = store.add("a").unwrap();
        store.delete(a);
        let b = store.add("b").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_start_then_cancel_leaves_text() {
        let mut store = TaskListStore::new();
        let id = store.add("Buy milk").unwrap();

        store.start_edit(id, "X");
        assert_eq!(store.editing_id(), Some(id));
        assert_eq!(store.edit_buffer(), Some("X"));

        store.cancel_edit();
        assert_eq!(store.get(id).unwrap().text, "Buy milk");
        assert!(store.editing_id().is_none());
        assert!(store.edit_buffer().is_none());
    }

    #[test]
    fn test_save_trims_buffer() {
        let mut store = TaskListStore::new();
        let id = store.add("Buy milk").unwrap();

        store.start_edit(id, "X");
        assert!(store.update_edit_buffer("  Y  "));
        assert!(store.save_edit());

        assert_eq!(store.get(id).unwrap().text, "Y");
        assert!(store.editing_id().is_none());
    }

    #[test]
    fn test_save_blank_discards() {
        let mut store = TaskListStore::new();
        let id = store.add("Buy milk").unwrap();

        store.start_edit(id, "Buy milk");
        store.update_edit_buffer("   ");
        assert!(!store.save_edit());

        assert_eq!(store.get(id).unwrap().text, "Buy milk");
        assert!(store.editing_id().is_none());
    }

    #[test]
    fn test_save_keeps_completion_and_position() {
        let mut store = mixed_store();
        let target = store.tasks()[2].clone();

        store.start_edit(target.id, "renamed");
        store.save_edit();

        let saved = &store.tasks()[2];
        assert_eq!(saved.id, target.id);
        assert_eq!(saved.text, "renamed");
        assert_eq!(saved.completed, target.completed);
    }

    #[test]
    fn test_start_edit_replaces_previous_session() {
        let mut store = TaskListStore::new();
        let a = store.add("a").unwrap();
        let b = store.add("b").unwrap();

        store.start_edit(a, "unsaved");
        store.start_edit(b, "b2");
        store.save_edit();

        assert_eq!(store.get(a).unwrap().text, "a");
        assert_eq!(store.get(b).unwrap().text, "b2");
    }

    #[test]
    fn test_edit_without_session() {
        let mut store = mixed_store();
        let before = store.tasks().to_vec();

        assert!(!store.update_edit_buffer("x"));
        assert!(!store.save_edit());
        store.cancel_edit();
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_save_edit_of_missing_task_is_noop() {
        let mut store = mixed_store();
        let before = store.tasks().to_vec();

        store.start_edit(TaskId(999), "ghost");
        assert!(!store.save_edit());
        assert_eq!(store.tasks(), before.as_slice());
        assert!(store.edit().is_none());
    }

    #[test]
    fn test_visible_tasks_by_filter() {
        let mut store = mixed_store();

        assert_eq!(texts(&store.visible_tasks()), vec!["a", "b", "c", "d"]);

        store.set_filter(Filter::Completed);
        assert_eq!(texts(&store.visible_tasks()), vec!["a", "c"]);
        assert!(store.visible_tasks().iter().all(|t| t.completed));

        store.set_filter(Filter::Pending);
        assert_eq!(texts(&store.visible_tasks()), vec!["b", "d"]);
        assert!(store.visible_tasks().iter().all(|t| !t.completed));

        // Filtering never mutates the list
        assert_eq!(store.tasks().len(), 4);
    }

    #[test]
    fn test_set_filter_key_rejects_unknown() {
        let mut store = TaskListStore::new();
        assert_eq!(store.set_filter_key("pending").unwrap(), Filter::Pending);

        assert!(store.set_filter_key("bogus").is_err());
        assert_eq!(store.filter(), Filter::Pending);
    }

    #[test]
    fn test_counts_stay_consistent() {
        let mut store = TaskListStore::new();
        assert_counts_consistent(&store);

        let ids: Vec<_> = ["a", "b", "c", "d", "e"].iter().filter_map(|t| store.add(t)).collect();
        assert_counts_consistent(&store);

        store.toggle_complete(ids[0]);
        store.toggle_complete(ids[3]);
        assert_counts_consistent(&store);
        assert_eq!(
            store.counts(),
            Counts {
                total: 5,
                completed: 2,
                pending: 3
            }
        );

        store.delete(ids[0]);
        store.delete(ids[1]);
        assert_counts_consistent(&store);
        assert_eq!(store.counts().for_filter(Filter::Completed), 1);
        assert_eq!(store.counts().for_filter(Filter::Pending), 2);
    }

    #[test]
    fn test_seeded_store() {
        let mut store = TaskListStore::seeded(SequentialIds::new());
        let counts = store.counts();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.completed, 1);
        assert_eq!(store.tasks()[0].text, "Learn React hooks");

        // Counter starts at 1 but must skip the seeded ids
        let id = store.add("new").unwrap();
        assert_eq!(id, TaskId(4));
    }

    #[test]
    fn test_with_tasks_validates() {
        let store = TaskListStore::with_tasks(
            SequentialIds::new(),
            vec![Task::new(TaskId(5), "  padded  "), Task::completed(TaskId(6), "done")],
        )
        .unwrap();
        assert_eq!(store.tasks()[0].text, "padded");
        assert!(store.tasks()[1].completed);

        let dup = TaskListStore::with_tasks(
            SequentialIds::new(),
            vec![Task::new(TaskId(1), "a"), Task::new(TaskId(1), "b")],
        );
        assert!(dup.is_err());

        let blank = TaskListStore::with_tasks(SequentialIds::new(), vec![Task::new(TaskId(1), "  ")]);
        assert!(blank.is_err());
    }

    #[test]
    fn test_toggle_theme() {
        let mut store = TaskListStore::new();
        assert_eq!(store.toggle_theme(), Theme::Dark);
        assert_eq!(store.toggle_theme(), Theme::Light);
        store.set_theme(Theme::Dark);
        assert!(store.theme().is_dark());
    }

    #[test]
    fn test_timestamp_ids_store() {
        let mut store = TaskListStore::with_ids(crate::id::TimestampIds::new());
        let a = store.add("a").unwrap();
        let b = store.add("b").unwrap();
        assert!(b > a);
    }
}
