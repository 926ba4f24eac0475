use psylink_core::models::import::{ImportTask, ImportTaskStatus};
use psylink_core::storage_keys;
use psylink_storage::state::{load_or_default, save_state};
use psylink_storage::{ChangeBus, ChangeDomain, SharedStore};

use crate::error::ImportError;

/// Default number of tasks kept, most recent first.
pub const DEFAULT_TASK_CAPACITY: usize = 50;

/// Persisted list of import jobs, for the progress panel.
#[derive(Clone)]
pub struct TaskQueue {
    store: SharedStore,
    bus: ChangeBus,
    capacity: usize,
}

impl TaskQueue {
    pub fn new(store: SharedStore, bus: ChangeBus) -> Self {
        Self::with_capacity(store, bus, DEFAULT_TASK_CAPACITY)
    }

    pub fn with_capacity(store: SharedStore, bus: ChangeBus, capacity: usize) -> Self {
        Self {
            store,
            bus,
            capacity: capacity.max(1),
        }
    }

    pub fn load(&self) -> Vec<ImportTask> {
        load_or_default(self.store.as_ref(), storage_keys::IMPORT_TASKS)
    }

    pub fn get(&self, id: &str) -> Option<ImportTask> {
        self.load().into_iter().find(|task| task.id == id)
    }

    fn persist(&self, mut tasks: Vec<ImportTask>) -> Result<(), ImportError> {
        tasks.truncate(self.capacity);
        save_state(self.store.as_ref(), storage_keys::IMPORT_TASKS, &tasks)?;
        self.bus.notify(ChangeDomain::ImportTasks);
        Ok(())
    }

    /// Replace the task with the same id, or put a new one at the front.
    pub fn upsert(&self, task: ImportTask) -> Result<ImportTask, ImportError> {
        let mut tasks = self.load();
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task.clone(),
            None => tasks.insert(0, task.clone()),
        }
        self.persist(tasks)?;
        Ok(task)
    }

    pub fn delete(&self, id: &str) -> Result<bool, ImportError> {
        let tasks = self.load();
        let before = tasks.len();
        let kept: Vec<ImportTask> = tasks.into_iter().filter(|t| t.id != id).collect();
        let removed = kept.len() != before;
        self.persist(kept)?;
        Ok(removed)
    }

    pub fn create(
        &self,
        file_name: &str,
        file_size: u64,
        question_count: usize,
    ) -> Result<ImportTask, ImportError> {
        let created_at = jiff::Timestamp::now();
        self.upsert(ImportTask {
            id: format!(
                "task_{}_{}",
                created_at.as_millisecond(),
                &uuid::Uuid::new_v4().simple().to_string()[..6]
            ),
            file_name: file_name.to_string(),
            file_size,
            question_count,
            added: 0,
            updated: 0,
            progress: 0,
            status: ImportTaskStatus::Pending,
            created_at,
            completed_at: None,
            error: None,
        })
    }

    fn modify(
        &self,
        id: &str,
        change: impl FnOnce(&mut ImportTask),
    ) -> Result<ImportTask, ImportError> {
        let mut task = self
            .get(id)
            .ok_or_else(|| ImportError::TaskNotFound(id.to_string()))?;
        change(&mut task);
        self.upsert(task)
    }

    pub fn start(&self, id: &str) -> Result<ImportTask, ImportError> {
        self.modify(id, |task| task.status = ImportTaskStatus::Processing)
    }

    pub fn set_progress(&self, id: &str, progress: u8) -> Result<ImportTask, ImportError> {
        self.modify(id, |task| task.progress = progress.min(100))
    }

    pub fn complete(
        &self,
        id: &str,
        question_count: usize,
        added: usize,
        updated: usize,
    ) -> Result<ImportTask, ImportError> {
        self.modify(id, |task| {
            task.status = ImportTaskStatus::Completed;
            task.progress = 100;
            task.question_count = question_count;
            task.added = added;
            task.updated = updated;
            task.completed_at = Some(jiff::Timestamp::now());
        })
    }

    pub fn fail(&self, id: &str, message: &str) -> Result<ImportTask, ImportError> {
        self.modify(id, |task| {
            task.status = ImportTaskStatus::Failed;
            task.error = Some(message.to_string());
            task.completed_at = Some(jiff::Timestamp::now());
        })
    }

    /// Only a task that has not finished can be cancelled.
    pub fn cancel(&self, id: &str) -> Result<ImportTask, ImportError> {
        self.modify(id, |task| {
            if !task.status.is_finished() {
                task.status = ImportTaskStatus::Cancelled;
                task.completed_at = Some(jiff::Timestamp::now());
            }
        })
    }
}
